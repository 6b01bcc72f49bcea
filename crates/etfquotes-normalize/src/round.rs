//! Decimal rounding of prices.

/// Number of decimal places kept for prices.
pub const PRICE_DECIMALS: i32 = 2;

/// Rounds a price to [`PRICE_DECIMALS`] places, half away from zero.
///
/// Rounding works on the shortest decimal representation of the value, so
/// `101.005` becomes `101.01` even though its binary value is slightly below
/// the midpoint. Non-finite values are returned unchanged.
#[must_use]
pub fn round_price(value: f64) -> f64 {
    round_half_away(value, PRICE_DECIMALS)
}

fn round_half_away(value: f64, places: i32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    // Shortest round-trip digits, e.g. 101.005 -> "1.01005e2".
    let repr = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return value;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value;
    };
    let digits: Vec<u64> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| u64::from(b - b'0'))
        .collect();

    // Leading digits that survive rounding.
    let keep = exponent + 1 + places;
    if keep < 0 {
        return 0.0_f64.copysign(value);
    }
    let keep = keep as usize;
    if keep >= digits.len() {
        return value;
    }

    let mut kept = digits[..keep].iter().fold(0u64, |acc, d| acc * 10 + d);
    if digits[keep] >= 5 {
        kept += 1;
    }
    (kept as f64 / 10f64.powi(places)).copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_midpoint_away_from_zero() {
        assert_eq!(round_price(101.005), 101.01);
        assert_eq!(round_price(2.675), 2.68);
        assert_eq!(round_price(0.125), 0.13);
        assert_eq!(round_price(0.005), 0.01);
        assert_eq!(round_price(-1.005), -1.01);
    }

    #[test]
    fn test_round_below_midpoint() {
        assert_eq!(round_price(1.004), 1.0);
        assert_eq!(round_price(101.0049), 101.0);
        assert_eq!(round_price(0.0004), 0.0);
    }

    #[test]
    fn test_round_carries() {
        assert_eq!(round_price(99.995), 100.0);
        assert_eq!(round_price(9.999), 10.0);
    }

    #[test]
    fn test_round_already_short() {
        assert_eq!(round_price(12.3), 12.3);
        assert_eq!(round_price(100.0), 100.0);
        assert_eq!(round_price(1234567.89), 1234567.89);
    }

    #[test]
    fn test_round_non_finite() {
        assert!(round_price(f64::NAN).is_nan());
        assert_eq!(round_price(f64::INFINITY), f64::INFINITY);
    }
}
