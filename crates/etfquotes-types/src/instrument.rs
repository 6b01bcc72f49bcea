//! Tracked instrument definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::QuotesError;

/// Maximum length of a ticker symbol.
pub const MAX_TICKER_LEN: usize = 10;

/// Canonical ticker symbol: trimmed, uppercase, 1 to [`MAX_TICKER_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parses and canonicalizes a ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns [`QuotesError::InvalidTicker`] if the symbol is empty, too long,
    /// or contains whitespace.
    pub fn parse(symbol: &str) -> Result<Self, QuotesError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty()
            || trimmed.chars().count() > MAX_TICKER_LEN
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(QuotesError::InvalidTicker(symbol.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = QuotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = QuotesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of tracked instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Exchange-traded fund.
    #[default]
    Etf,
    /// Market index.
    Index,
}

impl InstrumentKind {
    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Etf => "etf",
            Self::Index => "index",
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = QuotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "etf" => Ok(Self::Etf),
            "index" => Ok(Self::Index),
            _ => Err(QuotesError::Parse(format!(
                "unknown instrument kind '{s}', expected one of: etf, index"
            ))),
        }
    }
}

/// A tracked instrument whose quotes are kept in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    ticker: Ticker,
    name: String,
    kind: InstrumentKind,
}

impl Instrument {
    /// Creates a new instrument.
    #[must_use]
    pub fn new(ticker: Ticker, name: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            ticker,
            name: name.into(),
            kind,
        }
    }

    /// Creates a new ETF.
    #[must_use]
    pub fn etf(ticker: Ticker, name: impl Into<String>) -> Self {
        Self::new(ticker, name, InstrumentKind::Etf)
    }

    /// Creates a new index.
    #[must_use]
    pub fn index(ticker: Ticker, name: impl Into<String>) -> Self {
        Self::new(ticker, name, InstrumentKind::Index)
    }

    /// Returns the ticker.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instrument kind.
    #[must_use]
    pub const fn kind(&self) -> InstrumentKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_canonical() {
        let ticker = Ticker::parse("  vwce ").unwrap();
        assert_eq!(ticker.as_str(), "VWCE");
        assert_eq!(ticker, "VWCE".parse().unwrap());
    }

    #[test]
    fn test_ticker_invalid() {
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("ABCDEFGHIJK").is_err());
        assert!(Ticker::parse("AB CD").is_err());
        assert!(Ticker::parse("ABCDEFGHIJ").is_ok());
    }

    #[test]
    fn test_ticker_serde() {
        let ticker: Ticker = serde_json::from_str("\"spy\"").unwrap();
        assert_eq!(ticker.as_str(), "SPY");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"SPY\"");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }

    #[test]
    fn test_instrument_kind_parse() {
        assert_eq!("ETF".parse::<InstrumentKind>().unwrap(), InstrumentKind::Etf);
        assert_eq!("index".parse::<InstrumentKind>().unwrap(), InstrumentKind::Index);
        assert!("bond".parse::<InstrumentKind>().is_err());
    }

    #[test]
    fn test_instrument_accessors() {
        let instrument = Instrument::index(Ticker::parse("^gspc").unwrap(), "S&P 500");
        assert_eq!(instrument.ticker().as_str(), "^GSPC");
        assert_eq!(instrument.name(), "S&P 500");
        assert_eq!(instrument.kind(), InstrumentKind::Index);
    }
}
