//! Daily quote rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Ticker;

/// One normalized day of OHLCV data, before it is stamped with a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: f64,
    /// Close adjusted for splits and distributions.
    pub adj_close: Option<f64>,
    /// Traded volume.
    pub volume: Option<u64>,
}

impl DailyBar {
    /// Column order of a normalized table.
    pub const COLUMNS: [&'static str; 7] =
        ["Date", "Open", "High", "Low", "Close", "AdjClose", "Volume"];

    /// Creates a bar with only a closing price.
    #[must_use]
    pub const fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            adj_close: None,
            volume: None,
        }
    }

    /// Attaches a ticker, producing a storable row.
    #[must_use]
    pub fn with_ticker(self, ticker: Ticker) -> QuoteRow {
        QuoteRow {
            ticker,
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            adj_close: self.adj_close,
            volume: self.volume,
        }
    }
}

/// A stored daily quote, keyed by (ticker, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRow {
    /// Instrument the quote belongs to.
    pub ticker: Ticker,
    /// Trading date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: f64,
    /// Close adjusted for splits and distributions.
    pub adj_close: Option<f64>,
    /// Traded volume.
    pub volume: Option<u64>,
}

impl QuoteRow {
    /// Returns the row without its ticker.
    #[must_use]
    pub const fn bar(&self) -> DailyBar {
        DailyBar {
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            adj_close: self.adj_close,
            volume: self.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_ticker() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let bar = DailyBar {
            volume: Some(1200),
            ..DailyBar::close_only(date, 10.5)
        };
        let row = bar.with_ticker(Ticker::parse("abc").unwrap());

        assert_eq!(row.ticker.as_str(), "ABC");
        assert_eq!(row.date, date);
        assert_eq!(row.volume, Some(1200));
        assert_eq!(row.bar(), bar);
    }

    #[test]
    fn test_row_serializes_date_as_iso() {
        let row = DailyBar::close_only(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(), 1.0)
            .with_ticker(Ticker::parse("ABC").unwrap());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["date"], "2020-01-03");
        assert_eq!(json["ticker"], "ABC");
        assert!(json["open"].is_null());
    }
}
