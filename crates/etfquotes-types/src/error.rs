//! Error types for etfquotes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::QuotePeriodParseError;

/// Result type alias for etfquotes operations.
pub type Result<T> = std::result::Result<T, QuotesError>;

/// Errors that can occur while fetching, storing and querying quotes.
#[derive(Error, Debug)]
pub enum QuotesError {
    /// HTTP request to the quote source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A source response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A source table is malformed (e.g. a required column is missing).
    #[error("Data error: {0}")]
    Data(String),

    /// The source returned nothing for a ticker with no stored history.
    #[error("No historical data available for ticker {ticker}")]
    NoDataAvailable {
        /// The ticker that had no data.
        ticker: String,
    },

    /// A row for this (ticker, date) already exists.
    ///
    /// The sync window never overlaps stored history, so this signals a
    /// disagreement between the engine and the store.
    #[error("Duplicate quote for {ticker} on {date}")]
    DuplicateQuote {
        /// The ticker of the conflicting row.
        ticker: String,
        /// The date of the conflicting row.
        date: NaiveDate,
    },

    /// Unknown period name.
    #[error(transparent)]
    InvalidPeriod(#[from] QuotePeriodParseError),

    /// Ticker symbol failed validation.
    #[error("Invalid ticker '{0}': expected 1 to 10 characters")]
    InvalidTicker(String),

    /// Instrument not present in the catalog.
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Persistence layer failure.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuotesError {
    /// Returns true if this error means stored history and the sync window disagree.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::DuplicateQuote { .. })
    }
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}
