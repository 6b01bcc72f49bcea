//! Storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use etfquotes_types::{Instrument, QuoteRow, Result, Ticker};

/// Daily quote storage keyed by (ticker, date).
///
/// Rows are append-only: there is no update path, and inserting a row for an
/// existing (ticker, date) is an error rather than an overwrite.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Returns the most recent stored date for `ticker`, if any.
    async fn last_date(&self, ticker: &Ticker) -> Result<Option<NaiveDate>>;

    /// Inserts rows for `ticker` atomically and returns how many were written.
    ///
    /// Fails with [`QuotesError::DuplicateQuote`](etfquotes_types::QuotesError::DuplicateQuote)
    /// if any (ticker, date) already exists, in which case nothing is written.
    async fn insert_rows(&self, ticker: &Ticker, rows: &[QuoteRow]) -> Result<usize>;

    /// Returns rows for `ticker` dated strictly after `after`, ascending by date.
    ///
    /// `None` returns every stored row.
    async fn query_rows(
        &self,
        ticker: &Ticker,
        after: Option<NaiveDate>,
    ) -> Result<Vec<QuoteRow>>;

    /// Returns the number of stored rows for `ticker`.
    async fn count_rows(&self, ticker: &Ticker) -> Result<usize>;
}

/// The set of tracked instruments.
#[async_trait]
pub trait InstrumentCatalog: Send + Sync {
    /// Returns every tracked instrument, ordered by ticker.
    async fn list_all(&self) -> Result<Vec<Instrument>>;

    /// Looks up one instrument.
    async fn get(&self, ticker: &Ticker) -> Result<Option<Instrument>>;

    /// Adds an instrument or replaces its name and kind.
    async fn upsert(&self, instrument: &Instrument) -> Result<()>;

    /// Removes an instrument and its quotes. Returns false if it was not tracked.
    async fn remove(&self, ticker: &Ticker) -> Result<bool>;
}

/// Rejects rows whose ticker differs from the one being written.
pub(crate) fn check_tickers(ticker: &Ticker, rows: &[QuoteRow]) -> Result<()> {
    match rows.iter().find(|row| &row.ticker != ticker) {
        Some(row) => Err(etfquotes_types::QuotesError::Store(format!(
            "row for {} passed to insert for {ticker}",
            row.ticker
        ))),
        None => Ok(()),
    }
}
