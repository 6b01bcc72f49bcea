//! The quote source contract.

use async_trait::async_trait;
use etfquotes_normalize::RawTable;
use etfquotes_types::{DateRange, Result, Ticker};

/// An external provider of daily quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetches daily rows for `ticker` within `range` (both ends inclusive).
    ///
    /// Returns `Ok(None)` when the source has nothing for the ticker in that
    /// window. A range starting at the epoch floor asks for full history.
    async fn fetch(&self, ticker: &Ticker, range: DateRange) -> Result<Option<RawTable>>;
}
