//! Period queries over stored quotes.

use std::fmt;
use std::sync::Arc;

use etfquotes_store::QuoteStore;
use etfquotes_types::{QuotePeriod, QuoteRow, Result, Ticker};
use log::debug;

use crate::SyncConfig;

/// Read-only access to stored quotes by named period.
///
/// Needs only a store, so read paths never construct a quote source.
#[derive(Clone)]
pub struct QuoteQuery {
    store: Arc<dyn QuoteStore>,
    config: SyncConfig,
}

impl fmt::Debug for QuoteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteQuery")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QuoteQuery {
    /// Creates a query over `store`, reading "today" from the config's clock.
    pub fn new(store: Arc<dyn QuoteStore>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    /// Returns stored rows for `ticker` dated after the cutoff of `period`.
    ///
    /// [`QuotePeriod::Max`] returns every stored row, including any dated
    /// before the epoch floor. An unknown ticker yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn get_quotes(&self, ticker: &Ticker, period: QuotePeriod) -> Result<Vec<QuoteRow>> {
        let cutoff = period.cutoff(self.config.today());
        match cutoff {
            Some(date) => debug!("Querying {ticker} for {period} (after {date})"),
            None => debug!("Querying all quotes for {ticker}"),
        }
        self.store.query_rows(ticker, cutoff).await
    }

    /// Like [`get_quotes`](Self::get_quotes), parsing the ticker and period first.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriod`](etfquotes_types::QuotesError::InvalidPeriod)
    /// for an unknown period, listing the valid ones.
    pub async fn get_quotes_str(&self, ticker: &str, period: &str) -> Result<Vec<QuoteRow>> {
        let period: QuotePeriod = period.parse()?;
        let ticker = Ticker::parse(ticker)?;
        self.get_quotes(&ticker, period).await
    }
}
