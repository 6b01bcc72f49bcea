//! Incremental sync of a single ticker and period queries.

use std::fmt;
use std::sync::Arc;

use chrono::Days;
use etfquotes_fetch::QuoteSource;
use etfquotes_normalize::normalize;
use etfquotes_store::QuoteStore;
use etfquotes_types::{DateRange, QuotePeriod, QuoteRow, Result, SyncOutcome, Ticker};
use log::{debug, info};

use crate::{QuoteQuery, SyncConfig};

/// Brings one ticker's history up to date and answers period queries.
///
/// A sync fetches only the dates after the last stored one, up to and
/// including yesterday. Today's bar is never requested since it may still
/// change.
#[derive(Clone)]
pub struct SyncEngine {
    store: Arc<dyn QuoteStore>,
    source: Arc<dyn QuoteSource>,
    config: SyncConfig,
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("source", &self.source.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an engine over a store and a source.
    pub fn new(
        store: Arc<dyn QuoteStore>,
        source: Arc<dyn QuoteSource>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the quote store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn QuoteStore> {
        &self.store
    }

    /// Returns the fetch window for a ticker whose last stored date is `last`,
    /// or `None` when it is already up to date.
    #[must_use]
    pub fn fetch_window(&self, last: Option<chrono::NaiveDate>) -> Option<DateRange> {
        let end = self.config.today().pred_opt()?;
        let start = match last {
            Some(date) => date.checked_add_days(Days::new(1))?,
            None => self.config.epoch_floor,
        };
        DateRange::new(start, end).ok()
    }

    /// Fetches and stores every missing daily bar for `ticker`.
    ///
    /// # Errors
    ///
    /// Source, normalization and store errors are returned as-is. A
    /// [`DuplicateQuote`](etfquotes_types::QuotesError::DuplicateQuote) error
    /// means the store and the window computation disagree.
    pub async fn update_quotes(&self, ticker: &Ticker) -> Result<SyncOutcome> {
        let last = self.store.last_date(ticker).await?;

        let Some(window) = self.fetch_window(last) else {
            info!("{ticker} is already up to date");
            return Ok(SyncOutcome::UpToDate);
        };

        info!("Syncing {ticker} from {} ({window})", self.source.name());
        let table = self.source.fetch(ticker, window).await?;

        let bars = match table {
            Some(table) if !table.is_empty() => normalize(&table)?,
            _ => Vec::new(),
        };
        let fetched = bars.len();
        let rows: Vec<QuoteRow> = bars
            .into_iter()
            .filter(|bar| window.contains(bar.date))
            .map(|bar| bar.with_ticker(ticker.clone()))
            .collect();
        if rows.len() < fetched {
            debug!(
                "Dropped {} rows for {ticker} outside {window}",
                fetched - rows.len()
            );
        }

        if rows.is_empty() {
            return Ok(if last.is_some() {
                info!("No new quotes for {ticker}");
                SyncOutcome::UpToDate
            } else {
                info!("No historical data available for {ticker}");
                SyncOutcome::NoDataAvailable
            });
        }

        let rows_added = self.store.insert_rows(ticker, &rows).await?;
        info!("Added {rows_added} quotes for {ticker}");
        Ok(SyncOutcome::Updated { rows_added })
    }

    /// Returns a read-only query over this engine's store and clock.
    #[must_use]
    pub fn query(&self) -> QuoteQuery {
        QuoteQuery::new(self.store.clone(), self.config.clone())
    }

    /// Returns stored rows for `ticker` dated after the cutoff of `period`.
    /// See [`QuoteQuery::get_quotes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn get_quotes(&self, ticker: &Ticker, period: QuotePeriod) -> Result<Vec<QuoteRow>> {
        self.query().get_quotes(ticker, period).await
    }

    /// Like [`get_quotes`](Self::get_quotes), parsing the ticker and period first.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriod`](etfquotes_types::QuotesError::InvalidPeriod)
    /// for an unknown period, listing the valid ones.
    pub async fn get_quotes_str(&self, ticker: &str, period: &str) -> Result<Vec<QuoteRow>> {
        self.query().get_quotes_str(ticker, period).await
    }
}
