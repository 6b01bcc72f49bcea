//! Batch sync over every tracked instrument.

use std::fmt;
use std::sync::Arc;

use etfquotes_fetch::QuoteSource;
use etfquotes_store::{InstrumentCatalog, QuoteStore};
use etfquotes_types::{
    BatchSummary, FailedTicker, Instrument, ProgressEvent, QuotePeriod, QuoteRow, Result,
    SyncOutcome, Ticker, TickerProgress, UpdateStatus,
};
use futures::StreamExt;
use futures::stream::BoxStream;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{SyncConfig, SyncEngine};

/// The sync surface: single-ticker sync, batch runs and quote queries.
///
/// Batch runs process instruments one at a time in catalog order. A failure
/// for one ticker is recorded and the run moves on to the next.
#[derive(Clone)]
pub struct QuoteService {
    engine: SyncEngine,
    catalog: Arc<dyn InstrumentCatalog>,
}

impl fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl QuoteService {
    /// Creates a service from its collaborators.
    pub fn new(
        store: Arc<dyn QuoteStore>,
        catalog: Arc<dyn InstrumentCatalog>,
        source: Arc<dyn QuoteSource>,
        config: SyncConfig,
    ) -> Self {
        Self::from_engine(SyncEngine::new(store, source, config), catalog)
    }

    /// Creates a service around an existing engine.
    pub fn from_engine(engine: SyncEngine, catalog: Arc<dyn InstrumentCatalog>) -> Self {
        Self { engine, catalog }
    }

    /// Returns the per-ticker engine.
    #[must_use]
    pub const fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Returns the instrument catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn InstrumentCatalog> {
        &self.catalog
    }

    /// Syncs one ticker. See [`SyncEngine::update_quotes`].
    ///
    /// # Errors
    ///
    /// Errors are returned to the caller unchanged.
    pub async fn update_quotes(&self, ticker: &Ticker) -> Result<SyncOutcome> {
        self.engine.update_quotes(ticker).await
    }

    /// Returns stored quotes for a period. See [`SyncEngine::get_quotes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn get_quotes(&self, ticker: &Ticker, period: QuotePeriod) -> Result<Vec<QuoteRow>> {
        self.engine.get_quotes(ticker, period).await
    }

    /// Syncs every tracked instrument and summarizes the run.
    ///
    /// An empty catalog yields [`BatchSummary::empty`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the instruments cannot be listed.
    pub async fn update_all(&self) -> Result<BatchSummary> {
        let instruments = self.catalog.list_all().await?;
        if instruments.is_empty() {
            info!("No instruments to sync");
            return Ok(BatchSummary::empty());
        }

        let summary = self.run_batch(&instruments, None).await;
        info!("Batch sync finished: {summary}");
        Ok(summary)
    }

    /// Syncs every tracked instrument, emitting one event per ticker.
    ///
    /// The stream yields a [`ProgressEvent::Progress`] after each ticker and
    /// ends with [`ProgressEvent::Completed`]. If the catalog is empty or
    /// cannot be listed it yields a single [`ProgressEvent::Error`] instead.
    ///
    /// The run happens on a spawned task and continues to the end even if
    /// the stream is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn update_all_streaming(&self) -> BoxStream<'static, ProgressEvent> {
        let (tx, rx) = mpsc::channel(self.engine.config().channel_capacity);
        let service = self.clone();

        tokio::spawn(async move {
            let last = match service.catalog.list_all().await {
                Err(e) => {
                    error!("Batch sync aborted: {e}");
                    ProgressEvent::Error {
                        message: e.to_string(),
                    }
                }
                Ok(instruments) if instruments.is_empty() => {
                    info!("No instruments to sync");
                    ProgressEvent::Error {
                        message: BatchSummary::NO_INSTRUMENTS.to_string(),
                    }
                }
                Ok(instruments) => {
                    let summary = service.run_batch(&instruments, Some(&tx)).await;
                    info!("Batch sync finished: {summary}");
                    ProgressEvent::Completed(summary)
                }
            };
            let _ = tx.send(last).await;
        });

        ReceiverStream::new(rx).boxed()
    }

    async fn run_batch(
        &self,
        instruments: &[Instrument],
        events: Option<&mpsc::Sender<ProgressEvent>>,
    ) -> BatchSummary {
        let total = instruments.len();
        let mut success_count = 0;
        let mut rows_added = 0;
        let mut failed = Vec::new();

        for (index, instrument) in instruments.iter().enumerate() {
            let ticker = instrument.ticker();
            let outcome = self.sync_instrument(ticker).await;
            rows_added += outcome.rows_added();
            let (status, message) = match outcome.failure_reason(ticker) {
                None => {
                    success_count += 1;
                    (UpdateStatus::Success, outcome.to_string())
                }
                Some(reason) => {
                    failed.push(FailedTicker {
                        ticker: ticker.clone(),
                        name: instrument.name().to_string(),
                        error: reason.clone(),
                    });
                    (UpdateStatus::Error, reason)
                }
            };

            if let Some(tx) = events {
                let progress = TickerProgress::new(index + 1, total, instrument, status, message);
                // A closed receiver does not stop the batch.
                let _ = tx.send(ProgressEvent::Progress(progress)).await;
            }
        }

        debug!("Batch stored {rows_added} new quotes across {total} instruments");
        BatchSummary::new(total, success_count, failed)
    }

    /// Syncs one ticker, folding errors into [`SyncOutcome::Failed`].
    async fn sync_instrument(&self, ticker: &Ticker) -> SyncOutcome {
        match self.engine.update_quotes(ticker).await {
            Ok(outcome) => {
                if let Some(reason) = outcome.failure_reason(ticker) {
                    warn!("{ticker}: {reason}");
                }
                outcome
            }
            Err(e) => {
                if e.is_invariant_violation() {
                    error!("{ticker}: {e}");
                } else {
                    warn!("Failed to sync {ticker}: {e}");
                }
                SyncOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
