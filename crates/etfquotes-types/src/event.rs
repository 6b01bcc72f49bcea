//! Progress events emitted by a streaming batch sync.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{BatchSummary, Instrument, Ticker, UpdateStatus};

/// Progress after one ticker of a batch has been processed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TickerProgress {
    /// Percent complete, rounded to the nearest integer.
    pub progress: u8,
    /// 1-based position of this ticker in the batch.
    pub current: usize,
    /// Number of tickers in the batch.
    pub total: usize,
    /// The ticker.
    pub ticker: Ticker,
    /// Instrument name.
    pub name: String,
    /// Whether the ticker synced.
    pub status: UpdateStatus,
    /// Outcome or error message.
    pub message: String,
}

impl TickerProgress {
    /// Creates a progress record for the `current`-th of `total` instruments.
    #[must_use]
    pub fn new(
        current: usize,
        total: usize,
        instrument: &Instrument,
        status: UpdateStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            progress: Self::percent(current, total),
            current,
            total,
            ticker: instrument.ticker().clone(),
            name: instrument.name().to_string(),
            status,
            message: message.into(),
        }
    }

    /// Percentage of `current` over `total`, rounded half up (1 of 8 is 13).
    ///
    /// Truncation would report 12 there. The last ticker always reports 100.
    #[must_use]
    pub const fn percent(current: usize, total: usize) -> u8 {
        if total == 0 || current >= total {
            return 100;
        }
        ((current * 100 + total / 2) / total) as u8
    }
}

/// A discrete, ordered event in a streaming batch run.
///
/// `Completed` is always last when present. `Error` terminates the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// One ticker finished, successfully or not.
    Progress(TickerProgress),
    /// The batch finished.
    Completed(BatchSummary),
    /// The batch could not run.
    Error {
        /// Error description.
        message: String,
    },
}

impl ProgressEvent {
    /// Returns true if no further events follow this one.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Error { .. })
    }
}

impl Serialize for ProgressEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Progress(progress) => progress.serialize(serializer),
            Self::Completed(summary) => {
                let mut map = serializer.serialize_map(Some(7))?;
                map.serialize_entry("done", &true)?;
                map.serialize_entry("progress", &100u8)?;
                map.serialize_entry("total", &summary.total)?;
                map.serialize_entry("success_count", &summary.success_count)?;
                map.serialize_entry("failed_count", &summary.failed_count)?;
                map.serialize_entry("failed_etfs", &summary.failed)?;
                map.serialize_entry("message", &summary.message)?;
                map.end()
            }
            Self::Error { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", &true)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}
