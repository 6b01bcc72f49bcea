//! Results of single-ticker syncs and batch runs.

use serde::{Deserialize, Serialize};

use crate::{QuotesError, Ticker};

/// Outcome of bringing one ticker's history up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing to fetch, or the source had nothing newer than stored history.
    UpToDate,
    /// New rows were stored.
    Updated {
        /// Number of rows added.
        rows_added: usize,
    },
    /// The source had nothing and the ticker has no stored history.
    NoDataAvailable,
    /// The attempt failed.
    Failed {
        /// Failure description.
        reason: String,
    },
}

impl SyncOutcome {
    /// Returns true for outcomes a batch counts as a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::UpToDate | Self::Updated { .. })
    }

    /// Returns the number of rows added.
    #[must_use]
    pub const fn rows_added(&self) -> usize {
        match self {
            Self::Updated { rows_added } => *rows_added,
            _ => 0,
        }
    }

    /// Returns the failure message for unsuccessful outcomes.
    #[must_use]
    pub fn failure_reason(&self, ticker: &Ticker) -> Option<String> {
        match self {
            Self::UpToDate | Self::Updated { .. } => None,
            Self::NoDataAvailable => Some(
                QuotesError::NoDataAvailable {
                    ticker: ticker.to_string(),
                }
                .to_string(),
            ),
            Self::Failed { reason } => Some(reason.clone()),
        }
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpToDate => write!(f, "already up to date"),
            Self::Updated { rows_added } => write!(f, "{rows_added} new quotes added"),
            Self::NoDataAvailable => write!(f, "no data available"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-ticker status reported in progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    /// The ticker synced.
    Success,
    /// The ticker failed.
    Error,
}

impl UpdateStatus {
    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ticker that failed during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTicker {
    /// The ticker.
    pub ticker: Ticker,
    /// Instrument name.
    pub name: String,
    /// Failure message.
    pub error: String,
}

/// Summary of a batch sync over every tracked instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// True when every ticker succeeded and at least one was processed.
    pub success: bool,
    /// Number of tickers attempted.
    pub total: usize,
    /// Number of tickers that synced.
    pub success_count: usize,
    /// Number of tickers that failed.
    pub failed_count: usize,
    /// Failure details in processing order.
    #[serde(rename = "failed_etfs")]
    pub failed: Vec<FailedTicker>,
    /// Human-readable completion message.
    pub message: String,
}

impl BatchSummary {
    /// Message used when there is nothing to sync.
    pub const NO_INSTRUMENTS: &'static str = "no instruments found";

    /// Summary for a run with no tracked instruments.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            success: false,
            total: 0,
            success_count: 0,
            failed_count: 0,
            failed: Vec::new(),
            message: Self::NO_INSTRUMENTS.to_string(),
        }
    }

    /// Builds a summary from per-ticker results.
    #[must_use]
    pub fn new(total: usize, success_count: usize, failed: Vec<FailedTicker>) -> Self {
        if total == 0 {
            return Self::empty();
        }
        let failed_count = failed.len();
        let message = if failed_count == 0 {
            format!("All {total} instruments updated successfully")
        } else {
            format!("{success_count} successes, {failed_count} errors")
        };
        Self {
            success: failed_count == 0,
            total,
            success_count,
            failed_count,
            failed,
            message,
        }
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
