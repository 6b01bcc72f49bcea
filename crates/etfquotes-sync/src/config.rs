//! Sync configuration and the injected clock.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use etfquotes_types::EPOCH_FLOOR;

/// Source of the current calendar date.
pub trait Clock: Debug + Send + Sync {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

/// Clock reading the local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Configuration for the sync engine and batch runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Start of the fetch window for tickers without history.
    pub epoch_floor: NaiveDate,
    /// Clock used for the "as of yesterday" cutoff and period queries.
    pub clock: Arc<dyn Clock>,
    /// Capacity of the channel feeding streamed progress events.
    pub channel_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            epoch_floor: EPOCH_FLOOR,
            clock: Arc::new(SystemClock),
            channel_capacity: 32,
        }
    }
}

impl SyncConfig {
    /// Sets the epoch floor.
    #[must_use]
    pub const fn with_epoch_floor(mut self, floor: NaiveDate) -> Self {
        self.epoch_floor = floor;
        self
    }

    /// Sets the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets the progress channel capacity (at least 1).
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Returns today's date according to the configured clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
