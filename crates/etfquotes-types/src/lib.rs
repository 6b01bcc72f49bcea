//! Core types for the etfquotes quote tracker.
//!
//! This crate provides the data structures shared across the workspace:
//!
//! - [`Ticker`] - Canonical (uppercase) instrument symbol
//! - [`Instrument`] - A tracked ETF or index
//! - [`DailyBar`] / [`QuoteRow`] - One day of OHLCV data, without and with its ticker
//! - [`QuotePeriod`] - Named lookback window for quote queries
//! - [`DateRange`] - Inclusive date window for fetches
//! - [`SyncOutcome`], [`BatchSummary`], [`ProgressEvent`] - Results of sync runs

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod event;
mod instrument;
mod outcome;
mod period;
mod quote;

pub use date_range::{DateRange, EPOCH_FLOOR};
pub use error::{DateRangeError, QuotesError, Result};
pub use event::{ProgressEvent, TickerProgress};
pub use instrument::{Instrument, InstrumentKind, MAX_TICKER_LEN, Ticker};
pub use outcome::{BatchSummary, FailedTicker, SyncOutcome, UpdateStatus};
pub use period::{QuotePeriod, QuotePeriodParseError};
pub use quote::{DailyBar, QuoteRow};
