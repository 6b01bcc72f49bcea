//! Incremental quote sync for the etfquotes quote tracker.
//!
//! - [`SyncEngine`] - Brings one ticker up to date and answers period queries
//! - [`QuoteQuery`] - Period queries straight from the store
//! - [`QuoteService`] - Batch runs over every tracked instrument, with or without progress events
//! - [`SyncConfig`] / [`Clock`] - Epoch floor, injected date source and channel sizing

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod query;
mod service;

#[cfg(test)]
mod testing;

pub use config::{Clock, FixedClock, SyncConfig, SystemClock};
pub use engine::SyncEngine;
pub use query::QuoteQuery;
pub use service::QuoteService;
