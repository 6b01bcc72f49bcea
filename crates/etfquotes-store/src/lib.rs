//! Quote and instrument persistence for the etfquotes quote tracker.
//!
//! - [`QuoteStore`] - Per-ticker daily quote storage keyed by (ticker, date)
//! - [`InstrumentCatalog`] - The set of tracked instruments
//! - [`SqliteStore`] - SQLite-backed implementation of both
//! - [`MemoryStore`] - In-memory implementation of both

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod memory;
mod sqlite;
mod store;

#[cfg(test)]
mod conformance;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreError};
pub use store::{InstrumentCatalog, QuoteStore};
