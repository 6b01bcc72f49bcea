//! Quote sources for the etfquotes quote tracker.
//!
//! - [`QuoteSource`] - Fetches raw daily rows for a ticker and date range
//! - [`HttpClient`] - HTTP client with connection pooling and retries
//! - [`YahooSource`] - Yahoo Finance chart API source
//! - [`CsvDirSource`] - Directory of per-ticker CSV history files

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod csv_dir;
mod source;
mod yahoo;

pub use client::{ClientConfig, FetchError, HttpClient};
pub use csv_dir::CsvDirSource;
pub use source::QuoteSource;
pub use yahoo::{YAHOO_BASE_URL, YahooSource};
