//! Output formatters for the etfquotes quote tracker.
//!
//! - [`TableFormatter`] - Aligned text table for terminals
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`EventEncoding`] - Progress events as NDJSON lines or SSE frames

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "csv")]
mod csv;
mod events;
mod formatter;
#[cfg(feature = "json")]
mod json;
mod table;

#[cfg(feature = "csv")]
pub use crate::csv::CsvFormatter;
pub use events::EventEncoding;
pub use formatter::{FormatError, Formatter, OutputFormat};
#[cfg(feature = "json")]
pub use json::{JsonFormatter, JsonStyle};
pub use table::TableFormatter;
