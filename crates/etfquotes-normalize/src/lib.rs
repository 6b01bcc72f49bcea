//! Normalization of raw source tables into daily quote rows.
//!
//! - [`RawTable`] - A source response, either flat or grouped by ticker
//! - [`normalize`] - Converts a [`RawTable`] into [`DailyBar`](etfquotes_types::DailyBar)s
//! - [`round_price`] - Two-decimal rounding used for every price column

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod normalizer;
mod raw;
mod round;

pub use normalizer::normalize;
pub use raw::{FlatTable, GroupedTable, RawRow, RawTable};
pub use round::{PRICE_DECIMALS, round_price};
