//! Rust library for tracking daily ETF and index quotes.
//!
//! This is a facade crate that re-exports functionality from the etfquotes
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use etfquotes_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open(SqliteStore::default_path())?);
//!     store.upsert(&Instrument::etf(Ticker::parse("SPY")?, "SPDR S&P 500")).await?;
//!
//!     let source = Arc::new(YahooSource::new(HttpClient::with_defaults()?));
//!     let service = QuoteService::new(store.clone(), store, source, SyncConfig::default());
//!
//!     let summary = service.update_all().await?;
//!     println!("{summary}");
//!
//!     let rows = service.get_quotes(&Ticker::parse("SPY")?, QuotePeriod::OneMonth).await?;
//!     println!("{} quotes in the last month", rows.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfquotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use etfquotes_types::*;

// Re-export normalization
pub use etfquotes_normalize::{
    FlatTable, GroupedTable, PRICE_DECIMALS, RawRow, RawTable, normalize, round_price,
};

// Re-export storage
pub use etfquotes_store::{InstrumentCatalog, MemoryStore, QuoteStore, SqliteStore, StoreError};

// Re-export sources and sync
#[cfg(feature = "fetch")]
pub use etfquotes_fetch::{
    ClientConfig, CsvDirSource, FetchError, HttpClient, QuoteSource, YAHOO_BASE_URL, YahooSource,
};

#[cfg(feature = "fetch")]
pub use etfquotes_sync::{
    Clock, FixedClock, QuoteQuery, QuoteService, SyncConfig, SyncEngine, SystemClock,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use etfquotes_format::{
    CsvFormatter, EventEncoding, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    TableFormatter,
};

/// Prelude module for convenient imports.
///
/// ```
/// use etfquotes_lib::prelude::*;
/// ```
pub mod prelude {
    pub use etfquotes_types::{
        BatchSummary, DailyBar, DateRange, Instrument, InstrumentKind, ProgressEvent, QuotePeriod,
        QuoteRow, QuotesError, Result, SyncOutcome, Ticker,
    };

    pub use etfquotes_store::{InstrumentCatalog, MemoryStore, QuoteStore, SqliteStore};

    #[cfg(feature = "fetch")]
    pub use etfquotes_fetch::{ClientConfig, CsvDirSource, HttpClient, QuoteSource, YahooSource};

    #[cfg(feature = "fetch")]
    pub use etfquotes_sync::{QuoteQuery, QuoteService, SyncConfig, SyncEngine};

    #[cfg(feature = "format")]
    pub use etfquotes_format::{
        CsvFormatter, EventEncoding, Formatter, JsonFormatter, OutputFormat, TableFormatter,
    };
}
