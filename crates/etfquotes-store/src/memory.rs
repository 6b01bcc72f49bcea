//! In-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;
use etfquotes_types::{Instrument, QuoteRow, QuotesError, Result, Ticker};
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

use crate::store::check_tickers;
use crate::{InstrumentCatalog, QuoteStore};

/// In-memory [`QuoteStore`] and [`InstrumentCatalog`].
///
/// Enforces the same uniqueness and cascade rules as [`SqliteStore`](crate::SqliteStore),
/// but does not require a ticker to be in the catalog before its quotes are stored.
#[derive(Debug, Default)]
pub struct MemoryStore {
    quotes: RwLock<BTreeMap<Ticker, BTreeMap<NaiveDate, QuoteRow>>>,
    instruments: RwLock<BTreeMap<Ticker, Instrument>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store tracking the given instruments.
    #[must_use]
    pub fn with_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let instruments = instruments
            .into_iter()
            .map(|i| (i.ticker().clone(), i))
            .collect();
        Self {
            quotes: RwLock::default(),
            instruments: RwLock::new(instruments),
        }
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn last_date(&self, ticker: &Ticker) -> Result<Option<NaiveDate>> {
        let quotes = self.quotes.read().await;
        Ok(quotes
            .get(ticker)
            .and_then(|rows| rows.last_key_value())
            .map(|(date, _)| *date))
    }

    async fn insert_rows(&self, ticker: &Ticker, rows: &[QuoteRow]) -> Result<usize> {
        check_tickers(ticker, rows)?;

        let mut quotes = self.quotes.write().await;
        let existing = quotes.entry(ticker.clone()).or_default();

        // Validate everything first so a conflict writes nothing.
        let mut seen = std::collections::BTreeSet::new();
        for row in rows {
            if existing.contains_key(&row.date) || !seen.insert(row.date) {
                return Err(QuotesError::DuplicateQuote {
                    ticker: ticker.to_string(),
                    date: row.date,
                });
            }
        }

        for row in rows {
            existing.insert(row.date, row.clone());
        }
        Ok(rows.len())
    }

    async fn query_rows(
        &self,
        ticker: &Ticker,
        after: Option<NaiveDate>,
    ) -> Result<Vec<QuoteRow>> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let quotes = self.quotes.read().await;
        Ok(quotes
            .get(ticker)
            .map(|rows| {
                rows.range((lower, Bound::Unbounded))
                    .map(|(_, row)| row.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_rows(&self, ticker: &Ticker) -> Result<usize> {
        let quotes = self.quotes.read().await;
        Ok(quotes.get(ticker).map_or(0, BTreeMap::len))
    }
}

#[async_trait]
impl InstrumentCatalog for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Instrument>> {
        Ok(self.instruments.read().await.values().cloned().collect())
    }

    async fn get(&self, ticker: &Ticker) -> Result<Option<Instrument>> {
        Ok(self.instruments.read().await.get(ticker).cloned())
    }

    async fn upsert(&self, instrument: &Instrument) -> Result<()> {
        self.instruments
            .write()
            .await
            .insert(instrument.ticker().clone(), instrument.clone());
        Ok(())
    }

    async fn remove(&self, ticker: &Ticker) -> Result<bool> {
        let removed = self.instruments.write().await.remove(ticker).is_some();
        if removed {
            self.quotes.write().await.remove(ticker);
        }
        Ok(removed)
    }
}
