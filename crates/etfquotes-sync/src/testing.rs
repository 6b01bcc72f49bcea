//! Scripted quote source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use etfquotes_fetch::QuoteSource;
use etfquotes_normalize::{FlatTable, RawRow, RawTable};
use etfquotes_store::{MemoryStore, QuoteStore};
use etfquotes_types::{DateRange, QuoteRow, QuotesError, Result, Ticker};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn ticker(symbol: &str) -> Ticker {
    Ticker::parse(symbol).unwrap()
}

#[derive(Debug, Clone)]
enum Script {
    Closes(Vec<(NaiveDate, f64)>),
    Fail(String),
}

/// Serves canned closes per ticker, filtered to the requested window.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    scripts: Mutex<HashMap<Ticker, Script>>,
    calls: Mutex<Vec<(Ticker, DateRange)>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn closes(self, symbol: &str, closes: &[(NaiveDate, f64)]) -> Self {
        self.set_closes(symbol, closes);
        self
    }

    pub(crate) fn failing(self, symbol: &str, message: &str) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(ticker(symbol), Script::Fail(message.to_string()));
        self
    }

    pub(crate) fn set_closes(&self, symbol: &str, closes: &[(NaiveDate, f64)]) {
        self.scripts
            .lock()
            .unwrap()
            .insert(ticker(symbol), Script::Closes(closes.to_vec()));
    }

    pub(crate) fn calls(&self) -> Vec<(Ticker, DateRange)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, ticker: &Ticker, range: DateRange) -> Result<Option<RawTable>> {
        self.calls.lock().unwrap().push((ticker.clone(), range));
        let script = self.scripts.lock().unwrap().get(ticker).cloned();
        match script {
            None => Ok(None),
            Some(Script::Fail(message)) => Err(QuotesError::Http(message)),
            Some(Script::Closes(closes)) => {
                let rows: Vec<_> = closes
                    .into_iter()
                    .filter(|(d, _)| range.contains(*d))
                    .map(|(d, close)| {
                        let values = vec![
                            Some(close - 1.0),
                            Some(close + 1.0),
                            Some(close - 2.0),
                            Some(close),
                            Some(1000.0),
                        ];
                        RawRow::new(d, values)
                    })
                    .collect();
                if rows.is_empty() {
                    return Ok(None);
                }
                Ok(Some(RawTable::Flat(FlatTable::new(
                    ["Open", "High", "Low", "Close", "Volume"],
                    rows,
                ))))
            }
        }
    }
}

/// Memory store that reports a duplicate key on every insert for one ticker.
#[derive(Debug)]
pub(crate) struct ConflictingStore {
    inner: MemoryStore,
    conflict_on: Ticker,
}

impl ConflictingStore {
    pub(crate) fn new(symbol: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            conflict_on: ticker(symbol),
        }
    }
}

#[async_trait]
impl QuoteStore for ConflictingStore {
    async fn last_date(&self, ticker: &Ticker) -> Result<Option<NaiveDate>> {
        self.inner.last_date(ticker).await
    }

    async fn insert_rows(&self, ticker: &Ticker, rows: &[QuoteRow]) -> Result<usize> {
        match rows.first() {
            Some(row) if *ticker == self.conflict_on => Err(QuotesError::DuplicateQuote {
                ticker: ticker.to_string(),
                date: row.date,
            }),
            _ => self.inner.insert_rows(ticker, rows).await,
        }
    }

    async fn query_rows(
        &self,
        ticker: &Ticker,
        after: Option<NaiveDate>,
    ) -> Result<Vec<QuoteRow>> {
        self.inner.query_rows(ticker, after).await
    }

    async fn count_rows(&self, ticker: &Ticker) -> Result<usize> {
        self.inner.count_rows(ticker).await
    }
}
