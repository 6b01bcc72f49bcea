//! CLI command implementations.

pub(crate) mod import;
pub(crate) mod instruments;
pub(crate) mod quotes;
pub(crate) mod sync;
pub(crate) mod sync_all;

use crate::config::{AppConfig, SourceKind};
use anyhow::{Context as _, Result};
use etfquotes_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolved settings shared by every command.
pub(crate) struct Context {
    pub(crate) store: Arc<SqliteStore>,
    pub(crate) source: SourceKind,
    pub(crate) quotes_dir: Option<PathBuf>,
    pub(crate) client: ClientConfig,
    pub(crate) quiet: bool,
}

impl Context {
    /// Opens the database named by `config`.
    pub(crate) fn open(config: &AppConfig, quiet: bool) -> Result<Self> {
        let path = config.database_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Ok(Self {
            store: Arc::new(store),
            source: config.source.unwrap_or_default(),
            quotes_dir: config.quotes_dir.clone(),
            client: config.client_config(),
            quiet,
        })
    }

    /// Builds the configured quote source.
    pub(crate) fn source(&self) -> Result<Arc<dyn QuoteSource>> {
        Ok(match self.source {
            SourceKind::Yahoo => Arc::new(YahooSource::new(HttpClient::new(self.client.clone())?)),
            SourceKind::Csv => {
                let dir = self
                    .quotes_dir
                    .clone()
                    .context("The csv source needs --quotes-dir or `quotes_dir` in the config")?;
                Arc::new(CsvDirSource::new(dir))
            }
        })
    }

    /// Builds a service over the database and the configured source.
    pub(crate) fn service(&self) -> Result<QuoteService> {
        Ok(self.service_with(self.source()?))
    }

    /// Builds a period query over the database.
    pub(crate) fn reader(&self) -> QuoteQuery {
        QuoteQuery::new(self.store.clone(), SyncConfig::default())
    }

    /// Builds a service over the database and `source`.
    pub(crate) fn service_with(&self, source: Arc<dyn QuoteSource>) -> QuoteService {
        QuoteService::new(
            self.store.clone(),
            self.store.clone(),
            source,
            SyncConfig::default(),
        )
    }

    /// Parses a ticker and checks that it is tracked.
    pub(crate) async fn tracked(&self, symbol: &str) -> Result<Instrument> {
        let ticker = Ticker::parse(symbol)?;
        self.store.get(&ticker).await?.with_context(|| {
            format!("{ticker} is not tracked. Add it with `etfquotes instruments add {ticker} <NAME>`")
        })
    }
}
