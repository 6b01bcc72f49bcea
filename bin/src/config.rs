//! Configuration file loading.

use anyhow::{Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use etfquotes_lib::{ClientConfig, SqliteStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where quotes are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SourceKind {
    /// Yahoo Finance chart API.
    #[default]
    Yahoo,
    /// Per-ticker CSV files in `quotes_dir`.
    Csv,
}

/// HTTP settings for the Yahoo source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HttpSettings {
    pub(crate) timeout_secs: u64,
    pub(crate) max_retries: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            timeout_secs: client.timeout.as_secs(),
            max_retries: client.max_retries,
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
///
/// ```toml
/// database = "/srv/etfquotes/quotes.db"
/// source = "yahoo"
/// quotes_dir = "/srv/etfquotes/csv"
/// log_level = "info"
///
/// [http]
/// timeout_secs = 20
/// max_retries = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) database: Option<PathBuf>,
    pub(crate) source: Option<SourceKind>,
    pub(crate) quotes_dir: Option<PathBuf>,
    pub(crate) log_level: Option<String>,
    pub(crate) http: HttpSettings,
}

impl AppConfig {
    /// Returns `<config dir>/etfquotes/config.toml`, if a home directory is known.
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "etfquotes").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads `path`, or the default file if it exists, or built-in defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Returns the database path, falling back to the platform data directory.
    pub(crate) fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(SqliteStore::default_path)
    }

    /// Returns the HTTP client configuration.
    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            max_retries: self.http.max_retries,
            ..ClientConfig::default()
        }
    }
}
