//! SQLite-backed store.

use async_trait::async_trait;
use chrono::NaiveDate;
use directories::ProjectDirs;
use etfquotes_types::{Instrument, InstrumentKind, QuoteRow, QuotesError, Result, Ticker};
use log::{debug, info};
use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::store::check_tickers;
use crate::{InstrumentCatalog, QuoteStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS instruments (
    ticker TEXT PRIMARY KEY NOT NULL,
    name   TEXT NOT NULL,
    kind   TEXT NOT NULL DEFAULT 'etf'
);
CREATE TABLE IF NOT EXISTS quotes (
    ticker    TEXT NOT NULL REFERENCES instruments(ticker) ON DELETE CASCADE,
    date      TEXT NOT NULL,
    open      REAL,
    high      REAL,
    low       REAL,
    close     REAL NOT NULL,
    adj_close REAL,
    volume    INTEGER,
    PRIMARY KEY (ticker, date)
);
";

/// Errors raised while opening or using the SQLite database.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the database directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to open the database file.
    #[error("Failed to open database '{path}': {source}")]
    Open {
        /// The database path.
        path: PathBuf,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// A query failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored value could not be decoded.
    #[error("Corrupt value in column '{column}': {value}")]
    Corrupt {
        /// Column name.
        column: &'static str,
        /// The offending value.
        value: String,
    },

    /// A previous operation panicked while holding the connection.
    #[error("Database connection lock poisoned")]
    Poisoned,

    /// The blocking database task did not complete.
    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for QuotesError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

/// SQLite implementation of [`QuoteStore`] and [`InstrumentCatalog`].
///
/// Quote rows reference their instrument and are deleted with it. Each call
/// runs on the blocking thread pool against a single shared connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(&path).map_err(|e| StoreError::Open {
            path: path.clone(),
            source: e,
        })?;
        Self::migrate(&conn)?;
        info!("Opened quote database at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn open_in_memory() -> std::result::Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Returns the default database location.
    ///
    /// Uses the platform data directory (e.g. `~/.local/share/etfquotes/quotes.db`
    /// on Linux), falling back to `~/.etfquotes/quotes.db`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "etfquotes")
            .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
            .join("quotes.db")
    }

    /// Returns the database path, or `None` for an in-memory database.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(conn: &Connection) -> std::result::Result<(), StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Runs `f` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(StoreError::from)?
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".etfquotes")
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StoreError::Corrupt {
        column: "date",
        value: value.to_string(),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Maps a constraint failure on insert to the domain error it signals.
fn constraint_error(extended_code: i32, ticker: &Ticker, date: NaiveDate) -> Option<QuotesError> {
    match extended_code {
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
            Some(QuotesError::DuplicateQuote {
                ticker: ticker.to_string(),
                date,
            })
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(QuotesError::UnknownInstrument(ticker.to_string())),
        _ => None,
    }
}

/// Raw column values of a `quotes` row.
type QuoteColumns = (
    String,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    f64,
    Option<f64>,
    Option<i64>,
);

fn quote_from_columns(ticker: &Ticker, columns: QuoteColumns) -> Result<QuoteRow> {
    let (date, open, high, low, close, adj_close, volume) = columns;
    Ok(QuoteRow {
        ticker: ticker.clone(),
        date: parse_date(&date)?,
        open,
        high,
        low,
        close,
        adj_close,
        volume: volume.and_then(|v| u64::try_from(v).ok()),
    })
}

fn instrument_from_columns(ticker: &str, name: String, kind: &str) -> Result<Instrument> {
    let ticker = Ticker::parse(ticker).map_err(|_| StoreError::Corrupt {
        column: "ticker",
        value: ticker.to_string(),
    })?;
    let kind: InstrumentKind = kind.parse().map_err(|_| StoreError::Corrupt {
        column: "kind",
        value: kind.to_string(),
    })?;
    Ok(Instrument::new(ticker, name, kind))
}

#[async_trait]
impl QuoteStore for SqliteStore {
    async fn last_date(&self, ticker: &Ticker) -> Result<Option<NaiveDate>> {
        let ticker = ticker.clone();
        self.with_conn(move |conn| {
            let last: Option<String> = conn
                .query_row(
                    "SELECT MAX(date) FROM quotes WHERE ticker = ?1",
                    params![ticker.as_str()],
                    |row| row.get(0),
                )
                .map_err(StoreError::from)?;
            Ok(last.as_deref().map(parse_date).transpose()?)
        })
        .await
    }

    async fn insert_rows(&self, ticker: &Ticker, rows: &[QuoteRow]) -> Result<usize> {
        check_tickers(ticker, rows)?;
        if rows.is_empty() {
            return Ok(0);
        }

        let ticker = ticker.clone();
        let rows = rows.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(StoreError::from)?;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO quotes (ticker, date, open, high, low, close, adj_close, volume)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    )
                    .map_err(StoreError::from)?;

                for row in &rows {
                    let volume = row.volume.map(|v| i64::try_from(v).unwrap_or(i64::MAX));
                    let inserted = stmt.execute(params![
                        ticker.as_str(),
                        format_date(row.date),
                        row.open,
                        row.high,
                        row.low,
                        row.close,
                        row.adj_close,
                        volume,
                    ]);
                    match inserted {
                        Ok(_) => {}
                        Err(rusqlite::Error::SqliteFailure(err, msg))
                            if err.code == ErrorCode::ConstraintViolation =>
                        {
                            // Dropping the transaction rolls back earlier rows.
                            return Err(constraint_error(err.extended_code, &ticker, row.date)
                                .unwrap_or_else(|| {
                                    StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, msg))
                                        .into()
                                }));
                        }
                        Err(e) => return Err(StoreError::from(e).into()),
                    }
                }
            }
            tx.commit().map_err(StoreError::from)?;
            debug!("Inserted {} quotes for {ticker}", rows.len());
            Ok(rows.len())
        })
        .await
    }

    async fn query_rows(
        &self,
        ticker: &Ticker,
        after: Option<NaiveDate>,
    ) -> Result<Vec<QuoteRow>> {
        let ticker = ticker.clone();
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT date, open, high, low, close, adj_close, volume
                     FROM quotes WHERE ticker = ?1 AND (?2 IS NULL OR date > ?2) ORDER BY date",
                )
                .map_err(StoreError::from)?;
            let columns = stmt
                .query_map(params![ticker.as_str(), after.map(format_date)], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                })
                .map_err(StoreError::from)?
                .collect::<std::result::Result<Vec<QuoteColumns>, _>>()
                .map_err(StoreError::from)?;

            columns
                .into_iter()
                .map(|c| quote_from_columns(&ticker, c))
                .collect()
        })
        .await
    }

    async fn count_rows(&self, ticker: &Ticker) -> Result<usize> {
        let ticker = ticker.clone();
        self.with_conn(move |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM quotes WHERE ticker = ?1",
                    params![ticker.as_str()],
                    |row| row.get(0),
                )
                .map_err(StoreError::from)?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }
}

#[async_trait]
impl InstrumentCatalog for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Instrument>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT ticker, name, kind FROM instruments ORDER BY ticker")
                .map_err(StoreError::from)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get(1)?, row.get::<_, String>(2)?))
                })
                .map_err(StoreError::from)?
                .collect::<std::result::Result<Vec<(String, String, String)>, _>>()
                .map_err(StoreError::from)?;

            rows.into_iter()
                .map(|(ticker, name, kind)| instrument_from_columns(&ticker, name, &kind))
                .collect()
        })
        .await
    }

    async fn get(&self, ticker: &Ticker) -> Result<Option<Instrument>> {
        let ticker = ticker.clone();
        self.with_conn(move |conn| {
            let found = conn
                .query_row(
                    "SELECT ticker, name, kind FROM instruments WHERE ticker = ?1",
                    params![ticker.as_str()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(StoreError::from)?;

            found
                .map(|(ticker, name, kind)| instrument_from_columns(&ticker, name, &kind))
                .transpose()
        })
        .await
    }

    async fn upsert(&self, instrument: &Instrument) -> Result<()> {
        let instrument = instrument.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO instruments (ticker, name, kind) VALUES (?1, ?2, ?3)
                 ON CONFLICT(ticker) DO UPDATE SET name = excluded.name, kind = excluded.kind",
                params![
                    instrument.ticker().as_str(),
                    instrument.name(),
                    instrument.kind().as_str()
                ],
            )
            .map_err(StoreError::from)?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, ticker: &Ticker) -> Result<bool> {
        let ticker = ticker.clone();
        self.with_conn(move |conn| {
            let removed = conn
                .execute(
                    "DELETE FROM instruments WHERE ticker = ?1",
                    params![ticker.as_str()],
                )
                .map_err(StoreError::from)?;
            Ok(removed > 0)
        })
        .await
    }
}
