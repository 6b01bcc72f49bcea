//! etfquotes CLI - Daily ETF and index quote tracker.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

mod commands;
mod config;
mod display;

use commands::Context;
use config::{AppConfig, SourceKind};
use display::{Format, KindArg, StreamFormat};

#[derive(Parser)]
#[command(name = "etfquotes")]
#[command(about = "Daily ETF and index quote tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: <config dir>/etfquotes/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Quote source
    #[arg(long, value_enum, global = true)]
    source: Option<SourceKind>,

    /// Directory of <TICKER>.csv files for the csv source
    #[arg(long, global = true)]
    quotes_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring one tracked ticker up to date
    Sync {
        /// Ticker symbol (e.g., SPY, VWCE.DE, ^GSPC)
        ticker: String,
    },

    /// Bring every tracked ticker up to date
    SyncAll {
        /// Write progress events to stdout instead of showing a progress bar
        #[arg(long, value_enum)]
        stream: Option<StreamFormat>,
    },

    /// Print stored quotes
    Quotes {
        /// Ticker symbol
        ticker: String,

        /// Lookback period (5D, 1M, 3M, 6M, 1Y, YTD, 5Y, Max)
        #[arg(short, long, default_value = "1Y")]
        period: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Manage tracked instruments
    Instruments {
        #[command(subcommand)]
        action: InstrumentAction,
    },

    /// Import history from a directory of <TICKER>.csv files
    Import {
        /// Directory holding the CSV files
        dir: PathBuf,
    },
}

/// Actions for managing tracked instruments.
#[derive(Subcommand)]
enum InstrumentAction {
    /// List tracked instruments
    List,

    /// Track an instrument
    Add {
        /// Ticker symbol
        ticker: String,

        /// Display name
        name: String,

        /// Instrument kind
        #[arg(long, value_enum, default_value = "etf")]
        kind: KindArg,
    },

    /// Stop tracking an instrument and delete its quotes
    Remove {
        /// Ticker symbol
        ticker: String,
    },
}

/// Initialize logging. `RUST_LOG` takes precedence over flags and config.
fn init_logger(verbose: u8, quiet: bool, configured: Option<&str>) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => configured
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn),
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = AppConfig::load(cli.config.as_deref())?;
    init_logger(cli.verbose, cli.quiet, config.log_level.as_deref());

    if cli.database.is_some() {
        config.database = cli.database;
    }
    if cli.source.is_some() {
        config.source = cli.source;
    }
    if cli.quotes_dir.is_some() {
        config.quotes_dir = cli.quotes_dir;
    }

    let ctx = Context::open(&config, cli.quiet)?;

    match command {
        Commands::Sync { ticker } => commands::sync::sync(&ctx, &ticker).await,
        Commands::SyncAll { stream } => commands::sync_all::sync_all(&ctx, stream).await,
        Commands::Quotes {
            ticker,
            period,
            format,
        } => commands::quotes::quotes(&ctx, &ticker, &period, format).await,
        Commands::Instruments { action } => match action {
            InstrumentAction::List => commands::instruments::list(&ctx).await,
            InstrumentAction::Add { ticker, name, kind } => {
                commands::instruments::add(&ctx, &ticker, &name, kind.into()).await
            }
            InstrumentAction::Remove { ticker } => {
                commands::instruments::remove(&ctx, &ticker).await
            }
        },
        Commands::Import { dir } => commands::import::import(&ctx, &dir).await,
    }
}
