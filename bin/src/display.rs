//! Display utilities and output formatting for the etfquotes CLI.

use anyhow::Result;
use clap::ValueEnum;
use etfquotes_lib::prelude::*;
use std::io::Write;

/// Output format for quote rows.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Table,
    Csv,
    Json,
    Ndjson,
}

/// Wire encoding for streamed progress events.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum StreamFormat {
    Ndjson,
    Sse,
}

impl From<StreamFormat> for EventEncoding {
    fn from(format: StreamFormat) -> Self {
        match format {
            StreamFormat::Ndjson => Self::Ndjson,
            StreamFormat::Sse => Self::Sse,
        }
    }
}

/// Instrument kind accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum KindArg {
    Etf,
    Index,
}

impl From<KindArg> for InstrumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Etf => Self::Etf,
            KindArg::Index => Self::Index,
        }
    }
}

/// Write quote rows in the specified format.
pub(crate) fn write_quotes<W: Write + Send>(
    rows: &[QuoteRow],
    format: Format,
    writer: W,
) -> Result<()> {
    match format {
        Format::Table => TableFormatter::new().write_quotes(rows, writer)?,
        Format::Csv => CsvFormatter::new().write_quotes(rows, writer)?,
        Format::Json => JsonFormatter::new().with_pretty(true).write_quotes(rows, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_quotes(rows, writer)?,
    }
    Ok(())
}

/// Print a batch summary with its failures.
pub(crate) fn print_summary(summary: &BatchSummary) {
    println!("{}", summary.message);
    if summary.total == 0 {
        return;
    }
    println!("  Successful: {}", summary.success_count);
    if summary.failed_count > 0 {
        println!("  Failed: {}", summary.failed_count);
        for failure in &summary.failed {
            println!("    {} ({}): {}", failure.ticker, failure.name, failure.error);
        }
    }
}
