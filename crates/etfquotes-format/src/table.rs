//! Aligned text table output.

use etfquotes_types::QuoteRow;
use std::io::Write;

use crate::formatter::price_cell;
use crate::{FormatError, Formatter};

/// Fixed-width table for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableFormatter {
    show_ticker: bool,
}

impl TableFormatter {
    /// Creates a table formatter without a ticker column.
    #[must_use]
    pub const fn new() -> Self {
        Self { show_ticker: false }
    }

    /// Sets whether to include a ticker column.
    #[must_use]
    pub const fn with_ticker(mut self, show: bool) -> Self {
        self.show_ticker = show;
        self
    }
}

impl Formatter for TableFormatter {
    fn write_quotes<W: Write + Send>(
        &self,
        rows: &[QuoteRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.show_ticker {
            write!(writer, "{:<10} ", "TICKER")?;
        }
        writeln!(
            writer,
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14}",
            "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "ADJ CLOSE", "VOLUME"
        )?;
        let width = if self.show_ticker { 91 } else { 80 };
        writeln!(writer, "{}", "-".repeat(width))?;

        for row in rows {
            if self.show_ticker {
                write!(writer, "{:<10} ", row.ticker.as_str())?;
            }
            writeln!(
                writer,
                "{:<10} {:>10} {:>10} {:>10} {:>10.2} {:>10} {:>14}",
                row.date.format("%Y-%m-%d").to_string(),
                price_cell(row.open),
                price_cell(row.high),
                price_cell(row.low),
                row.close,
                price_cell(row.adj_close),
                row.volume.map_or_else(String::new, |v| v.to_string()),
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "txt"
    }
}
