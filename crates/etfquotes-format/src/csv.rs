//! CSV output format.

use etfquotes_types::QuoteRow;
use std::io::Write;

use crate::formatter::price_cell;
use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_quotes<W: Write + Send>(
        &self,
        rows: &[QuoteRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "date{d}ticker{d}open{d}high{d}low{d}close{d}adj_close{d}volume"
            )?;
        }

        for row in rows {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{:.2}{d}{}{d}{}",
                row.date.format("%Y-%m-%d"),
                row.ticker,
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
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use etfquotes_types::{DailyBar, Ticker};
    use std::io::Cursor;

    fn create_test_row() -> QuoteRow {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: Some(472.16),
            high: Some(473.67),
            low: None,
            close: 472.65,
            adj_close: Some(465.0),
            volume: Some(123_623_700),
        }
        .with_ticker(Ticker::parse("SPY").unwrap())
    }

    #[test]
    fn test_csv_quotes() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter.write_quotes(&[create_test_row()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines[0], "date,ticker,open,high,low,close,adj_close,volume");
        assert_eq!(lines[1], "2024-01-02,SPY,472.16,473.67,,472.65,465.00,123623700");
    }

    #[test]
    fn test_csv_no_header() {
        let formatter = CsvFormatter::new().with_header(false);
        let mut output = Cursor::new(Vec::new());

        formatter.write_quotes(&[create_test_row()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(!result.contains("date,ticker"));
        assert_eq!(result.lines().count(), 1);
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let mut output = Cursor::new(Vec::new());

        formatter.write_quotes(&[create_test_row()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("date\tticker\topen"));
    }
}
