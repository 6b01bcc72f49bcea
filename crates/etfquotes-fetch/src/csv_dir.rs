//! Local directory of per-ticker CSV history files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use csv_async::{AsyncReaderBuilder, StringRecord};
use etfquotes_normalize::{FlatTable, GroupedTable, RawRow, RawTable};
use etfquotes_types::{DateRange, QuotesError, Result, Ticker};
use futures::StreamExt;
use log::debug;

use crate::{FetchError, QuoteSource};

/// Reads history from `<dir>/<TICKER>.csv` files.
///
/// Two layouts are understood. The plain layout has a single header row
/// (`Date,Open,High,Low,Close,Adj Close,Volume`). The ticker-grouped layout
/// has a `Price` row with field names, a `Ticker` row with the symbol and an
/// optional `Date` row before the data.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory being read.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file holding the history of `ticker`.
    #[must_use]
    pub fn file_for(&self, ticker: &Ticker) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

/// Reads every record of `path`, or `None` if the file does not exist.
async fn read_records(path: &Path) -> Result<Option<Vec<StringRecord>>> {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FetchError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };

    let mut reader = AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv_async::Trim::All)
        .create_reader(file);

    let mut records = Vec::new();
    let mut stream = reader.records();
    while let Some(record) = stream.next().await {
        let record = record.map_err(|source| FetchError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }
    Ok(Some(records))
}

fn is_label(cell: Option<&str>, label: &str) -> bool {
    cell.is_some_and(|c| c.eq_ignore_ascii_case(label))
}

fn parse_cell(cell: &str, path: &Path) -> Result<Option<f64>> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        QuotesError::Parse(format!("{}: invalid number '{cell}'", path.display()))
    })
}

fn parse_date(cell: &str, path: &Path) -> Result<NaiveDate> {
    // Timestamps such as `2024-01-02 00:00:00-05:00` carry the date in the first ten chars.
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| QuotesError::Parse(format!("{}: invalid date '{cell}'", path.display())))
}

/// Parses data records into rows, skipping the date column and rows outside `range`.
fn parse_rows(
    records: &[StringRecord],
    date_col: usize,
    range: DateRange,
    path: &Path,
) -> Result<Vec<RawRow>> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let Some(date_cell) = record.get(date_col).filter(|c| !c.is_empty()) else {
            continue;
        };
        let date = parse_date(date_cell, path)?;
        if !range.contains(date) {
            continue;
        }
        let values = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_col)
            .map(|(_, cell)| parse_cell(cell, path))
            .collect::<Result<Vec<_>>>()?;
        rows.push(RawRow::new(date, values));
    }
    Ok(rows)
}

/// Turns the records of one file into a raw table.
fn parse_table(records: &[StringRecord], range: DateRange, path: &Path) -> Result<RawTable> {
    let Some(header) = records.first() else {
        return Ok(RawTable::Flat(FlatTable::default()));
    };

    let grouped = is_label(header.get(0), "price")
        && records.get(1).is_some_and(|r| is_label(r.get(0), "ticker"));

    if grouped {
        let tickers = &records[1];
        let columns = header
            .iter()
            .zip(tickers.iter())
            .skip(1)
            .map(|(field, ticker)| (field.to_string(), ticker.to_string()))
            .collect();
        let mut data = &records[2..];
        if data.first().is_some_and(|r| is_label(r.get(0), "date")) {
            data = &data[1..];
        }
        let rows = parse_rows(data, 0, range, path)?;
        return Ok(RawTable::GroupedByTicker(GroupedTable { columns, rows }));
    }

    let date_col = header
        .iter()
        .position(|c| c.eq_ignore_ascii_case("date") || c.eq_ignore_ascii_case("datetime"))
        .ok_or_else(|| {
            QuotesError::Data(format!("{}: missing 'Date' column", path.display()))
        })?;
    let columns = header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_col)
        .map(|(_, c)| c.to_string())
        .collect::<Vec<_>>();
    let rows = parse_rows(&records[1..], date_col, range, path)?;
    Ok(RawTable::Flat(FlatTable::new(columns, rows)))
}

#[async_trait]
impl QuoteSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self, ticker: &Ticker, range: DateRange) -> Result<Option<RawTable>> {
        let path = self.file_for(ticker);
        let Some(records) = read_records(&path).await? else {
            debug!("No history file for {ticker} at {}", path.display());
            return Ok(None);
        };

        let table = parse_table(&records, range, &path)?;
        debug!("Read {} rows for {ticker} from {}", table.len(), path.display());
        Ok((!table.is_empty()).then_some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfquotes_types::EPOCH_FLOOR;
    use tempfile::TempDir;

    const PLAIN: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,472.16,473.67,470.49,472.65,465.00,123623700
2024-01-03,470.43,471.19,468.17,468.79,461.20,103585900
2024-01-04,468.30,470.96,467.05,467.28,459.71,
";

    const GROUPED: &str = "\
Price,Adj Close,Close,High,Low,Open,Volume
Ticker,VWCE.DE,VWCE.DE,VWCE.DE,VWCE.DE,VWCE.DE,VWCE.DE
Date,,,,,,
2024-01-02,105.12,105.12,105.50,104.80,105.00,51234
2024-01-03,NaN,104.20,105.00,104.00,104.90,null
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_history() -> DateRange {
        DateRange::new(EPOCH_FLOOR, date(2024, 12, 31)).unwrap()
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_plain_layout() {
        let dir = TempDir::new().unwrap();
        write(&dir, "SPY.csv", PLAIN);
        let source = CsvDirSource::new(dir.path());

        let table = source
            .fetch(&Ticker::parse("SPY").unwrap(), full_history())
            .await
            .unwrap()
            .unwrap();
        let RawTable::Flat(flat) = &table else {
            panic!("expected flat table");
        };
        assert_eq!(flat.columns, ["Open", "High", "Low", "Close", "Adj Close", "Volume"]);
        assert_eq!(flat.rows.len(), 3);
        assert_eq!(flat.rows[2].values[5], None);

        let bars = etfquotes_normalize::normalize(&table).unwrap();
        assert_eq!(bars[0].close, 472.65);
        assert_eq!(bars[0].volume, Some(123_623_700));
    }

    #[tokio::test]
    async fn test_grouped_layout() {
        let dir = TempDir::new().unwrap();
        write(&dir, "VWCE.DE.csv", GROUPED);
        let source = CsvDirSource::new(dir.path());

        let table = source
            .fetch(&Ticker::parse("vwce.de").unwrap(), full_history())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(table, RawTable::GroupedByTicker(_)));

        let bars = etfquotes_normalize::normalize(&table).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date, date(2024, 1, 3));
        assert_eq!(bars[1].adj_close, None);
        assert_eq!(bars[1].volume, None);
    }

    #[tokio::test]
    async fn test_range_filter() {
        let dir = TempDir::new().unwrap();
        write(&dir, "SPY.csv", PLAIN);
        let source = CsvDirSource::new(dir.path());
        let ticker = Ticker::parse("SPY").unwrap();

        let range = DateRange::new(date(2024, 1, 3), date(2024, 1, 3)).unwrap();
        let table = source.fetch(&ticker, range).await.unwrap().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].date, date(2024, 1, 3));

        let later = DateRange::new(date(2024, 1, 5), date(2024, 2, 1)).unwrap();
        assert!(source.fetch(&ticker, later).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = CsvDirSource::new(dir.path());
        let result = source
            .fetch(&Ticker::parse("QQQ").unwrap(), full_history())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_date_column() {
        let dir = TempDir::new().unwrap();
        write(&dir, "SPY.csv", "Open,Close\n1.0,2.0\n");
        let source = CsvDirSource::new(dir.path());
        let err = source
            .fetch(&Ticker::parse("SPY").unwrap(), full_history())
            .await
            .unwrap_err();
        assert!(matches!(err, QuotesError::Data(ref m) if m.contains("Date")));
    }

    #[tokio::test]
    async fn test_invalid_number() {
        let dir = TempDir::new().unwrap();
        write(&dir, "SPY.csv", "Date,Close\n2024-01-02,abc\n");
        let source = CsvDirSource::new(dir.path());
        let err = source
            .fetch(&Ticker::parse("SPY").unwrap(), full_history())
            .await
            .unwrap_err();
        assert!(matches!(err, QuotesError::Parse(_)));
    }

    #[test]
    fn test_timestamp_dates() {
        let path = Path::new("x.csv");
        assert_eq!(
            parse_date("2024-01-02 00:00:00-05:00", path).unwrap(),
            date(2024, 1, 2)
        );
        assert!(parse_date("02/01/2024", path).is_err());
    }
}
