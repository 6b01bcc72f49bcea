//! Conversion of raw tables into daily bars.

use chrono::NaiveDate;
use etfquotes_types::{DailyBar, QuotesError, Result};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

use crate::{GroupedTable, RawRow, RawTable, round_price};

/// Fields recognized in source headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Field {
    /// Matches a header ignoring case, spaces and underscores ("Adj Close", "adj_close", "AdjClose").
    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "open" => Some(Self::Open),
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "close" => Some(Self::Close),
            "adjclose" => Some(Self::AdjClose),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Column positions of the recognized fields.
#[derive(Debug, Default)]
struct ColumnMap {
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    adj_close: Option<usize>,
    volume: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[&str]) -> Result<Self> {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let Some(field) = Field::from_header(header) else {
                continue;
            };
            let slot = match field {
                Field::Open => &mut map.open,
                Field::High => &mut map.high,
                Field::Low => &mut map.low,
                Field::Close => &mut map.close,
                Field::AdjClose => &mut map.adj_close,
                Field::Volume => &mut map.volume,
            };
            if slot.replace(idx).is_some() {
                return Err(QuotesError::Data(format!("duplicate column '{header}'")));
            }
        }
        if map.close.is_none() {
            return Err(QuotesError::Data(format!(
                "missing required column 'Close' (found: {})",
                headers.join(", ")
            )));
        }
        Ok(map)
    }
}

/// Collapses `(field, ticker)` headers to the field level.
fn collapse_headers(table: &GroupedTable) -> Result<Vec<&str>> {
    let tickers: BTreeSet<&str> = table.columns.iter().map(|(_, t)| t.as_str()).collect();
    if tickers.len() > 1 {
        return Err(QuotesError::Data(format!(
            "expected columns for a single ticker, found {}",
            tickers.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(table.columns.iter().map(|(field, _)| field.as_str()).collect())
}

fn cell(row: &RawRow, idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| row.values.get(i).copied().flatten())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn price(row: &RawRow, idx: Option<usize>) -> Option<f64> {
    cell(row, idx).map(round_price)
}

fn volume(row: &RawRow, idx: Option<usize>) -> Option<u64> {
    cell(row, idx).map(|v| v.round() as u64)
}

/// Normalizes a raw source table into daily bars ordered by date.
///
/// An empty table yields an empty vector. Prices are rounded with
/// [`round_price`]; NaN, infinite and negative cells become `None`. Only
/// `Close` is required: the other columns are optional and read as `None`
/// when absent. A row without a usable close is skipped with a warning.
/// When a date appears twice the later row wins.
///
/// # Errors
///
/// Returns [`QuotesError::Data`] if the `Close` column is missing, a column is
/// duplicated, a row has the wrong number of cells, or a grouped table mixes
/// several tickers.
pub fn normalize(table: &RawTable) -> Result<Vec<DailyBar>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let (headers, rows): (Vec<&str>, &[RawRow]) = match table {
        RawTable::Flat(flat) => (
            flat.columns.iter().map(String::as_str).collect(),
            flat.rows.as_slice(),
        ),
        RawTable::GroupedByTicker(grouped) => {
            (collapse_headers(grouped)?, grouped.rows.as_slice())
        }
    };
    let columns = ColumnMap::resolve(&headers)?;

    let mut bars: BTreeMap<NaiveDate, DailyBar> = BTreeMap::new();
    for row in rows {
        if row.values.len() != headers.len() {
            return Err(QuotesError::Data(format!(
                "row {} has {} cells, expected {}",
                row.date,
                row.values.len(),
                headers.len()
            )));
        }

        let Some(close) = price(row, columns.close) else {
            warn!("Skipping {} row without a close price", row.date);
            continue;
        };

        let bar = DailyBar {
            date: row.date,
            open: price(row, columns.open),
            high: price(row, columns.high),
            low: price(row, columns.low),
            close,
            adj_close: price(row, columns.adj_close),
            volume: volume(row, columns.volume),
        };
        if bars.insert(row.date, bar).is_some() {
            warn!("Duplicate row for {} in source table, keeping the later one", row.date);
        }
    }

    debug!("Normalized {} of {} raw rows", bars.len(), rows.len());
    Ok(bars.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatTable;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn yahoo_columns() -> Vec<&'static str> {
        vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]
    }

    #[test]
    fn test_empty_table_is_empty() {
        let table = RawTable::Flat(FlatTable::new(yahoo_columns(), Vec::new()));
        assert!(normalize(&table).unwrap().is_empty());

        // No columns at all is still just empty.
        let table = RawTable::Flat(FlatTable::default());
        assert!(normalize(&table).unwrap().is_empty());
    }

    #[test]
    fn test_flat_table() {
        let rows = vec![
            RawRow::new(
                date(2020, 1, 3),
                vec![Some(10.0), Some(11.0), Some(9.5), Some(10.5), Some(10.4), Some(1000.0)],
            ),
            RawRow::new(
                date(2020, 1, 2),
                vec![Some(9.0), Some(10.123), Some(8.999), Some(101.005), Some(9.9), Some(1500.0)],
            ),
        ];
        let bars = normalize(&RawTable::Flat(FlatTable::new(yahoo_columns(), rows))).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2020, 1, 2));
        assert_eq!(bars[0].close, 101.01);
        assert_eq!(bars[0].high, Some(10.12));
        assert_eq!(bars[0].low, Some(9.0));
        assert_eq!(bars[0].volume, Some(1500));
        assert_eq!(bars[1].adj_close, Some(10.4));
    }

    #[test]
    fn test_grouped_table_collapses() {
        let grouped = GroupedTable {
            columns: ["Close", "High", "Low", "Open", "Volume"]
                .iter()
                .map(|f| ((*f).to_string(), "SPY".to_string()))
                .collect(),
            rows: vec![RawRow::new(
                date(2024, 5, 1),
                vec![Some(500.129), Some(505.0), Some(499.0), Some(501.0), Some(7.0e7)],
            )],
        };
        let bars = normalize(&RawTable::GroupedByTicker(grouped)).unwrap();

        assert_eq!(bars.len(), 1);
        assert_abs_diff_eq!(bars[0].close, 500.13, epsilon = 1e-9);
        assert_eq!(bars[0].open, Some(501.0));
        assert_eq!(bars[0].adj_close, None);
        assert_eq!(bars[0].volume, Some(70_000_000));
    }

    #[test]
    fn test_grouped_table_rejects_several_tickers() {
        let grouped = GroupedTable {
            columns: vec![
                ("Close".to_string(), "SPY".to_string()),
                ("Close".to_string(), "QQQ".to_string()),
            ],
            rows: vec![RawRow::new(date(2024, 5, 1), vec![Some(1.0), Some(2.0)])],
        };
        let err = normalize(&RawTable::GroupedByTicker(grouped)).unwrap_err();
        assert!(matches!(err, QuotesError::Data(_)));
    }

    #[test]
    fn test_single_row_series() {
        let table = RawTable::series(
            date(2024, 6, 14),
            [("Close", Some(42.424)), ("Open", Some(42.0))],
        );
        let bars = normalize(&table).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 42.42);
        assert_eq!(bars[0].open, Some(42.0));
        assert_eq!(bars[0].high, None);
    }

    #[test]
    fn test_missing_close_column() {
        let table = RawTable::Flat(FlatTable::new(
            ["Open", "High"],
            vec![RawRow::new(date(2024, 1, 2), vec![Some(1.0), Some(2.0)])],
        ));
        let err = normalize(&table).unwrap_err();
        assert!(err.to_string().contains("missing required column 'Close'"));
    }

    #[test]
    fn test_invalid_numbers_become_absent() {
        let rows = vec![RawRow::new(
            date(2024, 1, 2),
            vec![
                Some(f64::NAN),
                Some(f64::INFINITY),
                Some(f64::NEG_INFINITY),
                Some(5.0),
                None,
                Some(f64::NAN),
            ],
        )];
        let bars = normalize(&RawTable::Flat(FlatTable::new(yahoo_columns(), rows))).unwrap();

        assert_eq!(bars, vec![DailyBar::close_only(date(2024, 1, 2), 5.0)]);
    }

    #[test]
    fn test_row_without_close_is_skipped() {
        let rows = vec![
            RawRow::new(date(2024, 1, 2), vec![Some(1.0), Some(1.0), Some(1.0), None, None, None]),
            RawRow::new(date(2024, 1, 3), vec![None, None, None, Some(2.0), None, None]),
        ];
        let bars = normalize(&RawTable::Flat(FlatTable::new(yahoo_columns(), rows))).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(2024, 1, 3));
    }

    #[test]
    fn test_header_spellings() {
        let table = RawTable::series(
            date(2024, 1, 2),
            [("close", Some(1.0)), ("adj_close", Some(0.9)), ("Dividends", Some(0.0))],
        );
        let bars = normalize(&table).unwrap();
        assert_eq!(bars[0].adj_close, Some(0.9));
    }

    #[test]
    fn test_ragged_row() {
        let table = RawTable::Flat(FlatTable::new(
            ["Close", "Volume"],
            vec![RawRow::new(date(2024, 1, 2), vec![Some(1.0)])],
        ));
        assert!(matches!(normalize(&table), Err(QuotesError::Data(_))));
    }

    #[test]
    fn test_duplicate_dates_keep_later() {
        let table = RawTable::Flat(FlatTable::new(
            ["Close"],
            vec![
                RawRow::new(date(2024, 1, 2), vec![Some(1.0)]),
                RawRow::new(date(2024, 1, 2), vec![Some(2.0)]),
            ],
        ));
        let bars = normalize(&table).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 2.0);
    }
}
