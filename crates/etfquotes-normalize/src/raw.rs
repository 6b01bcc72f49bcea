//! Raw tabular responses from a quote source.

use chrono::NaiveDate;

/// One row of a raw table: the date label and one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Row label.
    pub date: NaiveDate,
    /// Cell values, aligned with the table's columns. `None` or NaN means missing.
    pub values: Vec<Option<f64>>,
}

impl RawRow {
    /// Creates a new row.
    #[must_use]
    pub const fn new(date: NaiveDate, values: Vec<Option<f64>>) -> Self {
        Self { date, values }
    }
}

/// Table with a single header level, e.g. `Open, High, Low, Close, Adj Close, Volume`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    /// Column names.
    pub columns: Vec<String>,
    /// Rows labelled by date.
    pub rows: Vec<RawRow>,
}

impl FlatTable {
    /// Creates a flat table.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, rows: Vec<RawRow>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
        }
    }
}

/// Table whose headers carry a second level naming the ticker, e.g. `(Close, SPY)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTable {
    /// `(field, ticker)` column headers.
    pub columns: Vec<(String, String)>,
    /// Rows labelled by date.
    pub rows: Vec<RawRow>,
}

/// A raw response from a quote source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTable {
    /// Flat column headers.
    Flat(FlatTable),
    /// Column headers grouped by ticker.
    GroupedByTicker(GroupedTable),
}

impl RawTable {
    /// Builds a one-row table from a single labelled series of `(field, value)` pairs.
    #[must_use]
    pub fn series<S: Into<String>>(
        date: NaiveDate,
        fields: impl IntoIterator<Item = (S, Option<f64>)>,
    ) -> Self {
        let (columns, values): (Vec<String>, Vec<Option<f64>>) = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Self::Flat(FlatTable {
            columns,
            rows: vec![RawRow::new(date, values)],
        })
    }

    /// Returns the rows of the table.
    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        match self {
            Self::Flat(table) => &table.rows,
            Self::GroupedByTicker(table) => &table.rows,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_is_single_row() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let table = RawTable::series(date, [("Close", Some(10.0)), ("Volume", None)]);

        assert_eq!(table.len(), 1);
        let RawTable::Flat(flat) = table else {
            panic!("expected flat table");
        };
        assert_eq!(flat.columns, vec!["Close", "Volume"]);
        assert_eq!(flat.rows[0].values, vec![Some(10.0), None]);
    }

    #[test]
    fn test_empty_table() {
        let table = RawTable::Flat(FlatTable::default());
        assert!(table.is_empty());
        assert!(RawTable::GroupedByTicker(GroupedTable::default()).is_empty());
    }
}
