//! Named lookback periods for quote queries.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;


/// Lookback window for a quote query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuotePeriod {
    /// Last five days.
    #[serde(rename = "5D")]
    FiveDays,
    /// Last month.
    #[serde(rename = "1M")]
    OneMonth,
    /// Last three months.
    #[serde(rename = "3M")]
    ThreeMonths,
    /// Last six months.
    #[serde(rename = "6M")]
    SixMonths,
    /// Last year.
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    /// Since January 1 of the current year.
    #[serde(rename = "YTD")]
    YearToDate,
    /// Last five years.
    #[serde(rename = "5Y")]
    FiveYears,
    /// Full stored history.
    #[serde(rename = "Max")]
    Max,
}

impl QuotePeriod {
    /// Returns the period identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiveDays => "5D",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::YearToDate => "YTD",
            Self::FiveYears => "5Y",
            Self::Max => "Max",
        }
    }

    /// Returns all periods, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FiveDays,
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::OneYear,
            Self::YearToDate,
            Self::FiveYears,
            Self::Max,
        ]
    }

    /// Computes the exclusive cutoff date relative to `today`.
    ///
    /// Queries return rows strictly after the cutoff. [`Max`](Self::Max) has
    /// no cutoff and covers all stored history. Month arithmetic clamps to the
    /// last day of the target month (e.g. May 31 minus one month is April 30).
    #[must_use]
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::FiveDays => today.checked_sub_days(Days::new(5)),
            Self::OneMonth => today.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Self::SixMonths => today.checked_sub_months(Months::new(6)),
            Self::OneYear => today.checked_sub_months(Months::new(12)),
            Self::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Self::FiveYears => today.checked_sub_months(Months::new(60)),
            Self::Max => None,
        }
    }
}

impl std::fmt::Display for QuotePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuotePeriod {
    type Err = QuotePeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|period| period.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| QuotePeriodParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown period string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePeriodParseError(String);

impl std::fmt::Display for QuotePeriodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<_> = QuotePeriod::all().iter().map(QuotePeriod::as_str).collect();
        write!(
            f,
            "Invalid period '{}'. Valid periods are: {}",
            self.0,
            valid.join(", ")
        )
    }
}

impl std::error::Error for QuotePeriodParseError {}
