//! Yahoo Finance chart API source.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use etfquotes_normalize::{FlatTable, RawRow, RawTable};
use etfquotes_types::{DateRange, Result, Ticker};
use log::debug;
use serde::Deserialize;

use crate::{ClientConfig, FetchError, HttpClient, QuoteSource};

/// Default base URL of the chart endpoint.
pub const YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

const COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Daily quotes from the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooSource {
    client: HttpClient,
    base_url: String,
}

impl YahooSource {
    /// Creates a source using `client` and the public endpoint.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, YAHOO_BASE_URL)
    }

    /// Creates a source against a different endpoint (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a source from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: ClientConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self::new(HttpClient::new(config)?))
    }

    /// Builds the chart URL. `period2` is exclusive, so it is the day after `range.end`.
    fn chart_url(&self, ticker: &Ticker, range: DateRange) -> String {
        let period1 = range.start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = range
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(range.end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/{ticker}?period1={period1}&period2={period2}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url
        )
    }
}

/// Parses a chart response body into a flat table.
///
/// Returns `Ok(None)` if the provider reports no data for the symbol or the
/// window contains no bars.
fn parse_chart(body: &str, url: &str) -> std::result::Result<Option<RawTable>, FetchError> {
    let response: ChartResponse = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        source: e,
    })?;

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return match response.chart.error {
            Some(err) if err.code == "Not Found" => Ok(None),
            Some(err) => Err(FetchError::Provider {
                code: err.code,
                description: err.description,
            }),
            None => Ok(None),
        };
    };

    let Some(timestamps) = data.timestamp else {
        return Ok(None);
    };
    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        // Bars are stamped at the exchange open; shift to exchange-local time for the date.
        let date: NaiveDate = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| FetchError::Provider {
                code: "Invalid timestamp".to_string(),
                description: ts.to_string(),
            })?;

        let values = vec![
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
            at(&adj_close, i),
            at(&quote.volume, i),
        ];
        // Holidays come back as all-null bars.
        if values.iter().all(Option::is_none) {
            continue;
        }
        rows.push(RawRow::new(date, values));
    }

    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(RawTable::Flat(FlatTable::new(COLUMNS, rows))))
}

#[async_trait]
impl QuoteSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(&self, ticker: &Ticker, range: DateRange) -> Result<Option<RawTable>> {
        let url = self.chart_url(ticker, range);
        debug!("Fetching {ticker} {range} from {url}");

        let Some(body) = self.client.get_text(&url).await? else {
            return Ok(None);
        };
        let table = parse_chart(&body, &url)?;
        debug!(
            "Yahoo returned {} rows for {ticker}",
            table.as_ref().map_or(0, RawTable::len)
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "SPY", "gmtoffset": -14400},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [472.16, null, 470.45],
                        "high": [473.67, null, 472.12],
                        "low": [470.49, null, 469.21],
                        "close": [472.65, null, 467.28],
                        "volume": [123623700, null, 103585900]
                    }],
                    "adjclose": [{"adjclose": [465.005, null, 459.77]}]
                }
            }],
            "error": null
        }
    }"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_chart() {
        let table = parse_chart(CHART, "test").unwrap().unwrap();
        let RawTable::Flat(flat) = table else {
            panic!("expected flat table");
        };

        assert_eq!(flat.columns, COLUMNS);
        // The all-null holiday bar is dropped.
        assert_eq!(flat.rows.len(), 2);
        assert_eq!(flat.rows[0].date, date(2024, 1, 2));
        assert_eq!(flat.rows[0].values[3], Some(472.65));
        assert_eq!(flat.rows[0].values[5], Some(123_623_700.0));
        assert_eq!(flat.rows[1].date, date(2024, 1, 4));
    }

    #[test]
    fn test_parse_chart_normalizes() {
        let table = parse_chart(CHART, "test").unwrap().unwrap();
        let bars = etfquotes_normalize::normalize(&table).unwrap();
        assert_eq!(bars[0].adj_close, Some(465.01));
        assert_eq!(bars[0].volume, Some(123_623_700));
    }

    #[test]
    fn test_parse_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart(body, "test").unwrap().is_none());
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1x is not supported"}}}"#;
        let err = parse_chart(body, "test").unwrap_err();
        assert!(matches!(err, FetchError::Provider { ref code, .. } if code == "Bad Request"));
    }

    #[test]
    fn test_parse_empty_window() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":3600},"indicators":{"quote":[{}],"adjclose":[{"adjclose":[]}]}}],"error":null}}"#;
        assert!(parse_chart(body, "test").unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_chart("<html>", "test"),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn test_chart_url_window() {
        let client = HttpClient::with_defaults().unwrap();
        let source = YahooSource::with_base_url(client, "http://localhost/chart/");
        let range = DateRange::new(date(1970, 1, 1), date(2024, 6, 14)).unwrap();
        let url = source.chart_url(&Ticker::parse("spy").unwrap(), range);
        assert_eq!(
            url,
            "http://localhost/chart/SPY?period1=0&period2=1718409600&interval=1d&events=history&includeAdjustedClose=true"
        );
    }
}
