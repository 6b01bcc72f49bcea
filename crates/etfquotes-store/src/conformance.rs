//! Behaviour shared by every store implementation, run against each of them.

use chrono::NaiveDate;
use etfquotes_types::{DailyBar, Instrument, QuoteRow, QuotesError, Ticker};

use crate::{InstrumentCatalog, QuoteStore};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn ticker(symbol: &str) -> Ticker {
    Ticker::parse(symbol).unwrap()
}

pub(crate) fn row(symbol: &str, date: NaiveDate, close: f64) -> QuoteRow {
    DailyBar {
        open: Some(close - 1.0),
        high: Some(close + 1.0),
        low: Some(close - 2.0),
        adj_close: Some(close),
        volume: Some(1_000),
        ..DailyBar::close_only(date, close)
    }
    .with_ticker(ticker(symbol))
}

async fn track<S: InstrumentCatalog>(store: &S, symbol: &str) {
    store
        .upsert(&Instrument::etf(ticker(symbol), format!("{symbol} ETF")))
        .await
        .unwrap();
}

pub(crate) async fn last_date_and_query<S: QuoteStore + InstrumentCatalog>(store: &S) {
    track(store, "ABC").await;
    let abc = ticker("ABC");
    assert_eq!(store.last_date(&abc).await.unwrap(), None);

    let rows = vec![
        row("ABC", date(2020, 1, 2), 10.0),
        row("ABC", date(2020, 1, 1), 9.0),
        row("ABC", date(2020, 1, 3), 11.0),
    ];
    assert_eq!(store.insert_rows(&abc, &rows).await.unwrap(), 3);
    assert_eq!(store.last_date(&abc).await.unwrap(), Some(date(2020, 1, 3)));
    assert_eq!(store.count_rows(&abc).await.unwrap(), 3);

    let after = store.query_rows(&abc, Some(date(2020, 1, 1))).await.unwrap();
    let dates: Vec<_> = after.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2020, 1, 2), date(2020, 1, 3)]);
    assert_eq!(after[0], rows[0]);

    let all = store.query_rows(&abc, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(store.query_rows(&ticker("NOPE"), None).await.unwrap().is_empty());

    track(store, "OLD").await;
    let old = ticker("OLD");
    let early = vec![row("OLD", date(1965, 3, 1), 1.0), row("OLD", date(1970, 1, 1), 2.0)];
    store.insert_rows(&old, &early).await.unwrap();
    assert_eq!(store.query_rows(&old, None).await.unwrap(), early);
}

pub(crate) async fn duplicate_rejected<S: QuoteStore + InstrumentCatalog>(store: &S) {
    track(store, "ABC").await;
    let abc = ticker("ABC");
    store
        .insert_rows(&abc, &[row("ABC", date(2020, 1, 2), 10.0)])
        .await
        .unwrap();

    let err = store
        .insert_rows(
            &abc,
            &[row("ABC", date(2020, 1, 3), 11.0), row("ABC", date(2020, 1, 2), 12.0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuotesError::DuplicateQuote { ref ticker, date: d } if ticker == "ABC" && d == date(2020, 1, 2)
    ));

    // The whole batch was rolled back and the original row kept.
    assert_eq!(store.count_rows(&abc).await.unwrap(), 1);
    let rows = store.query_rows(&abc, None).await.unwrap();
    assert_eq!(rows[0].close, 10.0);
}

pub(crate) async fn catalog_roundtrip<S: InstrumentCatalog>(store: &S) {
    assert!(store.list_all().await.unwrap().is_empty());

    store
        .upsert(&Instrument::etf(ticker("VWCE"), "Vanguard FTSE All-World"))
        .await
        .unwrap();
    store
        .upsert(&Instrument::index(ticker("^GSPC"), "S&P 500"))
        .await
        .unwrap();
    store
        .upsert(&Instrument::etf(ticker("CSSPX"), "iShares Core S&P 500"))
        .await
        .unwrap();
    // Upsert replaces the name.
    store
        .upsert(&Instrument::etf(ticker("VWCE"), "Vanguard All-World Acc"))
        .await
        .unwrap();

    let all = store.list_all().await.unwrap();
    let tickers: Vec<_> = all.iter().map(|i| i.ticker().as_str()).collect();
    assert_eq!(tickers, vec!["CSSPX", "VWCE", "^GSPC"]);

    let vwce = store.get(&ticker("VWCE")).await.unwrap().unwrap();
    assert_eq!(vwce.name(), "Vanguard All-World Acc");
    assert!(store.get(&ticker("NOPE")).await.unwrap().is_none());
}

pub(crate) async fn remove_cascades<S: QuoteStore + InstrumentCatalog>(store: &S) {
    track(store, "ABC").await;
    let abc = ticker("ABC");
    store
        .insert_rows(&abc, &[row("ABC", date(2020, 1, 2), 10.0)])
        .await
        .unwrap();

    assert!(store.remove(&abc).await.unwrap());
    assert!(!store.remove(&abc).await.unwrap());
    assert_eq!(store.count_rows(&abc).await.unwrap(), 0);
    assert_eq!(store.last_date(&abc).await.unwrap(), None);
}

pub(crate) async fn foreign_rows_rejected<S: QuoteStore + InstrumentCatalog>(store: &S) {
    track(store, "ABC").await;
    let err = store
        .insert_rows(&ticker("ABC"), &[row("XYZ", date(2020, 1, 2), 1.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, QuotesError::Store(_)));
}
