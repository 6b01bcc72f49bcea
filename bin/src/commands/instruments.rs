//! Instruments command implementation.
//!
//! This module handles listing, adding and removing tracked instruments.

use super::Context;
use anyhow::{Result, bail};
use etfquotes_lib::prelude::*;

/// List tracked instruments with their stored history.
pub(crate) async fn list(ctx: &Context) -> Result<()> {
    let instruments = ctx.store.list_all().await?;

    if instruments.is_empty() {
        println!("No instruments tracked.");
        return Ok(());
    }

    println!(
        "{:<10} {:<40} {:<6} {:>8} {:<10}",
        "TICKER", "NAME", "KIND", "QUOTES", "LAST"
    );
    println!("{}", "-".repeat(78));

    for instrument in &instruments {
        let ticker = instrument.ticker();
        let count = ctx.store.count_rows(ticker).await?;
        let last = ctx
            .store
            .last_date(ticker)
            .await?
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        println!(
            "{:<10} {:<40} {:<6} {:>8} {:<10}",
            ticker.as_str(),
            instrument.name(),
            instrument.kind().as_str(),
            count,
            last
        );
    }

    println!("\nTotal: {} instruments", instruments.len());
    Ok(())
}

/// Track an instrument, or rename it if already tracked.
pub(crate) async fn add(ctx: &Context, symbol: &str, name: &str, kind: InstrumentKind) -> Result<()> {
    let ticker = Ticker::parse(symbol)?;
    let instrument = Instrument::new(ticker, name, kind);
    ctx.store.upsert(&instrument).await?;
    println!("Tracking {} ({})", instrument.ticker(), instrument.name());
    Ok(())
}

/// Stop tracking an instrument and delete its quotes.
pub(crate) async fn remove(ctx: &Context, symbol: &str) -> Result<()> {
    let ticker = Ticker::parse(symbol)?;
    if !ctx.store.remove(&ticker).await? {
        bail!("{ticker} is not tracked");
    }
    println!("Removed {ticker} and its quotes");
    Ok(())
}
