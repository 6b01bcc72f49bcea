//! Sync command implementation.
//!
//! Brings a single tracked ticker up to date.

use super::Context;
use anyhow::{Result, bail};

/// Sync one ticker and print the outcome.
pub(crate) async fn sync(ctx: &Context, symbol: &str) -> Result<()> {
    let instrument = ctx.tracked(symbol).await?;
    let ticker = instrument.ticker();
    let service = ctx.service()?;

    let outcome = service.update_quotes(ticker).await?;
    if let Some(reason) = outcome.failure_reason(ticker) {
        bail!(reason);
    }

    println!("{ticker}: {outcome}");
    Ok(())
}
