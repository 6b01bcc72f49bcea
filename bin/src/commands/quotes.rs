//! Quotes command implementation.

use super::Context;
use crate::display::{Format, write_quotes};
use anyhow::Result;
use etfquotes_lib::prelude::*;
use std::io::{BufWriter, Write};

/// Print stored quotes for a ticker over a named period.
pub(crate) async fn quotes(ctx: &Context, symbol: &str, period: &str, format: Format) -> Result<()> {
    let period: QuotePeriod = period.parse()?;
    let ticker = Ticker::parse(symbol)?;

    let rows = ctx.reader().get_quotes(&ticker, period).await?;
    if rows.is_empty() && !ctx.quiet {
        eprintln!("No quotes stored for {ticker} ({period})");
    }

    let mut out = BufWriter::new(std::io::stdout());
    write_quotes(&rows, format, &mut out)?;
    out.flush()?;
    Ok(())
}
