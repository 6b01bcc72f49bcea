//! Import command implementation.
//!
//! Loads history for every tracked instrument from a directory of
//! `<TICKER>.csv` files, through the same incremental sync as the network
//! source, so re-running an import only appends newer dates.

use super::Context;
use super::sync_all::{finish, run_with_progress};
use anyhow::{Result, bail};
use etfquotes_lib::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Import CSV history files from `dir`.
pub(crate) async fn import(ctx: &Context, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let service = ctx.service_with(Arc::new(CsvDirSource::new(dir)));
    let summary = run_with_progress(&service, ctx.quiet).await?;
    finish(&summary, ctx.quiet)
}
