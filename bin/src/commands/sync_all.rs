//! Sync-all command implementation.
//!
//! Runs a batch sync over every tracked instrument, either with a progress
//! bar or as a stream of encoded progress events on stdout.

use super::Context;
use crate::display::{StreamFormat, print_summary};
use anyhow::{Result, bail};
use etfquotes_lib::prelude::*;
use etfquotes_lib::UpdateStatus;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

/// Sync every tracked instrument.
pub(crate) async fn sync_all(ctx: &Context, stream: Option<StreamFormat>) -> Result<()> {
    let service = ctx.service()?;

    if let Some(format) = stream {
        let encoding = EventEncoding::from(format);
        let mut events = service.update_all_streaming();
        let stdout = std::io::stdout();
        while let Some(event) = events.next().await {
            encoding.write_event(&event, stdout.lock())?;
            if event.is_terminal() {
                break;
            }
        }
        return Ok(());
    }

    let summary = run_with_progress(&service, ctx.quiet).await?;
    finish(&summary, ctx.quiet)
}

/// Print the summary and fail if any instrument failed.
pub(crate) fn finish(summary: &BatchSummary, quiet: bool) -> Result<()> {
    if !quiet {
        print_summary(summary);
    }
    if summary.failed_count > 0 {
        bail!(
            "{} of {} instruments failed",
            summary.failed_count,
            summary.total
        );
    }
    Ok(())
}

/// Run a batch sync, driving a progress bar from its events.
pub(crate) async fn run_with_progress(service: &QuoteService, quiet: bool) -> Result<BatchSummary> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
                .progress_chars("=>-"),
        );
        pb
    };

    let mut events = service.update_all_streaming();
    while let Some(event) = events.next().await {
        match event {
            ProgressEvent::Progress(p) => {
                progress.set_length(p.total as u64);
                progress.set_position(p.current as u64);
                progress.set_message(format!("{} {}", p.ticker, p.message));
                if p.status == UpdateStatus::Error {
                    progress.println(format!("  {} failed: {}", p.ticker, p.message));
                }
            }
            ProgressEvent::Completed(summary) => {
                progress.finish_and_clear();
                return Ok(summary);
            }
            ProgressEvent::Error { message } => {
                progress.abandon();
                bail!(message);
            }
        }
    }

    progress.abandon();
    bail!("Batch sync ended without a summary")
}
