// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lesezeichen_core::config::FilterConfig;
use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_document::{OutlineDocument, OutlineEntry};
use lesezeichen_job::naming::{default_output_path, output_file_name};
use lesezeichen_job::{FilterJob, JobOutcome, WorkerCommand, WorkerReply, WorkerRequest, run_worker};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::FilterArgs;

/// Build the job from config file, then CLI overrides.
pub fn build_job(args: &FilterArgs) -> Result<FilterJob> {
    let mut config = match &args.config {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };
    if let Some(patterns) = args.patterns() {
        config.patterns = patterns;
    }
    if let Some(seconds) = args.timeout {
        config.timeout_secs = seconds;
    }
    config.validate()?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => resolve_output(&args.input, config.work_dir()),
    };
    if output == args.input {
        return Err(LesezeichenError::InvalidConfig(
            "output path must differ from the input".into(),
        ));
    }
    Ok(FilterJob::from_config(&args.input, output, &config))
}

fn resolve_output(input: &Path, work_dir: Option<&Path>) -> PathBuf {
    match work_dir {
        Some(dir) => dir.join(output_file_name(input)),
        None => default_output_path(input),
    }
}

pub async fn filter(args: FilterArgs) -> Result<()> {
    let job = build_job(&args)?;
    info!(job = %job.id, patterns = %job.spec, "Filtering {}", job.input.display());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping job");
            on_interrupt.cancel();
        }
    });

    let outcome = if args.in_process {
        job.run_in_process(&cancel).await?
    } else {
        job.run(&WorkerCommand::current_exe()?, &cancel).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", summary(&outcome, &job));
    }
    Ok(())
}

fn summary(outcome: &JobOutcome, job: &FilterJob) -> String {
    let report = &outcome.report;
    if report.is_noop() {
        return format!(
            "No bookmarks matched ({}). Wrote {}",
            job.spec,
            outcome.output.display()
        );
    }
    format!(
        "Removed {} bookmark(s) containing: {} ({} promoted) in {}. Wrote {}",
        report.removed,
        job.spec,
        report.promoted,
        format_elapsed(outcome.elapsed),
        outcome.output.display()
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

pub fn show(input: &Path) -> Result<()> {
    let document = OutlineDocument::open(input)?;
    let entries = document.outline_entries()?;
    if entries.is_empty() {
        println!("No bookmarks found.");
    } else {
        print!("{}", render_entries(&entries));
    }
    Ok(())
}

fn render_entries(entries: &[OutlineEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}{}\n", "  ".repeat(entry.level), entry.title))
        .collect()
}

/// Worker mode. Always prints exactly one reply line, even for a bad request.
pub fn worker(raw_request: &str) -> Result<()> {
    let reply = match serde_json::from_str::<WorkerRequest>(raw_request) {
        Ok(request) => run_worker(&request),
        Err(err) => WorkerReply::failed(format!("invalid worker request: {}", err)),
    };
    println!("{}", serde_json::to_string(&reply)?);
    Ok(())
}
