// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job supervisor — spawn a worker, enforce the deadline, clean up after it.
//
// The worker receives its `WorkerRequest` as JSON after `--request` and
// answers with one `WorkerReply` JSON line on stdout. Logs go to stderr.
// Any run that does not end in a successful reply removes the output file:
// a half-written PDF is never handed back.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lesezeichen_core::config::FilterConfig;
use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_core::types::{FilterReport, FilterSpec, JobId};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::naming::ensure_pdf;
use crate::worker::{WorkerReply, WorkerRequest, filter_document};

/// Default wall-clock limit for one job.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How to start a worker process. The supervisor appends
/// `--request <json>` to these arguments.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// This executable's own hidden `worker` subcommand.
    pub fn current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?).arg("worker"))
    }
}

/// A finished job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub output: PathBuf,
    pub report: FilterReport,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// One filtering request: input PDF, output path, patterns, deadline.
#[derive(Debug, Clone)]
pub struct FilterJob {
    pub id: JobId,
    pub input: PathBuf,
    pub output: PathBuf,
    pub spec: FilterSpec,
    pub timeout: Duration,
}

enum Ending {
    Finished(std::io::Result<(ExitStatus, String)>),
    TimedOut,
    Cancelled,
}

impl FilterJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, spec: FilterSpec) -> Self {
        Self {
            id: JobId::new(),
            input: input.into(),
            output: output.into(),
            spec,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        config: &FilterConfig,
    ) -> Self {
        Self::new(input, output, config.filter_spec()).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn request(&self) -> WorkerRequest {
        WorkerRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            spec: self.spec.clone(),
        }
    }

    /// Run the job in a separate worker process.
    ///
    /// On timeout or cancellation the worker is killed and the output removed.
    #[instrument(skip_all, fields(job = %self.id, input = %self.input.display()))]
    pub async fn run(&self, worker: &WorkerCommand, cancel: &CancellationToken) -> Result<JobOutcome> {
        ensure_pdf(&self.input)?;
        let request = serde_json::to_string(&self.request())?;
        let started_at = Utc::now();
        let started = Instant::now();

        let mut child = Command::new(&worker.program)
            .args(&worker.args)
            .arg("--request")
            .arg(&request)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                LesezeichenError::Worker(format!(
                    "failed to start worker {}: {}",
                    worker.program.display(),
                    err
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LesezeichenError::Worker("worker stdout unavailable".into()))?;
        info!(pid = child.id(), timeout_secs = self.timeout.as_secs(), "Worker started");

        let ending = tokio::select! {
            finished = tokio::time::timeout(self.timeout, collect(&mut child, stdout)) => {
                match finished {
                    Ok(result) => Ending::Finished(result),
                    Err(_) => Ending::TimedOut,
                }
            }
            _ = cancel.cancelled() => Ending::Cancelled,
        };

        let result = match ending {
            Ending::Finished(Ok((status, stdout))) => self.interpret(status, &stdout),
            Ending::Finished(Err(err)) => Err(LesezeichenError::Io(err)),
            Ending::TimedOut => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "PDF processing timed out, terminating worker"
                );
                terminate(&mut child).await;
                Err(LesezeichenError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
            Ending::Cancelled => {
                info!("Job cancelled, terminating worker");
                terminate(&mut child).await;
                Err(LesezeichenError::Cancelled)
            }
        };

        match result {
            Ok(report) => Ok(JobOutcome {
                job_id: self.id,
                output: self.output.clone(),
                report,
                started_at,
                elapsed: started.elapsed(),
            }),
            Err(err) => {
                discard(&self.output).await;
                Err(err)
            }
        }
    }

    /// Run the job on a blocking thread of this process.
    ///
    /// Only cooperative: on timeout the filter is asked to stop at its next
    /// sibling step, but a hang inside the PDF library cannot be interrupted.
    /// Use [`FilterJob::run`] for untrusted input.
    #[instrument(skip_all, fields(job = %self.id, input = %self.input.display()))]
    pub async fn run_in_process(&self, cancel: &CancellationToken) -> Result<JobOutcome> {
        ensure_pdf(&self.input)?;
        let started_at = Utc::now();
        let started = Instant::now();
        let token = cancel.child_token();
        let worker_token = token.clone();
        let request = self.request();

        let task = tokio::task::spawn_blocking(move || filter_document(&request, &worker_token));
        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(LesezeichenError::Worker(format!(
                "worker thread failed: {}",
                join_err
            ))),
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "PDF processing timed out");
                token.cancel();
                Err(LesezeichenError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        match result {
            Ok(report) => Ok(JobOutcome {
                job_id: self.id,
                output: self.output.clone(),
                report,
                started_at,
                elapsed: started.elapsed(),
            }),
            Err(err) => {
                discard(&self.output).await;
                Err(err)
            }
        }
    }

    fn interpret(&self, status: ExitStatus, stdout: &str) -> Result<FilterReport> {
        let reply = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str::<WorkerReply>(line).ok());

        let Some(reply) = reply else {
            return Err(LesezeichenError::Worker(if status.success() {
                "Unknown processing error".into()
            } else {
                format!("worker exited with {status}")
            }));
        };

        if !reply.success || !status.success() {
            return Err(LesezeichenError::Worker(
                reply
                    .error
                    .unwrap_or_else(|| format!("worker exited with {status}")),
            ));
        }
        if !self.output.exists() {
            return Err(LesezeichenError::Worker(
                "worker reported success but wrote no output".into(),
            ));
        }

        debug!(report = ?reply.report, "Worker finished");
        Ok(reply.report.unwrap_or_default())
    }
}

/// Read everything the worker prints, then reap it.
async fn collect(
    child: &mut Child,
    mut stdout: ChildStdout,
) -> std::io::Result<(ExitStatus, String)> {
    let mut buffer = String::new();
    stdout.read_to_string(&mut buffer).await?;
    let status = child.wait().await?;
    Ok((status, buffer))
}

async fn terminate(child: &mut Child) {
    if let Err(err) = child.kill().await {
        warn!(%err, "Failed to kill worker");
    }
}

/// Remove a partial or failed output. A missing file is fine.
async fn discard(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!(path = %output.display(), "Discarded output"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(%err, path = %output.display(), "Failed to discard output"),
    }
}
