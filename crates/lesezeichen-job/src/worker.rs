// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Worker side of a filtering job: one request in, one reply out.

use std::path::PathBuf;

use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_core::types::{FilterReport, FilterSpec};
use lesezeichen_document::{OutlineDocument, remove_filtered_bookmarks};
use lesezeichen_outline::OutlineFilter;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What the supervisor asks a worker to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub spec: FilterSpec,
}

/// The single JSON line a worker process prints on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub report: Option<FilterReport>,
}

impl WorkerReply {
    pub fn succeeded(report: FilterReport) -> Self {
        Self {
            success: true,
            error: None,
            report: Some(report),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            report: None,
        }
    }
}

/// Run a request to completion, capturing any error into the reply.
pub fn run_worker(request: &WorkerRequest) -> WorkerReply {
    info!(input = %request.input.display(), patterns = %request.spec, "Processing");
    let filter = OutlineFilter::new(request.spec.clone());
    match remove_filtered_bookmarks(&request.input, &request.output, &filter) {
        Ok(report) => WorkerReply::succeeded(report),
        Err(err) => {
            warn!(%err, "Worker error");
            WorkerReply::failed(err.to_string())
        }
    }
}

/// Filter with cooperative cancellation. Nothing is written once `cancel`
/// has fired.
pub fn filter_document(request: &WorkerRequest, cancel: &CancellationToken) -> Result<FilterReport> {
    let filter = OutlineFilter::new(request.spec.clone()).with_cancellation(cancel.clone());
    let mut document = OutlineDocument::open(&request.input)?;
    let report = document.filter_bookmarks(&filter)?;
    if cancel.is_cancelled() {
        return Err(LesezeichenError::Cancelled);
    }
    document.save(&request.output)?;
    Ok(report)
}
