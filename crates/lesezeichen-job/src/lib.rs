// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lesezeichen Job — runs one bookmark filtering request inside an isolated
// worker process with a wall-clock deadline. The PDF library can hang on
// malformed input and the filter has no way to interrupt it, so the only
// reliable cancellation is killing the worker and discarding its output.

pub mod naming;
pub mod supervisor;
pub mod worker;

pub use supervisor::{FilterJob, JobOutcome, WorkerCommand};
pub use worker::{WorkerReply, WorkerRequest, run_worker};
