// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lesezeichen.

use thiserror::Error;

/// Top-level error type for all Lesezeichen operations.
///
/// None of these are retried internally. A `StructuralAccess` or `Cancelled`
/// error leaves the outline partially mutated; the document must be discarded.
#[derive(Debug, Error)]
pub enum LesezeichenError {
    // -- Outline errors --
    #[error("outline structure access failed: {0}")]
    StructuralAccess(String),

    #[error("outline filtering was cancelled")]
    Cancelled,

    // -- Supervision --
    #[error("processing timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("worker failed: {0}")]
    Worker(String),

    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LesezeichenError>;
