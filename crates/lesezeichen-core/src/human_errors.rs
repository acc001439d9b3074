// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::LesezeichenError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running the whole operation again from the original file may work.
    Transient,
    /// The user must change something (path, config, file type).
    ActionRequired,
    /// The input itself is broken; retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the operation again from scratch could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LesezeichenError` into a `HumanError`.
pub fn humanize_error(err: &LesezeichenError) -> HumanError {
    match err {
        LesezeichenError::StructuralAccess(_) => HumanError {
            message: "The bookmarks in this PDF are damaged.".into(),
            suggestion: "The outline could not be walked safely, so no output was kept. Try re-saving the PDF in another viewer first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LesezeichenError::Cancelled => HumanError {
            message: "Bookmark filtering was cancelled.".into(),
            suggestion: "No output was kept. Run the command again to start over.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesezeichenError::Timeout { seconds } => HumanError {
            message: format!(
                "PDF processing timed out (over {seconds} seconds). The PDF may be corrupted."
            ),
            suggestion: "Try a different copy of the file, or raise the timeout with --timeout.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesezeichenError::Worker(detail) => HumanError {
            message: "The PDF could not be processed.".into(),
            suggestion: format!("No output was kept. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        LesezeichenError::UnsupportedDocument(detail) => HumanError {
            message: "File must be a PDF.".into(),
            suggestion: format!("Choose a file ending in .pdf. (Got: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LesezeichenError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it in a PDF viewer first to check it works.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LesezeichenError::InvalidConfig(detail) => HumanError {
            message: "The configuration file isn't valid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LesezeichenError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing a file.".into(),
                    suggestion: "Check the file permissions, or choose a different output location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        LesezeichenError::Serialization(_) => HumanError {
            message: "A settings or worker message couldn't be read.".into(),
            suggestion: "Check the configuration file is valid JSON and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
