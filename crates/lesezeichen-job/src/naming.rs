// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input validation and output file naming.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lesezeichen_core::error::{LesezeichenError, Result};

/// Reject anything that does not end in `.pdf` (any case).
pub fn ensure_pdf(path: &Path) -> Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(())
    } else {
        Err(LesezeichenError::UnsupportedDocument(
            path.display().to_string(),
        ))
    }
}

/// Reduce a file name to ASCII letters, digits, `.`, `_` and `-`.
///
/// Whitespace becomes `_`, everything else is dropped, and leading dots or
/// underscores are stripped so the result can never name a hidden file or
/// climb out of a directory. Falls back to `document` when nothing is left.
pub fn sanitize_file_name(name: &str) -> String {
    let mapped: String = name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let trimmed = mapped.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `{stem}_output{.ext}` for the sanitised file name of `input`.
pub fn output_file_name(input: &Path) -> String {
    let raw = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let safe = sanitize_file_name(&raw);
    match safe.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_output.{ext}"),
        _ => format!("{safe}_output"),
    }
}

/// `input_{YYYYmmdd_HHMMSS}_{name}` for a copy staged in a shared work dir.
pub fn staged_input_name(name: &str, now: DateTime<Utc>) -> String {
    format!(
        "input_{}_{}",
        now.format("%Y%m%d_%H%M%S"),
        sanitize_file_name(name)
    )
}

/// Output path next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(output_file_name(input))
}
