// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesezeichen-document — PDF documents as outline hosts.
//
// Loads the `/Outlines` linked list of a PDF into the `OutlineTree` contract,
// writes the filtered structure back, and builds small fixture PDFs.

pub mod pdf;

// Re-export the primary structs so callers can use `lesezeichen_document::OutlineDocument` etc.
pub use pdf::builder::PdfBuilder;
pub use pdf::outline::PdfOutline;
pub use pdf::reader::{OutlineDocument, OutlineEntry, remove_filtered_bookmarks};
