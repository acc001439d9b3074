// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outline document — open a PDF, inspect and filter its bookmarks, and save
// the result using the `lopdf` crate.

use std::path::Path;

use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_core::types::FilterReport;
use lesezeichen_outline::{OutlineFilter, OutlineNode};
use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::outline::{PdfOutline, read_outline};

/// One line of a flattened outline listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,
    /// Nesting depth; top-level bookmarks are level 0.
    pub level: usize,
}

/// A PDF whose bookmarks can be listed and filtered.
///
/// Wraps `lopdf::Document`. The document is owned by this struct; the filter
/// only ever borrows its outline.
pub struct OutlineDocument {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl OutlineDocument {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            LesezeichenError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a document from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LesezeichenError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            source_path: None,
        }
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the document was created via [`OutlineDocument::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// The outline as an owned tree, or `None` when the PDF has no bookmarks.
    pub fn outline(&self) -> Result<Option<OutlineNode>> {
        read_outline(&self.document)
    }

    /// Bookmarks in reading order with their nesting level.
    pub fn outline_entries(&self) -> Result<Vec<OutlineEntry>> {
        let mut entries = Vec::new();
        if let Some(root) = self.outline()? {
            flatten(&root.children, 0, &mut entries);
        }
        Ok(entries)
    }

    // -- Filtering ------------------------------------------------------------

    /// Remove matching bookmarks and write the new structure into the document.
    ///
    /// On error the document must be discarded; the in-memory outline may be
    /// half-filtered even though nothing was committed.
    #[instrument(skip_all, fields(source = self.source_path.as_deref().unwrap_or("<memory>")))]
    pub fn filter_bookmarks(&mut self, filter: &OutlineFilter) -> Result<FilterReport> {
        let mut outline = PdfOutline::load(&mut self.document)?;
        let report = filter.apply(&mut outline)?;
        let deleted = outline.commit()?;

        info!(
            removed = report.removed,
            promoted = report.promoted,
            deleted_objects = deleted,
            "Removed bookmarks containing: {}",
            filter.spec()
        );
        Ok(report)
    }

    // -- Output ---------------------------------------------------------------

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            LesezeichenError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;
        Ok(output)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path_ref = path.as_ref();
        self.document.save(path_ref).map_err(|err| {
            LesezeichenError::PdfError(format!("save failed for {}: {}", path_ref.display(), err))
        })?;
        debug!("PDF saved");
        Ok(())
    }
}

/// Open `input`, filter its bookmarks, and save the result to `output`.
pub fn remove_filtered_bookmarks(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    filter: &OutlineFilter,
) -> Result<FilterReport> {
    let mut document = OutlineDocument::open(input)?;
    let report = document.filter_bookmarks(filter)?;
    document.save(output)?;
    Ok(report)
}

fn flatten(nodes: &[OutlineNode], level: usize, out: &mut Vec<OutlineEntry>) {
    for node in nodes {
        out.push(OutlineEntry {
            title: node.label.clone(),
            level,
        });
        flatten(&node.children, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use lesezeichen_core::FilterSpec;
    use lesezeichen_outline::CancellationToken;

    use super::*;
    use crate::pdf::builder::PdfBuilder;

    fn n(label: &str, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode::with_children(label, children)
    }

    fn leaf(label: &str) -> OutlineNode {
        OutlineNode::new(label)
    }

    fn fixture(tree: OutlineNode) -> OutlineDocument {
        let bytes = PdfBuilder::new().pages(4).outline(tree).to_bytes().unwrap();
        OutlineDocument::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn filtered_document_survives_reload() {
        let mut doc = fixture(n(
            "",
            vec![
                n(".pdf", vec![n(".pdf", vec![leaf("Real")])]),
                leaf("chapter.pdf"),
                leaf("Intro"),
            ],
        ));
        let report = doc
            .filter_bookmarks(&OutlineFilter::new(FilterSpec::default()))
            .unwrap();
        assert_eq!(report.removed, 3);

        let reloaded = OutlineDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(
            reloaded.outline().unwrap(),
            Some(n("", vec![leaf("Real"), leaf("Intro")]))
        );
        assert_eq!(reloaded.page_count(), 4);
    }

    #[test]
    fn entries_carry_levels() {
        let doc = fixture(n("", vec![n("Part", vec![leaf("Ch1")]), leaf("Index")]));
        let entries = doc.outline_entries().unwrap();
        let flat: Vec<(&str, usize)> = entries.iter().map(|e| (e.title.as_str(), e.level)).collect();
        assert_eq!(flat, vec![("Part", 0), ("Ch1", 1), ("Index", 0)]);
    }

    #[test]
    fn document_without_outline_is_noop() {
        let bytes = PdfBuilder::new().pages(2).to_bytes().unwrap();
        let mut doc = OutlineDocument::from_bytes(&bytes).unwrap();
        let report = doc
            .filter_bookmarks(&OutlineFilter::new(FilterSpec::default()))
            .unwrap();
        assert_eq!(report, FilterReport::empty());
        assert!(doc.outline_entries().unwrap().is_empty());
        assert!(!doc.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn cancelled_filter_leaves_document_uncommitted() {
        let tree = n("", vec![leaf("a.pdf"), leaf("Keep")]);
        let mut doc = fixture(tree.clone());
        let token = CancellationToken::new();
        token.cancel();
        let filter = OutlineFilter::new(FilterSpec::default()).with_cancellation(token);

        assert!(matches!(
            doc.filter_bookmarks(&filter),
            Err(LesezeichenError::Cancelled)
        ));
        assert_eq!(doc.outline().unwrap(), Some(tree));
    }

    #[test]
    fn garbage_bytes_are_pdf_error() {
        assert!(matches!(
            OutlineDocument::from_bytes(b"not a pdf"),
            Err(LesezeichenError::PdfError(_))
        ));
    }

    #[test]
    fn remove_filtered_bookmarks_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.pdf");
        let output = dir.path().join("book_output.pdf");
        let bytes = PdfBuilder::new()
            .outline(n(
                "",
                vec![n("Outline Placeholder", vec![leaf("Ch1"), leaf("Ch2")])],
            ))
            .to_bytes()
            .unwrap();
        std::fs::write(&input, bytes).unwrap();

        let report = remove_filtered_bookmarks(
            &input,
            &output,
            &OutlineFilter::new(FilterSpec::default()),
        )
        .unwrap();
        assert_eq!(report.promoted, 2);

        let saved = OutlineDocument::open(&output).unwrap();
        assert_eq!(saved.source_path(), Some(output.display().to_string().as_str()));
        assert_eq!(
            saved.outline().unwrap(),
            Some(n("", vec![leaf("Ch1"), leaf("Ch2")]))
        );
    }

    #[test]
    fn missing_input_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = remove_filtered_bookmarks(
            dir.path().join("missing.pdf"),
            dir.path().join("out.pdf"),
            &OutlineFilter::default(),
        );
        assert!(matches!(result, Err(LesezeichenError::PdfError(_))));
        assert!(!dir.path().join("out.pdf").exists());
    }
}
