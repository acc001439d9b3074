// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-place outline filter.
//
// Each sibling list is walked from the last child to the first. A child is
// filtered recursively before it is tested, so by the time a matched child is
// removed its own children are already clean and can be promoted as they are.
// Working back-to-front means a removal or insertion at position `i` never
// shifts the positions `0..i` that are still to be visited.

use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_core::types::{FilterReport, FilterSpec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::tree::OutlineTree;

/// Removes matching bookmarks from an outline, promoting their children.
#[derive(Debug, Clone, Default)]
pub struct OutlineFilter {
    spec: FilterSpec,
    cancel: Option<CancellationToken>,
}

impl OutlineFilter {
    pub fn new(spec: FilterSpec) -> Self {
        Self { spec, cancel: None }
    }

    /// Check `token` before every sibling step and stop with
    /// `LesezeichenError::Cancelled` once it fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Filter `tree` in place.
    ///
    /// The root is never tested. A tree without a root is left alone and
    /// reported as an empty pass. On error the tree may be half-filtered and
    /// must not be used.
    #[instrument(skip_all, fields(patterns = %self.spec))]
    pub fn apply<T: OutlineTree>(&self, tree: &mut T) -> Result<FilterReport> {
        let Some(root) = tree.root() else {
            debug!("document has no outline, nothing to filter");
            return Ok(FilterReport::empty());
        };

        let mut report = FilterReport::empty();
        self.clean(tree, root, &mut report)?;

        info!(
            visited = report.visited,
            removed = report.removed,
            promoted = report.promoted,
            skipped = report.skipped,
            "Outline filtered"
        );
        Ok(report)
    }

    fn clean<T: OutlineTree>(
        &self,
        tree: &mut T,
        parent: T::NodeRef,
        report: &mut FilterReport,
    ) -> Result<()> {
        let count = tree.child_count(parent);
        for index in (0..count).rev() {
            self.check_cancelled()?;

            let Some(child) = tree.child_at(parent, index) else {
                warn!(?parent, index, "Child unreachable, treating it as already gone");
                report.skipped += 1;
                continue;
            };

            self.clean(tree, child, report)?;
            report.visited += 1;

            let label = tree.label(child).into_owned();
            if self.spec.matches(&label) {
                let promoted = promote_children(tree, parent, index, child)?;
                debug!(%label, index, promoted, "Removed bookmark");
                report.removed += 1;
                report.promoted += promoted;
            }
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(LesezeichenError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Filter `tree` with `spec` and no cancellation.
pub fn filter_outline<T: OutlineTree>(tree: &mut T, spec: &FilterSpec) -> Result<FilterReport> {
    OutlineFilter::new(spec.clone()).apply(tree)
}

/// Replace `child` (at `index` under `parent`) with its own children.
///
/// The child is detached first, then each grandchild is moved out of it and
/// inserted at `index`, `index + 1`, ... so no node ever has two parents.
fn promote_children<T: OutlineTree>(
    tree: &mut T,
    parent: T::NodeRef,
    index: usize,
    child: T::NodeRef,
) -> Result<usize> {
    let detached = tree.remove_child_at(parent, index)?;
    if detached != child {
        return Err(LesezeichenError::StructuralAccess(format!(
            "expected {child:?} at index {index}, found {detached:?}"
        )));
    }

    let count = tree.child_count(child);
    for offset in 0..count {
        let grandchild = tree.remove_child_at(child, 0)?;
        tree.insert_child_at(parent, index + offset, grandchild)?;
    }
    Ok(count)
}
