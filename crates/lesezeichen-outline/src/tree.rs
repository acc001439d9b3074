// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability contract a host document must provide for its outline.

use std::borrow::Cow;
use std::fmt::Debug;

use lesezeichen_core::error::Result;

/// Ordered, rooted bookmark tree addressed through opaque node handles.
///
/// Implementations must keep every node under at most one parent. Hosts
/// reject an insert of a node that is still attached elsewhere with
/// `LesezeichenError::StructuralAccess`.
pub trait OutlineTree {
    /// Handle to a node. Cheap to copy, stable across mutations.
    type NodeRef: Copy + Eq + Debug;

    /// Root of the outline, or `None` when the document has no outline.
    fn root(&self) -> Option<Self::NodeRef>;

    /// Number of direct children.
    fn child_count(&self, node: Self::NodeRef) -> usize;

    /// Child at `index`, or `None` when the index is out of range or the
    /// child cannot be reached.
    fn child_at(&self, node: Self::NodeRef, index: usize) -> Option<Self::NodeRef>;

    /// Display title. An absent title is the empty string.
    fn label(&self, node: Self::NodeRef) -> Cow<'_, str>;

    /// Insert a detached `child` under `parent` at `index`.
    /// `index == child_count(parent)` appends.
    fn insert_child_at(
        &mut self,
        parent: Self::NodeRef,
        index: usize,
        child: Self::NodeRef,
    ) -> Result<()>;

    /// Detach and return the child at `index`. The detached node keeps its
    /// own children.
    fn remove_child_at(&mut self, parent: Self::NodeRef, index: usize) -> Result<Self::NodeRef>;

    /// All reachable direct children, in order.
    fn children(&self, node: Self::NodeRef) -> Vec<Self::NodeRef> {
        (0..self.child_count(node))
            .filter_map(|index| self.child_at(node, index))
            .collect()
    }
}
