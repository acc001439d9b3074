// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned outline value tree and the rebuild form of the filter.

use lesezeichen_core::types::FilterSpec;
use serde::{Deserialize, Serialize};

/// A bookmark and the bookmarks nested under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Display title; empty when the bookmark has none.
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<OutlineNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::count).sum::<usize>()
    }

    /// Labels of all descendants in pre-order (the node itself excluded).
    pub fn labels(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_labels(&self.children, &mut out);
        out
    }

    /// Build a filtered copy of this tree.
    ///
    /// Traverses `self` read-only and assembles the result bottom-up: each
    /// child's subtree is filtered first, then a matched child is replaced by
    /// its filtered children in order. The root is kept whatever its label.
    pub fn filtered(&self, spec: &FilterSpec) -> OutlineNode {
        OutlineNode {
            label: self.label.clone(),
            children: filtered_children(&self.children, spec),
        }
    }
}

fn filtered_children(children: &[OutlineNode], spec: &FilterSpec) -> Vec<OutlineNode> {
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        let grandchildren = filtered_children(&child.children, spec);
        if spec.matches(&child.label) {
            kept.extend(grandchildren);
        } else {
            kept.push(OutlineNode {
                label: child.label.clone(),
                children: grandchildren,
            });
        }
    }
    kept
}

fn collect_labels<'a>(children: &'a [OutlineNode], out: &mut Vec<&'a str>) {
    for child in children {
        out.push(child.label.as_str());
        collect_labels(&child.children, out);
    }
}
