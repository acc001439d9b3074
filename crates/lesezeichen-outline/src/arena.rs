// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory outline host backed by an index arena.

use std::borrow::Cow;

use lesezeichen_core::error::{LesezeichenError, Result};

use crate::node::OutlineNode;
use crate::tree::OutlineTree;

/// Handle to a node stored in an [`OutlineArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Slot {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable outline with parent links, implementing [`OutlineTree`].
///
/// Removed nodes stay in the arena as detached slots; they are simply no
/// longer reachable from the root.
#[derive(Debug, Clone, Default)]
pub struct OutlineArena {
    slots: Vec<Slot>,
    root: Option<NodeId>,
}

impl OutlineArena {
    /// An arena with no outline at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// An arena holding only a root node.
    pub fn with_root(label: impl Into<String>) -> Self {
        let mut arena = Self::new();
        let root = arena.alloc(label.into());
        arena.root = Some(root);
        arena
    }

    pub fn from_node(node: &OutlineNode) -> Self {
        let mut arena = Self::with_root(node.label.clone());
        if let Some(root) = arena.root {
            arena.append_subtrees(root, &node.children);
        }
        arena
    }

    /// Append a new node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>) -> Result<NodeId> {
        self.slot(parent)?;
        let child = self.alloc(label.into());
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
        Ok(child)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slots.get(node.0).and_then(|slot| slot.parent)
    }

    /// Snapshot of the tree reachable from the root.
    pub fn to_node(&self) -> Option<OutlineNode> {
        self.root.map(|root| self.snapshot(root))
    }

    /// Number of nodes reachable from the root, root included.
    pub fn reachable_count(&self) -> usize {
        self.to_node().map_or(0, |node| node.count())
    }

    fn alloc(&mut self, label: String) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            label,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn append_subtrees(&mut self, parent: NodeId, children: &[OutlineNode]) {
        for child in children {
            let id = self.alloc(child.label.clone());
            self.slots[id.0].parent = Some(parent);
            self.slots[parent.0].children.push(id);
            self.append_subtrees(id, &child.children);
        }
    }

    fn snapshot(&self, node: NodeId) -> OutlineNode {
        let slot = &self.slots[node.0];
        OutlineNode {
            label: slot.label.clone(),
            children: slot.children.iter().map(|&c| self.snapshot(c)).collect(),
        }
    }

    fn slot(&self, node: NodeId) -> Result<&Slot> {
        self.slots.get(node.0).ok_or_else(|| {
            LesezeichenError::StructuralAccess(format!("node {} does not exist", node.0))
        })
    }

    /// True if `ancestor` is `node` or lies on the parent chain above it.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

impl OutlineTree for OutlineArena {
    type NodeRef = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.slots.get(node.0).map_or(0, |slot| slot.children.len())
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.slots
            .get(node.0)
            .and_then(|slot| slot.children.get(index).copied())
    }

    fn label(&self, node: NodeId) -> Cow<'_, str> {
        self.slots
            .get(node.0)
            .map_or(Cow::Borrowed(""), |slot| Cow::Borrowed(slot.label.as_str()))
    }

    fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let count = self.slot(parent)?.children.len();
        if let Some(existing) = self.slot(child)?.parent {
            return Err(LesezeichenError::StructuralAccess(format!(
                "node {} is still attached to node {}",
                child.0, existing.0
            )));
        }
        if Some(child) == self.root || self.is_ancestor_or_self(child, parent) {
            return Err(LesezeichenError::StructuralAccess(format!(
                "inserting node {} under node {} would create a cycle",
                child.0, parent.0
            )));
        }
        if index > count {
            return Err(LesezeichenError::StructuralAccess(format!(
                "insert index {index} out of range (node {} has {count} children)",
                parent.0
            )));
        }
        self.slots[parent.0].children.insert(index, child);
        self.slots[child.0].parent = Some(parent);
        Ok(())
    }

    fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        let count = self.slot(parent)?.children.len();
        if index >= count {
            return Err(LesezeichenError::StructuralAccess(format!(
                "remove index {index} out of range (node {} has {count} children)",
                parent.0
            )));
        }
        let child = self.slots[parent.0].children.remove(index);
        self.slots[child.0].parent = None;
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (OutlineArena, NodeId, NodeId, NodeId) {
        let mut arena = OutlineArena::with_root("Root");
        let root = arena.root().unwrap();
        let a = arena.add_child(root, "A").unwrap();
        let b = arena.add_child(root, "B").unwrap();
        (arena, root, a, b)
    }

    #[test]
    fn empty_arena_has_no_root() {
        let arena = OutlineArena::new();
        assert!(arena.root().is_none());
        assert!(arena.to_node().is_none());
        assert_eq!(arena.reachable_count(), 0);
    }

    #[test]
    fn child_at_out_of_range_is_none() {
        let (arena, root, _, _) = sample();
        assert!(arena.child_at(root, 2).is_none());
    }

    #[test]
    fn insert_at_count_appends() {
        let (mut arena, root, a, _) = sample();
        let removed = arena.remove_child_at(root, 0).unwrap();
        assert_eq!(removed, a);
        arena.insert_child_at(root, 1, a).unwrap();
        assert_eq!(arena.children(root).len(), 2);
        assert_eq!(arena.to_node().unwrap().labels(), vec!["B", "A"]);
    }

    #[test]
    fn insert_past_end_fails() {
        let (mut arena, root, a, _) = sample();
        arena.remove_child_at(root, 0).unwrap();
        assert!(matches!(
            arena.insert_child_at(root, 5, a),
            Err(LesezeichenError::StructuralAccess(_))
        ));
    }

    #[test]
    fn attached_node_cannot_gain_second_parent() {
        let (mut arena, _, a, b) = sample();
        assert!(arena.insert_child_at(b, 0, a).is_err());
        assert_eq!(arena.parent(a), arena.root());
    }

    #[test]
    fn detached_node_cannot_adopt_its_ancestor() {
        let (mut arena, root, a, _) = sample();
        let inner = arena.add_child(a, "Inner").unwrap();
        let detached = arena.remove_child_at(root, 0).unwrap();
        assert_eq!(detached, a);
        assert!(arena.insert_child_at(inner, 0, a).is_err());
    }

    #[test]
    fn remove_invalid_index_fails() {
        let (mut arena, root, _, _) = sample();
        assert!(matches!(
            arena.remove_child_at(root, 2),
            Err(LesezeichenError::StructuralAccess(_))
        ));
    }

    #[test]
    fn round_trips_owned_tree() {
        let node = OutlineNode::with_children(
            "Root",
            vec![
                OutlineNode::with_children("A", vec![OutlineNode::new("A1")]),
                OutlineNode::new(""),
            ],
        );
        let arena = OutlineArena::from_node(&node);
        assert_eq!(arena.to_node(), Some(node));
        assert_eq!(arena.reachable_count(), 4);
    }
}
