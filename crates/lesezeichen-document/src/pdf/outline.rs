// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF outline host — exposes a document's `/Outlines` tree through the
// `OutlineTree` contract.
//
// PDF stores bookmarks as doubly linked sibling lists (/First /Last /Prev
// /Next) with /Parent back-links and signed /Count totals. Editing those links
// item by item is where index bugs hide, so the host reads the whole tree into
// parent/children tables once, lets the filter mutate the tables, and
// rewrites every link from the tables in `commit`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_outline::{OutlineNode, OutlineTree};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument, warn};

use super::text::decode_text_string;

/// Deepest nesting accepted while reading an outline.
pub const MAX_OUTLINE_DEPTH: usize = 256;

#[derive(Debug, Clone)]
struct Item {
    title: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    /// Original /Count was positive (item shown expanded).
    open: bool,
}

/// Parent/children tables read from a document's outline.
#[derive(Debug, Clone, Default)]
struct OutlineTables {
    root: Option<ObjectId>,
    items: HashMap<ObjectId, Item>,
}

impl OutlineTables {
    fn read(document: &Document) -> Result<Self> {
        let Some(root) = outlines_root(document)? else {
            return Ok(Self::default());
        };

        let mut tables = Self {
            root: Some(root),
            items: HashMap::new(),
        };
        tables.items.insert(
            root,
            Item {
                title: String::new(),
                parent: None,
                children: Vec::new(),
                open: true,
            },
        );

        let mut visited = HashSet::from([root]);
        tables.read_children(document, root, 0, &mut visited)?;
        debug!(items = tables.items.len() - 1, "Outline read");
        Ok(tables)
    }

    fn read_children(
        &mut self,
        document: &Document,
        parent: ObjectId,
        depth: usize,
        visited: &mut HashSet<ObjectId>,
    ) -> Result<()> {
        if depth >= MAX_OUTLINE_DEPTH {
            return Err(LesezeichenError::StructuralAccess(format!(
                "outline nested deeper than {MAX_OUTLINE_DEPTH} levels"
            )));
        }

        let mut current = reference(dictionary(document, parent)?, b"First");
        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(LesezeichenError::StructuralAccess(format!(
                    "outline item {} {} R is linked more than once",
                    id.0, id.1
                )));
            }

            let dict = dictionary(document, id)?;
            let title = dict
                .get(b"Title")
                .ok()
                .and_then(|title| decode_text_string(document, title))
                .unwrap_or_default();
            let open = dict
                .get(b"Count")
                .ok()
                .and_then(|count| count.as_i64().ok())
                .is_some_and(|count| count > 0);
            current = reference(dict, b"Next");

            self.items.insert(
                id,
                Item {
                    title,
                    parent: Some(parent),
                    children: Vec::new(),
                    open,
                },
            );
            if let Some(item) = self.items.get_mut(&parent) {
                item.children.push(id);
            }

            self.read_children(document, id, depth + 1, visited)?;
        }
        Ok(())
    }

    fn snapshot(&self, node: ObjectId) -> OutlineNode {
        match self.items.get(&node) {
            Some(item) => OutlineNode {
                label: item.title.clone(),
                children: item.children.iter().map(|&c| self.snapshot(c)).collect(),
            },
            None => OutlineNode::default(),
        }
    }

    /// Items reachable from the root, root first, in pre-order.
    fn reachable(&self) -> Vec<ObjectId> {
        let mut order = Vec::new();
        let mut stack: Vec<ObjectId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(item) = self.items.get(&id) {
                stack.extend(item.children.iter().rev().copied());
            }
        }
        order
    }

    /// Items that would be visible below `node` if it were expanded.
    fn visible_descendants(&self, node: ObjectId) -> i64 {
        let Some(item) = self.items.get(&node) else {
            return 0;
        };
        item.children
            .iter()
            .map(|child| {
                let nested = match self.items.get(child) {
                    Some(c) if c.open => self.visible_descendants(*child),
                    _ => 0,
                };
                1 + nested
            })
            .sum()
    }

    fn is_ancestor_or_self(&self, ancestor: ObjectId, node: ObjectId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.items.get(&id).and_then(|item| item.parent);
        }
        false
    }

    fn item(&self, id: ObjectId) -> Result<&Item> {
        self.items.get(&id).ok_or_else(|| {
            LesezeichenError::StructuralAccess(format!(
                "object {} {} R is not an outline item",
                id.0, id.1
            ))
        })
    }
}

/// Read-only snapshot of a document's outline. `None` when it has none.
pub fn read_outline(document: &Document) -> Result<Option<OutlineNode>> {
    let tables = OutlineTables::read(document)?;
    Ok(tables.root.map(|root| tables.snapshot(root)))
}

/// A document's outline, open for restructuring.
///
/// Changes live in memory until [`PdfOutline::commit`] writes them into the
/// document. Dropping the outline without committing leaves the document as
/// it was.
pub struct PdfOutline<'a> {
    document: &'a mut Document,
    tables: OutlineTables,
}

impl<'a> PdfOutline<'a> {
    #[instrument(skip_all)]
    pub fn load(document: &'a mut Document) -> Result<Self> {
        let tables = OutlineTables::read(document)?;
        Ok(Self { document, tables })
    }

    /// Current state of the tables as an owned tree.
    pub fn to_node(&self) -> Option<OutlineNode> {
        self.tables.root.map(|root| self.tables.snapshot(root))
    }

    /// Rewrite the outline links of every surviving item and delete the
    /// objects of items no longer reachable from the root.
    ///
    /// Returns the number of deleted items.
    #[instrument(skip_all)]
    pub fn commit(mut self) -> Result<usize> {
        let Some(root) = self.tables.root else {
            return Ok(0);
        };

        let reachable = self.tables.reachable();
        for &node in &reachable {
            self.relink(node, node == root)?;
        }

        let keep: HashSet<ObjectId> = reachable.into_iter().collect();
        let stale: Vec<ObjectId> = self
            .tables
            .items
            .keys()
            .filter(|id| !keep.contains(id))
            .copied()
            .collect();
        for id in &stale {
            self.document.objects.remove(id);
        }

        debug!(deleted = stale.len(), surviving = keep.len() - 1, "Outline committed");
        Ok(stale.len())
    }

    fn relink(&mut self, node: ObjectId, is_root: bool) -> Result<()> {
        let item = self.tables.item(node)?;
        let children = item.children.clone();
        let open = is_root || item.open;
        let visible = self.tables.visible_descendants(node);

        let dict = dictionary_mut(self.document, node)?;
        match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => {
                dict.set("First", Object::Reference(first));
                dict.set("Last", Object::Reference(last));
                dict.set("Count", Object::Integer(if open { visible } else { -visible }));
            }
            _ => {
                dict.remove(b"First");
                dict.remove(b"Last");
                if is_root {
                    dict.set("Count", Object::Integer(0));
                } else {
                    dict.remove(b"Count");
                }
            }
        }

        for (position, &child) in children.iter().enumerate() {
            let dict = dictionary_mut(self.document, child)?;
            dict.set("Parent", Object::Reference(node));
            match position.checked_sub(1).map(|prev| children[prev]) {
                Some(prev) => dict.set("Prev", Object::Reference(prev)),
                None => {
                    dict.remove(b"Prev");
                }
            }
            match children.get(position + 1) {
                Some(&next) => dict.set("Next", Object::Reference(next)),
                None => {
                    dict.remove(b"Next");
                }
            }
        }
        Ok(())
    }
}

impl OutlineTree for PdfOutline<'_> {
    type NodeRef = ObjectId;

    fn root(&self) -> Option<ObjectId> {
        self.tables.root
    }

    fn child_count(&self, node: ObjectId) -> usize {
        self.tables
            .items
            .get(&node)
            .map_or(0, |item| item.children.len())
    }

    fn child_at(&self, node: ObjectId, index: usize) -> Option<ObjectId> {
        self.tables
            .items
            .get(&node)
            .and_then(|item| item.children.get(index).copied())
    }

    fn label(&self, node: ObjectId) -> Cow<'_, str> {
        self.tables
            .items
            .get(&node)
            .map_or(Cow::Borrowed(""), |item| Cow::Borrowed(item.title.as_str()))
    }

    fn insert_child_at(&mut self, parent: ObjectId, index: usize, child: ObjectId) -> Result<()> {
        let count = self.tables.item(parent)?.children.len();
        if let Some(existing) = self.tables.item(child)?.parent {
            return Err(LesezeichenError::StructuralAccess(format!(
                "outline item {} {} R still belongs to {} {} R",
                child.0, child.1, existing.0, existing.1
            )));
        }
        if Some(child) == self.tables.root || self.tables.is_ancestor_or_self(child, parent) {
            return Err(LesezeichenError::StructuralAccess(format!(
                "moving {} {} R under {} {} R would create a cycle",
                child.0, child.1, parent.0, parent.1
            )));
        }
        if index > count {
            return Err(LesezeichenError::StructuralAccess(format!(
                "insert index {index} out of range ({count} children)"
            )));
        }

        if let Some(item) = self.tables.items.get_mut(&parent) {
            item.children.insert(index, child);
        }
        if let Some(item) = self.tables.items.get_mut(&child) {
            item.parent = Some(parent);
        }
        Ok(())
    }

    fn remove_child_at(&mut self, parent: ObjectId, index: usize) -> Result<ObjectId> {
        let Some(item) = self.tables.items.get_mut(&parent) else {
            return Err(LesezeichenError::StructuralAccess(format!(
                "object {} {} R is not an outline item",
                parent.0, parent.1
            )));
        };
        let count = item.children.len();
        if index >= count {
            return Err(LesezeichenError::StructuralAccess(format!(
                "remove index {index} out of range ({count} children)"
            )));
        }

        let child = item.children.remove(index);
        if let Some(item) = self.tables.items.get_mut(&child) {
            item.parent = None;
        }
        Ok(child)
    }
}

// -- Helpers ------------------------------------------------------------------

/// Locate the `/Outlines` dictionary through the catalog.
fn outlines_root(document: &Document) -> Result<Option<ObjectId>> {
    let catalog = document
        .catalog()
        .map_err(|err| LesezeichenError::PdfError(format!("no catalog: {}", err)))?;

    match catalog.get(b"Outlines") {
        Ok(Object::Reference(id)) => {
            dictionary(document, *id)?;
            Ok(Some(*id))
        }
        Ok(Object::Null) | Err(_) => Ok(None),
        Ok(_) => {
            warn!("/Outlines is not an indirect reference");
            Err(LesezeichenError::StructuralAccess(
                "/Outlines is not an indirect reference".into(),
            ))
        }
    }
}

fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    match dict.get(key) {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    }
}

fn dictionary(document: &Document, id: ObjectId) -> Result<&Dictionary> {
    match document.get_object(id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        Ok(_) => Err(LesezeichenError::StructuralAccess(format!(
            "object {} {} R is not a dictionary",
            id.0, id.1
        ))),
        Err(err) => Err(LesezeichenError::StructuralAccess(format!(
            "cannot read object {} {} R: {}",
            id.0, id.1, err
        ))),
    }
}

fn dictionary_mut(document: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    match document.get_object_mut(id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        Ok(_) => Err(LesezeichenError::StructuralAccess(format!(
            "object {} {} R is not a dictionary",
            id.0, id.1
        ))),
        Err(err) => Err(LesezeichenError::StructuralAccess(format!(
            "cannot update object {} {} R: {}",
            id.0, id.1, err
        ))),
    }
}
