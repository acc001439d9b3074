// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF builder — assemble minimal PDFs carrying a given outline with `lopdf`.
//
// Pages are blank US-Letter media boxes. Each bookmark points at a page with a
// `[page /Fit]` destination, cycling through the pages in pre-order.

use lesezeichen_core::error::{LesezeichenError, Result};
use lesezeichen_outline::OutlineNode;
use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::{debug, instrument};

use super::text::encode_text_string;

/// Builds small PDF documents with an outline, for fixtures and demos.
#[derive(Debug, Clone)]
pub struct PdfBuilder {
    page_count: u32,
    /// Top-level bookmarks are the children of this node; its label is unused.
    outline: Option<OutlineNode>,
    /// Titles of bookmarks written collapsed (negative /Count).
    closed: Vec<String>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            page_count: 1,
            outline: None,
            closed: Vec::new(),
        }
    }

    /// Number of pages (at least one page is always written).
    pub fn pages(mut self, page_count: u32) -> Self {
        self.page_count = page_count.max(1);
        self
    }

    pub fn outline(mut self, outline: OutlineNode) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Write bookmarks titled `title` collapsed.
    pub fn closed(mut self, title: impl Into<String>) -> Self {
        self.closed.push(title.into());
        self
    }

    #[instrument(skip(self), fields(pages = self.page_count))]
    pub fn build(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<ObjectId> = (0..self.page_count)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                })
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
                "Count" => i64::from(self.page_count),
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if let Some(outline) = &self.outline {
            let outlines_id = doc.new_object_id();
            let mut next_page = 0;
            let (ids, visible) =
                self.add_items(&mut doc, outlines_id, &outline.children, &page_ids, &mut next_page);

            let mut outlines = dictionary! { "Type" => "Outlines", "Count" => visible };
            if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
                outlines.set("First", Object::Reference(first));
                outlines.set("Last", Object::Reference(last));
            }
            doc.objects.insert(outlines_id, Object::Dictionary(outlines));
            catalog.set("Outlines", Object::Reference(outlines_id));
            catalog.set("PageMode", "UseOutlines");
            debug!(bookmarks = outline.count() - 1, "Outline written");
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    /// Serialise the built document.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build();
        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            LesezeichenError::PdfError(format!("failed to serialise built PDF: {}", err))
        })?;
        Ok(output)
    }

    /// Write `children` as the sibling list under `parent`. Returns their ids
    /// and the number of items visible below `parent` when it is expanded.
    fn add_items(
        &self,
        doc: &mut Document,
        parent: ObjectId,
        children: &[OutlineNode],
        pages: &[ObjectId],
        next_page: &mut usize,
    ) -> (Vec<ObjectId>, i64) {
        let ids: Vec<ObjectId> = children.iter().map(|_| doc.new_object_id()).collect();
        let mut visible = 0;

        for (position, child) in children.iter().enumerate() {
            let page = pages[*next_page % pages.len()];
            *next_page += 1;

            let (grand_ids, grand_visible) =
                self.add_items(doc, ids[position], &child.children, pages, next_page);
            let open = !self.closed.contains(&child.label);

            let mut item = dictionary! {
                "Title" => encode_text_string(&child.label),
                "Parent" => parent,
                "Dest" => vec![Object::Reference(page), Object::Name(b"Fit".to_vec())],
            };
            if position > 0 {
                item.set("Prev", Object::Reference(ids[position - 1]));
            }
            if let Some(&next) = ids.get(position + 1) {
                item.set("Next", Object::Reference(next));
            }
            if let (Some(&first), Some(&last)) = (grand_ids.first(), grand_ids.last()) {
                item.set("First", Object::Reference(first));
                item.set("Last", Object::Reference(last));
                item.set(
                    "Count",
                    Object::Integer(if open { grand_visible } else { -grand_visible }),
                );
            }
            doc.objects.insert(ids[position], Object::Dictionary(item));

            visible += 1 + if open { grand_visible } else { 0 };
        }
        (ids, visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::outline::read_outline;

    #[test]
    fn builds_requested_pages() {
        let doc = PdfBuilder::new().pages(3).build();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(read_outline(&doc).unwrap().is_none());
    }

    #[test]
    fn zero_pages_still_writes_one() {
        assert_eq!(PdfBuilder::new().pages(0).build().get_pages().len(), 1);
    }

    #[test]
    fn built_bytes_reload_with_outline() {
        let tree = OutlineNode::with_children(
            "",
            vec![OutlineNode::with_children("Teil 1", vec![OutlineNode::new("Kapitel Ä")])],
        );
        let bytes = PdfBuilder::new().outline(tree.clone()).to_bytes().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(read_outline(&doc).unwrap(), Some(tree));
    }
}
