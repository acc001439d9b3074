// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesezeichen-outline — Bookmark tree filtering.
//
// Removes every outline node whose title matches a `FilterSpec`, promoting the
// removed node's children into its place. The engine works against any host
// that implements `OutlineTree`; `OutlineArena` is the in-memory host and
// `OutlineNode` the owned value form used for rebuilds and fixtures.

pub mod arena;
pub mod filter;
pub mod node;
pub mod tree;

pub use arena::{NodeId, OutlineArena};
pub use filter::{OutlineFilter, filter_outline};
pub use node::OutlineNode;
pub use tree::OutlineTree;

pub use tokio_util::sync::CancellationToken;
