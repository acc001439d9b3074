// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — outline access, document facade, and fixture building.

pub mod builder;
pub mod outline;
pub mod reader;
mod text;

pub use builder::PdfBuilder;
pub use outline::PdfOutline;
pub use reader::OutlineDocument;
