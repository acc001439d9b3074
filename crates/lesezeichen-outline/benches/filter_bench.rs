// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the outline filter. Compares the in-place
// back-to-front engine against the rebuild on a synthetic outline where every
// third bookmark matches.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lesezeichen_core::FilterSpec;
use lesezeichen_outline::{OutlineArena, OutlineNode, filter_outline};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Build a tree `depth` levels deep with `fanout` children per node.
fn synthetic_outline(depth: usize, fanout: usize, counter: &mut usize) -> Vec<OutlineNode> {
    if depth == 0 {
        return Vec::new();
    }
    (0..fanout)
        .map(|_| {
            *counter += 1;
            let label = if *counter % 3 == 0 {
                format!("section-{counter}.pdf")
            } else {
                format!("Section {counter}")
            };
            OutlineNode::with_children(label, synthetic_outline(depth - 1, fanout, counter))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_filter(c: &mut Criterion) {
    let mut counter = 0;
    let tree = OutlineNode::with_children("Root", synthetic_outline(4, 6, &mut counter));
    let spec = FilterSpec::default();

    c.bench_function("filter_in_place (6^4 bookmarks)", |b| {
        b.iter(|| {
            let mut arena = OutlineArena::from_node(black_box(&tree));
            let report = filter_outline(&mut arena, &spec);
            black_box(report.ok());
        });
    });

    c.bench_function("filter_rebuild (6^4 bookmarks)", |b| {
        b.iter(|| black_box(black_box(&tree).filtered(&spec)));
    });
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
