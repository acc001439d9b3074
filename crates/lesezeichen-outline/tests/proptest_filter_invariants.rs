// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property-based invariant tests for outline filtering.
//
// 1. No surviving descendant matches the spec.
// 2. Pre-order of the result is the original pre-order minus matched nodes
//    (promoted children land exactly where their parent was).
// 3. The in-place engine and the rebuild agree on every tree.
// 4. Filtering twice equals filtering once.
// 5. Parent links stay consistent and no node is reachable twice.
// 6. Surviving count = original count - matched count.

use std::collections::HashSet;

use lesezeichen_core::FilterSpec;
use lesezeichen_outline::{NodeId, OutlineArena, OutlineNode, OutlineTree, filter_outline};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn label_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z]{1,6}",
        "[a-z]{1,4}\\.(pdf|PDF|Pdf)",
        Just("Outline Placeholder".to_string()),
        Just("outline placeholder 2".to_string()),
    ]
}

fn tree_strategy() -> impl Strategy<Value = OutlineNode> {
    let leaf = label_strategy().prop_map(OutlineNode::new);
    leaf.prop_recursive(5, 96, 6, |inner| {
        (label_strategy(), prop::collection::vec(inner, 0..6))
            .prop_map(|(label, children)| OutlineNode::with_children(label, children))
    })
}

fn filter_in_place(tree: &OutlineNode, spec: &FilterSpec) -> (OutlineArena, OutlineNode) {
    let mut arena = OutlineArena::from_node(tree);
    filter_outline(&mut arena, spec).expect("filtering an arena never fails");
    let out = arena.to_node().expect("root survives");
    (arena, out)
}

fn matched_descendants(tree: &OutlineNode, spec: &FilterSpec) -> usize {
    tree.labels().into_iter().filter(|l| spec.matches(l)).count()
}

fn check_links(arena: &OutlineArena, node: NodeId, seen: &mut HashSet<NodeId>) -> bool {
    if !seen.insert(node) {
        return false;
    }
    arena.children(node).into_iter().all(|child| {
        arena.parent(child) == Some(node) && check_links(arena, child, seen)
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No matches survive
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_match_survives(tree in tree_strategy()) {
        let spec = FilterSpec::default();
        let (_, out) = filter_in_place(&tree, &spec);
        for label in out.labels() {
            prop_assert!(!spec.matches(label), "surviving label {:?} matches", label);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Order preservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn preorder_is_original_minus_matches(tree in tree_strategy()) {
        let spec = FilterSpec::default();
        let (_, out) = filter_in_place(&tree, &spec);
        let expected: Vec<&str> = tree
            .labels()
            .into_iter()
            .filter(|l| !spec.matches(l))
            .collect();
        prop_assert_eq!(out.labels(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. In-place and rebuild agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn in_place_equals_rebuild(tree in tree_strategy()) {
        let spec = FilterSpec::new([".pdf", "placeholder"]);
        let (_, out) = filter_in_place(&tree, &spec);
        prop_assert_eq!(out, tree.filtered(&spec));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filtering_is_idempotent(tree in tree_strategy()) {
        let spec = FilterSpec::default();
        let (_, once) = filter_in_place(&tree, &spec);
        let mut arena = OutlineArena::from_node(&once);
        let report = filter_outline(&mut arena, &spec).unwrap();
        prop_assert!(report.is_noop());
        prop_assert_eq!(arena.to_node().unwrap(), once);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Proper rooted tree afterwards
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parent_links_stay_consistent(tree in tree_strategy()) {
        let (arena, _) = filter_in_place(&tree, &FilterSpec::default());
        let root = arena.root().unwrap();
        prop_assert_eq!(arena.parent(root), None);
        let mut seen = HashSet::new();
        prop_assert!(check_links(&arena, root, &mut seen));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Count accounting
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn surviving_count_accounts_for_removals(tree in tree_strategy()) {
        let spec = FilterSpec::default();
        let matched = matched_descendants(&tree, &spec);
        let mut arena = OutlineArena::from_node(&tree);
        let report = filter_outline(&mut arena, &spec).unwrap();

        prop_assert_eq!(report.removed, matched);
        prop_assert_eq!(report.visited, tree.count() - 1);
        prop_assert_eq!(arena.reachable_count(), tree.count() - matched);
        prop_assert_eq!(report.surviving() + 1, arena.reachable_count());
    }
}
