//! Property-based invariant tests for the builder and the traversal step
//! generator.
//!
//! These verify structural invariants that must hold for **any** level-order
//! input fed through `Tree::build` and `generate_steps`:
//!
//! 1. Builder normalization — `level_order` is a fixed point after one build
//! 2. Step framing — logs start with `Start` and end with `End`
//! 3. Step count — exactly two more steps than the Push/Pop/Visit/Move total,
//!    and one of each per node
//! 4. Visit order — `Visit` steps reproduce the recursive inorder
//! 5. Snapshot coherence — visited lists are prefixes of the inorder,
//!    Pop shows the pre-pop stack
//! 6. Idempotence — repeated runs are element-wise equal
//! 7. Degenerate inputs — empty tree and single node edge cases

use proptest::prelude::*;
use treetrace_core::{StepKind, Tree, generate_steps};

// ── Strategies ───────────────────────────────────────────────────────

/// Arbitrary level-order arrays: numbers and absent markers in any order.
fn level_order_strategy() -> impl Strategy<Value = Vec<Option<f64>>> {
    proptest::collection::vec(
        proptest::option::of((-999i32..1000).prop_map(f64::from)),
        0..48,
    )
}

fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

// ═════════════════════════════════════════════════════════════════════
// 1. Builder normalization — level_order is a fixed point
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn level_order_is_a_fixed_point(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let canonical = tree.level_order();

        prop_assert_ne!(canonical.last(), Some(&None),
            "canonical form must not end with an absent marker");

        let rebuilt = Tree::build(&canonical);
        prop_assert_eq!(rebuilt.len(), tree.len(),
            "rebuild changed the node count");
        prop_assert_eq!(rebuilt.level_order(), canonical,
            "rebuild changed the canonical form");
    }

    #[test]
    fn builder_preserves_values_in_bfs_order(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let canonical = tree.level_order();
        let kept: Vec<f64> = canonical.iter().flatten().copied().collect();
        prop_assert_eq!(kept.len(), tree.len());
    }
}

// ═════════════════════════════════════════════════════════════════════
// 2. Step framing — Start first, End last, both with quiescent state
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn log_is_framed_by_start_and_end(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let steps = generate_steps(&tree);

        let first = steps.first().unwrap();
        prop_assert_eq!(first.kind, StepKind::Start);
        prop_assert!(first.stack.is_empty());
        prop_assert!(first.visited.is_empty());
        prop_assert_eq!(first.current.is_some(), !tree.is_empty());

        let last = steps.last().unwrap();
        prop_assert_eq!(last.kind, StepKind::End);
        prop_assert!(last.stack.is_empty());
        prop_assert_eq!(last.current, None);
        prop_assert_eq!(&last.visited, &tree.inorder_values());
    }
}

// ═════════════════════════════════════════════════════════════════════
// 3. Step count — 2 + one Push/Pop/Visit/Move per node
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn step_counts_match_the_node_count(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let steps = generate_steps(&tree);

        let count = |kind: StepKind| steps.iter().filter(|s| s.kind == kind).count();

        prop_assert_eq!(count(StepKind::Start), 1);
        prop_assert_eq!(count(StepKind::End), 1);
        for kind in [StepKind::Push, StepKind::Pop, StepKind::Visit, StepKind::Move] {
            prop_assert_eq!(count(kind), tree.len(),
                "expected one {} per node", kind);
        }
        prop_assert_eq!(steps.len(), 4 * tree.len() + 2);
    }
}

// ═════════════════════════════════════════════════════════════════════
// 4. Visit order — the step log reproduces the recursive inorder
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visits_replay_the_inorder(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let steps = generate_steps(&tree);

        let visits: Vec<f64> = steps
            .iter()
            .filter(|s| s.kind == StepKind::Visit)
            .map(|s| *s.visited.last().unwrap())
            .collect();
        prop_assert_eq!(visits, tree.inorder_values());
    }
}

// ═════════════════════════════════════════════════════════════════════
// 5. Snapshot coherence — prefixes and pre-pop stacks
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visited_lists_are_inorder_prefixes(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let inorder = tree.inorder_values();

        for step in generate_steps(&tree) {
            prop_assert_eq!(&step.visited[..], &inorder[..step.visited.len()],
                "visited list diverged from the inorder prefix");
            prop_assert!(step.stack.len() <= tree.len());
        }
    }

    #[test]
    fn pop_shows_the_stack_before_the_pop(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        let steps = generate_steps(&tree);

        for window in steps.windows(2) {
            if window[0].kind == StepKind::Pop {
                // The following Visit shows the post-pop stack; the Pop
                // snapshot is that stack with the popped value on top.
                prop_assert_eq!(window[1].kind, StepKind::Visit);
                let mut expected = window[1].stack.clone();
                expected.push(*window[1].visited.last().unwrap());
                prop_assert_eq!(&window[0].stack, &expected);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════
// 6. Idempotence — pure function of the tree
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_runs_are_equal(values in level_order_strategy()) {
        let tree = Tree::build(&values);
        prop_assert_eq!(generate_steps(&tree), generate_steps(&tree));
    }
}

// ═════════════════════════════════════════════════════════════════════
// 7. Degenerate inputs — fixed edge cases
// ═════════════════════════════════════════════════════════════════════

#[test]
fn empty_inputs_yield_start_end_only() {
    for tree in [Tree::build(&[]), Tree::build(&[None])] {
        let steps = generate_steps(&tree);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Start);
        assert_eq!(steps[1].kind, StepKind::End);
        assert!(steps.iter().all(|s| s.stack.is_empty() && s.visited.is_empty()));
    }
}

#[test]
fn single_node_emits_one_step_of_each_kind() {
    let steps = generate_steps(&Tree::build(&present(&[5.0])));
    let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Start,
            StepKind::Push,
            StepKind::Pop,
            StepKind::Visit,
            StepKind::Move,
            StepKind::End,
        ]
    );
    assert_eq!(steps.last().unwrap().visited, vec![5.0]);
}

#[test]
fn reference_scenario_visits_in_sorted_order() {
    let tree = Tree::build(&present(&[4.0, 2.0, 7.0, 1.0, 3.0, 6.0, 9.0]));
    let steps = generate_steps(&tree);

    assert_eq!(steps[0].kind, StepKind::Start);
    assert_eq!(steps[0].current, Some(treetrace_core::NodeId(0)));
    assert_eq!(
        steps.last().unwrap().visited,
        vec![1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 9.0]
    );
}
