//! Replayable step log for the non-recursive inorder traversal.
//!
//! [`generate_steps`] runs the classic stack-based algorithm once and
//! records every primitive action as an owned snapshot:
//!
//! 1. `Start` — unconditionally, before the outer loop
//! 2. `Push` — per descent, stack captured *before* the push
//! 3. `Pop` — stack captured before the pop (popped value still shown,
//!    for visual continuity in the stack panel)
//! 4. `Visit` — post-pop stack plus the updated visited list
//! 5. `Move` — the new current node (right child, or none)
//! 6. `End` — empty stack, complete visited list
//!
//! Snapshots share no state with the algorithm or each other, so the
//! returned sequence can be indexed and scrubbed in any order. The log is a
//! pure function of the tree: repeated calls are element-wise equal.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, Tree, TreeNode};

/// Reference pseudocode shown alongside the animation.
/// [`TraversalStep::code_line`] is a 1-based index into this listing.
pub const PSEUDOCODE: [&str; 9] = [
    "function inorderTraversal(root):",
    "  stack = []",
    "  while current or stack:",
    "    while current:",
    "      stack.push(current)",
    "      current = current.left",
    "    current = stack.pop()",
    "    visit(current)",
    "    current = current.right",
];

/// The primitive action a step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Start,
    Push,
    Pop,
    Visit,
    Move,
    End,
}

impl StepKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Push => "Push",
            Self::Pop => "Pop",
            Self::Visit => "Visit",
            Self::Move => "Move",
            Self::End => "End",
        }
    }

    /// The pseudocode line (1-based, into [`PSEUDOCODE`]) that produces
    /// this kind of step.
    #[must_use]
    pub const fn code_line(self) -> usize {
        match self {
            Self::Start => 2,
            Self::Push => 5,
            Self::Pop => 7,
            Self::Visit => 8,
            Self::Move => 9,
            Self::End => 3,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point in the algorithm's execution, fully owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalStep {
    /// Typed action tag.
    pub kind: StepKind,
    /// Human-readable action, e.g. `"Push 4"`.
    pub action: String,
    /// The node under examination, if any.
    pub current: Option<NodeId>,
    /// Stack contents as node values, top of stack last.
    pub stack: Vec<f64>,
    /// Values visited so far, in visit order.
    pub visited: Vec<f64>,
    /// 1-based line into [`PSEUDOCODE`].
    pub code_line: usize,
    /// Prose explanation for the side panel.
    pub explanation: String,
}

/// Replay the stack-based inorder traversal as a finite step log.
///
/// Always begins with `Start` and ends with `End`; between them every node
/// contributes exactly one `Push`, `Pop`, `Visit`, and `Move` step. The
/// empty tree yields exactly `[Start, End]`.
#[must_use]
pub fn generate_steps(tree: &Tree) -> Vec<TraversalStep> {
    let mut steps = Vec::with_capacity(4 * tree.len() + 2);
    let mut stack: Vec<&TreeNode> = Vec::new();
    let mut visited: Vec<f64> = Vec::new();
    let mut current: Option<&TreeNode> = tree.root();

    steps.push(TraversalStep {
        kind: StepKind::Start,
        action: "Start".to_string(),
        current: current.map(|n| n.id),
        stack: Vec::new(),
        visited: Vec::new(),
        code_line: StepKind::Start.code_line(),
        explanation: "Starting the traversal. The current node is the root and the stack is empty."
            .to_string(),
    });

    while current.is_some() || !stack.is_empty() {
        while let Some(node) = current {
            steps.push(TraversalStep {
                kind: StepKind::Push,
                action: format!("Push {}", node.val),
                current: Some(node.id),
                stack: stack_values(&stack),
                visited: visited.clone(),
                code_line: StepKind::Push.code_line(),
                explanation: format!(
                    "Current node ({}) is not null. Pushing it onto the stack and moving to its left child.",
                    node.val
                ),
            });
            stack.push(node);
            current = node.left.as_deref();
        }

        let Some(node) = stack.pop() else {
            break;
        };

        // Pre-pop snapshot: the popped value stays on top.
        let mut before_pop = stack_values(&stack);
        before_pop.push(node.val);
        steps.push(TraversalStep {
            kind: StepKind::Pop,
            action: format!("Pop {}", node.val),
            current: Some(node.id),
            stack: before_pop,
            visited: visited.clone(),
            code_line: StepKind::Pop.code_line(),
            explanation: format!(
                "Current node is null, so we pop a node from the stack. The popped node is {}.",
                node.val
            ),
        });

        visited.push(node.val);
        steps.push(TraversalStep {
            kind: StepKind::Visit,
            action: format!("Visit {}", node.val),
            current: Some(node.id),
            stack: stack_values(&stack),
            visited: visited.clone(),
            code_line: StepKind::Visit.code_line(),
            explanation: format!(
                "Visiting the popped node {}. Its value is appended to the result.",
                node.val
            ),
        });

        current = node.right.as_deref();
        let (action, explanation) = match current {
            Some(right) => (
                format!("Move to right child of {}", node.val),
                format!(
                    "Moving to the right child of the visited node. The new current node is {}.",
                    right.val
                ),
            ),
            None => (
                format!("No right child for {}", node.val),
                "The visited node has no right child. The loop continues and the next node comes off the stack."
                    .to_string(),
            ),
        };
        steps.push(TraversalStep {
            kind: StepKind::Move,
            action,
            current: current.map(|n| n.id),
            stack: stack_values(&stack),
            visited: visited.clone(),
            code_line: StepKind::Move.code_line(),
            explanation,
        });
    }

    steps.push(TraversalStep {
        kind: StepKind::End,
        action: "End".to_string(),
        current: None,
        stack: Vec::new(),
        visited,
        code_line: StepKind::End.code_line(),
        explanation: "Traversal complete. The current node is null and the stack is empty."
            .to_string(),
    });

    #[cfg(feature = "tracing")]
    tracing::debug!(
        nodes = tree.len(),
        steps = steps.len(),
        "generated traversal step log"
    );

    steps
}

fn stack_values(stack: &[&TreeNode]) -> Vec<f64> {
    stack.iter().map(|n| n.val).collect()
}

// ── Tests ────────────────────────────────────────────────────────────
