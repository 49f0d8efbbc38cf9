//! Binary tree model and level-order builder.
//!
//! Trees are built once from a flat, breadth-first array with explicit
//! absent markers and are never mutated afterwards. Node identifiers are
//! dense (`0..len`), assigned in construction order, and scoped to a single
//! build — a fresh counter per call, never process-global state.

use core::fmt;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Identifier of a node within one built tree.
///
/// Dense and stable for the lifetime of that tree instance; not unique
/// across trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node: value plus owning child slots.
///
/// No back references and no presentation state — layout output lives in
/// its own structure, keyed by [`NodeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub val: f64,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    /// True when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// An immutable binary tree. Absence of a root means the empty tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    root: Option<Box<TreeNode>>,
    len: usize,
}

// ── Input boundary errors ────────────────────────────────────────────

/// Rejection of textual input before it reaches the builder.
///
/// The builder itself assumes a pre-validated sequence; this type is the
/// boundary between free-form text and that contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeInputError {
    /// The input is not syntactically valid JSON.
    Syntax,
    /// The input parsed, but is not an array.
    NotAnArray,
    /// An array element is neither a number nor `null`.
    InvalidElement { index: usize },
}

impl fmt::Display for TreeInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => f.write_str("input is not a valid JSON array"),
            Self::NotAnArray => f.write_str("input must be an array of numbers and nulls"),
            Self::InvalidElement { index } => {
                write!(f, "element {index} is neither a number nor null")
            }
        }
    }
}

impl std::error::Error for TreeInputError {}

// ── Construction ─────────────────────────────────────────────────────

/// Arena slot used while wiring up children; the slot index is the node id.
struct Slot {
    val: f64,
    left: Option<usize>,
    right: Option<usize>,
}

impl Tree {
    /// The empty tree.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from a level-order array where `None` marks a missing
    /// child.
    ///
    /// The root is `values[0]`; each dequeued node consumes the next two
    /// elements as its left and right child. Consumption stops when the
    /// input is exhausted or every constructed node already has its
    /// children; elements positioned under absent parents are unreachable
    /// and ignored. An empty input or an absent first element yields the
    /// empty tree.
    #[must_use]
    pub fn build(values: &[Option<f64>]) -> Self {
        let Some(Some(root_val)) = values.first().copied() else {
            return Self::empty();
        };

        let mut slots = vec![Slot {
            val: root_val,
            left: None,
            right: None,
        }];
        let mut queue: VecDeque<usize> = VecDeque::from([0]);
        let mut i = 1;

        while i < values.len() {
            let Some(parent) = queue.pop_front() else {
                break;
            };
            if let Some(val) = values[i] {
                let id = slots.len();
                slots.push(Slot {
                    val,
                    left: None,
                    right: None,
                });
                slots[parent].left = Some(id);
                queue.push_back(id);
            }
            i += 1;
            if i < values.len() {
                if let Some(val) = values[i] {
                    let id = slots.len();
                    slots.push(Slot {
                        val,
                        left: None,
                        right: None,
                    });
                    slots[parent].right = Some(id);
                    queue.push_back(id);
                }
                i += 1;
            }
        }

        let len = slots.len();
        let tree = Self {
            root: Some(Box::new(assemble(&slots, 0))),
            len,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = len, "built tree from level-order input");

        tree
    }

    /// Parse the textual form `[4, 2, 7, null, 3]` and build a tree.
    ///
    /// Tolerates a single trailing comma before the closing bracket.
    /// Anything that is not an array of numbers and nulls is rejected with
    /// a [`TreeInputError`].
    pub fn parse(input: &str) -> Result<Self, TreeInputError> {
        let text = strip_trailing_comma(input.trim());
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|_| TreeInputError::Syntax)?;
        let serde_json::Value::Array(items) = value else {
            return Err(TreeInputError::NotAnArray);
        };

        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                serde_json::Value::Null => values.push(None),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(v) => values.push(Some(v)),
                    None => return Err(TreeInputError::InvalidElement { index }),
                },
                _ => return Err(TreeInputError::InvalidElement { index }),
            }
        }
        Ok(Self::build(&values))
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the empty tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Look up a node by id (preorder search).
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        fn find(node: &TreeNode, id: NodeId) -> Option<&TreeNode> {
            if node.id == id {
                return Some(node);
            }
            node.left
                .as_deref()
                .and_then(|n| find(n, id))
                .or_else(|| node.right.as_deref().and_then(|n| find(n, id)))
        }
        self.root().and_then(|root| find(root, id))
    }

    /// The canonical level-order flattening, trailing absent markers
    /// removed.
    ///
    /// `Tree::build(&tree.level_order())` reproduces the tree exactly.
    #[must_use]
    pub fn level_order(&self) -> Vec<Option<f64>> {
        let Some(root) = self.root() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2 * self.len + 1);
        let mut queue: VecDeque<Option<&TreeNode>> = VecDeque::from([Some(root)]);
        while let Some(slot) = queue.pop_front() {
            match slot {
                Some(node) => {
                    out.push(Some(node.val));
                    queue.push_back(node.left.as_deref());
                    queue.push_back(node.right.as_deref());
                }
                None => out.push(None),
            }
        }
        while out.last() == Some(&None) {
            out.pop();
        }
        out
    }

    /// Node values in standard (recursive) inorder — the reference order
    /// the traversal step log must reproduce.
    #[must_use]
    pub fn inorder_values(&self) -> Vec<f64> {
        fn walk(node: &TreeNode, out: &mut Vec<f64>) {
            if let Some(left) = node.left.as_deref() {
                walk(left, out);
            }
            out.push(node.val);
            if let Some(right) = node.right.as_deref() {
                walk(right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root() {
            walk(root, &mut out);
        }
        out
    }
}

/// Convert the arena into the owned boxed tree; the slot index is the id.
fn assemble(slots: &[Slot], idx: usize) -> TreeNode {
    TreeNode {
        id: NodeId(idx),
        val: slots[idx].val,
        left: slots[idx].left.map(|c| Box::new(assemble(slots, c))),
        right: slots[idx].right.map(|c| Box::new(assemble(slots, c))),
    }
}

/// Drop a single comma sitting directly before the closing bracket.
fn strip_trailing_comma(input: &str) -> String {
    let Some(body) = input.strip_suffix(']') else {
        return input.to_string();
    };
    let trimmed = body.trim_end();
    match trimmed.strip_suffix(',') {
        Some(rest) => format!("{rest}]"),
        None => input.to_string(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
