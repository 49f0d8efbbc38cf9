#![forbid(unsafe_code)]

//! Deterministic tidy layout for binary trees.
//!
//! Implements the classic two-pass, contour-merging tree layout:
//!   1. First pass (post-order): lay out each subtree in its own frame
//!      with the root at x = 0; merge sibling subtrees by scanning the
//!      left subtree's rightmost contour against the right subtree's
//!      leftmost contour and shifting the right subtree by the minimum
//!      amount that keeps the horizontal separation at every shared depth.
//!      Child offsets are recorded as modifiers.
//!   2. Second pass (pre-order): accumulate modifiers down from ancestors
//!      so every node's final x reflects all corrections above it; y is
//!      depth times the vertical separation.
//!   3. Normalization: translate the whole layout so the minimum x and y
//!      sit one padding from the origin, and derive the bounding box and
//!      the parent→child edges from the final positions.
//!
//! All output is deterministic: identical trees produce identical layouts.
//! Coordinates are in abstract world units with the origin at the top
//! left; the renderer decides what a unit means on screen.

use core::fmt;
use std::env;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use treetrace_core::{NodeId, Tree, TreeNode};

// ── Layout output types ──────────────────────────────────────────────

/// A point in 2D layout space (world units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// A node annotated with its final position (the node's center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: NodeId,
    pub val: f64,
    pub pos: LayoutPoint,
}

/// A parent→child connection, endpoints at the two node centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub from: LayoutPoint,
    pub to: LayoutPoint,
}

/// Complete layout result for one tree.
///
/// Nodes are listed in preorder. The empty tree yields zero nodes, zero
/// edges, and a zero-sized bounding box — a defined base case, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f64,
    pub height: f64,
}

impl TreeLayout {
    /// True when the layout holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Final position of a node, if it was placed.
    #[must_use]
    pub fn position_of(&self, id: NodeId) -> Option<LayoutPoint> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.pos)
    }
}

// ── Spacing configuration ────────────────────────────────────────────

const ENV_LAYOUT_H_SEP: &str = "TREETRACE_LAYOUT_H_SEP";
const ENV_LAYOUT_V_SEP: &str = "TREETRACE_LAYOUT_V_SEP";
const ENV_LAYOUT_NODE_RADIUS: &str = "TREETRACE_LAYOUT_NODE_RADIUS";

/// Layout spacing parameters (world units, deterministic,
/// env-overridable).
///
/// # Environment Variables
/// - `TREETRACE_LAYOUT_H_SEP` (positive float)
/// - `TREETRACE_LAYOUT_V_SEP` (positive float)
/// - `TREETRACE_LAYOUT_NODE_RADIUS` (positive float)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    /// Minimum horizontal distance between node centers at the same depth.
    pub horizontal_separation: f64,
    /// Vertical distance between consecutive depths.
    pub vertical_separation: f64,
    /// Node radius; the layout padding is derived from it.
    pub node_radius: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            horizontal_separation: 60.0,
            vertical_separation: 80.0,
            node_radius: 24.0,
        }
    }
}

/// Spacing parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct SpacingParse {
    pub spacing: LayoutSpacing,
    pub errors: Vec<SpacingError>,
}

/// Spacing configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacingError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl SpacingError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SpacingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for SpacingError {}

impl LayoutSpacing {
    /// Clearance kept between the tree's extent and the bounding box.
    #[must_use]
    pub fn padding(&self) -> f64 {
        self.node_radius * 1.5
    }

    /// Parse spacing from environment variables, defaults per field on
    /// invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().spacing
    }

    /// Parse spacing from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> SpacingParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate spacing constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<SpacingError>> {
        let mut errors = Vec::new();
        validate_positive(
            "horizontal_separation",
            self.horizontal_separation,
            &mut errors,
        );
        validate_positive("vertical_separation", self.vertical_separation, &mut errors);
        validate_positive("node_radius", self.node_radius, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn from_env_with<F>(mut get: F) -> SpacingParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut spacing = LayoutSpacing::default();
    let mut errors = Vec::new();

    let mut read = |key: &'static str, field: &'static str, slot: &mut f64| {
        if let Some(value) = get(key) {
            match parse_spacing_value(&value) {
                Some(parsed) => *slot = parsed,
                None => errors.push(SpacingError::new(
                    field,
                    value,
                    "expected positive finite number",
                )),
            }
        }
    };

    read(
        ENV_LAYOUT_H_SEP,
        "horizontal_separation",
        &mut spacing.horizontal_separation,
    );
    read(
        ENV_LAYOUT_V_SEP,
        "vertical_separation",
        &mut spacing.vertical_separation,
    );
    read(
        ENV_LAYOUT_NODE_RADIUS,
        "node_radius",
        &mut spacing.node_radius,
    );

    SpacingParse { spacing, errors }
}

fn parse_spacing_value(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

fn validate_positive(field: &'static str, value: f64, errors: &mut Vec<SpacingError>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(SpacingError::new(
            field,
            value.to_string(),
            "must be positive and finite",
        ));
    }
}

// ── First pass: contour merge ────────────────────────────────────────

/// Horizontal extent `(min_x, max_x)` of a subtree at one depth, in the
/// subtree root's frame. Index 0 is the root itself.
type Contour = Vec<(f64, f64)>;

struct FirstWalk {
    horizontal_separation: f64,
    /// Offset of each node relative to its parent, applied in the second
    /// pass. The root has no entry (it anchors the frame).
    modifiers: FxHashMap<NodeId, f64>,
}

impl FirstWalk {
    fn walk(&mut self, node: &TreeNode) -> Contour {
        match (node.left.as_deref(), node.right.as_deref()) {
            (None, None) => vec![(0.0, 0.0)],
            (Some(child), None) | (None, Some(child)) => {
                // A lone child sits directly under its parent.
                let child_contour = self.walk(child);
                self.modifiers.insert(child.id, 0.0);
                let mut contour = Contour::with_capacity(child_contour.len() + 1);
                contour.push((0.0, 0.0));
                contour.extend(child_contour);
                contour
            }
            (Some(left), Some(right)) => {
                let left_contour = self.walk(left);
                let right_contour = self.walk(right);

                // Minimum distance between the two child roots that keeps
                // the separation at every shared depth.
                let mut gap = self.horizontal_separation;
                for depth in 0..left_contour.len().min(right_contour.len()) {
                    let needed = left_contour[depth].1 - right_contour[depth].0
                        + self.horizontal_separation;
                    if needed > gap {
                        gap = needed;
                    }
                }

                // Split symmetrically: the parent lands centered over the
                // pair.
                let half = gap / 2.0;
                self.modifiers.insert(left.id, -half);
                self.modifiers.insert(right.id, half);

                let depth_span = left_contour.len().max(right_contour.len());
                let mut contour = Contour::with_capacity(depth_span + 1);
                contour.push((0.0, 0.0));
                for depth in 0..depth_span {
                    let left_span = left_contour
                        .get(depth)
                        .map(|&(lo, hi)| (lo - half, hi - half));
                    let right_span = right_contour
                        .get(depth)
                        .map(|&(lo, hi)| (lo + half, hi + half));
                    match (left_span, right_span) {
                        (Some((llo, lhi)), Some((rlo, rhi))) => {
                            contour.push((llo.min(rlo), lhi.max(rhi)));
                        }
                        (Some(span), None) | (None, Some(span)) => contour.push(span),
                        (None, None) => break,
                    }
                }
                contour
            }
        }
    }
}

// ── Second pass: modifier propagation ────────────────────────────────

fn second_walk(
    node: &TreeNode,
    x: f64,
    depth: usize,
    spacing: &LayoutSpacing,
    modifiers: &FxHashMap<NodeId, f64>,
    nodes: &mut Vec<PlacedNode>,
) {
    nodes.push(PlacedNode {
        id: node.id,
        val: node.val,
        pos: LayoutPoint {
            x,
            y: depth as f64 * spacing.vertical_separation,
        },
    });
    for child in [node.left.as_deref(), node.right.as_deref()]
        .into_iter()
        .flatten()
    {
        let offset = modifiers.get(&child.id).copied().unwrap_or(0.0);
        second_walk(child, x + offset, depth + 1, spacing, modifiers, nodes);
    }
}

// ── Edges ────────────────────────────────────────────────────────────

fn collect_edges(
    node: &TreeNode,
    positions: &FxHashMap<NodeId, LayoutPoint>,
    edges: &mut Vec<LayoutEdge>,
) {
    let Some(&from) = positions.get(&node.id) else {
        return;
    };
    for child in [node.left.as_deref(), node.right.as_deref()]
        .into_iter()
        .flatten()
    {
        if let Some(&to) = positions.get(&child.id) {
            edges.push(LayoutEdge { from, to });
        }
        collect_edges(child, positions, edges);
    }
}

// ── Public API ───────────────────────────────────────────────────────

/// Compute a deterministic layout for `tree` with the default spacing.
#[must_use]
pub fn layout_tree(tree: &Tree) -> TreeLayout {
    layout_tree_with_spacing(tree, &LayoutSpacing::default())
}

/// Compute a deterministic layout for `tree` with explicit spacing.
///
/// Every node gets a center position; no two nodes at the same depth sit
/// closer than `spacing.horizontal_separation`; all coordinates fall
/// inside `[0, width] × [0, height]`.
#[must_use]
pub fn layout_tree_with_spacing(tree: &Tree, spacing: &LayoutSpacing) -> TreeLayout {
    let Some(root) = tree.root() else {
        return TreeLayout::default();
    };

    let mut first = FirstWalk {
        horizontal_separation: spacing.horizontal_separation,
        modifiers: FxHashMap::default(),
    };
    first.walk(root);

    let mut nodes = Vec::with_capacity(tree.len());
    second_walk(root, 0.0, 0, spacing, &first.modifiers, &mut nodes);

    // Translate so the extent starts one padding from the origin.
    let padding = spacing.padding();
    let min_x = nodes.iter().map(|n| n.pos.x).fold(f64::INFINITY, f64::min);
    let max_x = nodes
        .iter()
        .map(|n| n.pos.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_y = nodes
        .iter()
        .map(|n| n.pos.y)
        .fold(f64::NEG_INFINITY, f64::max);

    let offset_x = padding - min_x;
    for node in &mut nodes {
        node.pos.x += offset_x;
        node.pos.y += padding;
    }

    let width = max_x - min_x + 2.0 * padding;
    let height = max_y + 2.0 * padding;

    let positions: FxHashMap<NodeId, LayoutPoint> =
        nodes.iter().map(|n| (n.id, n.pos)).collect();
    let mut edges = Vec::with_capacity(tree.len().saturating_sub(1));
    collect_edges(root, &positions, &mut edges);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        width,
        height,
        "computed tree layout"
    );

    TreeLayout {
        nodes,
        edges,
        width,
        height,
    }
}

// ── Tests ────────────────────────────────────────────────────────────
