#![forbid(unsafe_code)]

//! Core data model for TreeTrace.
//!
//! This crate provides the three building blocks the visualizer front-end
//! consumes:
//! - [`tree`]: an immutable binary tree built from a level-order array
//!   (`[4, 2, 7, null, 3]` and friends)
//! - [`traversal`]: the non-recursive inorder traversal replayed as a finite
//!   sequence of self-contained, scrubbable snapshots
//! - [`playback`]: a pure-data cursor over that sequence (no timers — the
//!   embedding application owns scheduling)
//!
//! All output is deterministic: identical input always produces identical
//! trees, steps, and snapshots.

pub mod playback;
pub mod traversal;
pub mod tree;

pub use playback::StepPlayback;
pub use traversal::{PSEUDOCODE, StepKind, TraversalStep, generate_steps};
pub use tree::{NodeId, Tree, TreeInputError, TreeNode};
