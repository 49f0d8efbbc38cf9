//! Cursor over a traversal step log.
//!
//! Pure data: the cursor knows where it is and how to move, nothing about
//! timers or frame rates. Auto-advance belongs to the embedding
//! application; this type only guarantees that every position it hands out
//! is a valid index into the log.

use crate::traversal::{TraversalStep, generate_steps};
use crate::tree::Tree;

/// An owned step log plus the current scrub position.
#[derive(Debug, Clone, Default)]
pub struct StepPlayback {
    steps: Vec<TraversalStep>,
    cursor: usize,
}

impl StepPlayback {
    /// Wrap an existing step log, positioned at the first step.
    #[must_use]
    pub fn new(steps: Vec<TraversalStep>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// Generate the log for `tree` and wrap it.
    #[must_use]
    pub fn for_tree(tree: &Tree) -> Self {
        Self::new(generate_steps(tree))
    }

    /// The full step log.
    #[must_use]
    pub fn steps(&self) -> &[TraversalStep] {
        &self.steps
    }

    /// Number of steps in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the log holds no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current scrub position (0-based).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The step under the cursor, if the log is non-empty.
    #[must_use]
    pub fn current(&self) -> Option<&TraversalStep> {
        self.steps.get(self.cursor)
    }

    /// Progress as `(current, total)`, 1-based; `(0, 0)` for an empty log.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        if self.steps.is_empty() {
            (0, 0)
        } else {
            (self.cursor + 1, self.steps.len())
        }
    }

    /// True when the cursor sits on the last step (or the log is empty).
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.steps.is_empty() || self.cursor + 1 == self.steps.len()
    }

    /// Move one step forward. Returns `false` at the end (no wrap).
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.steps.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move one step back. Returns `false` at the start.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to an absolute position. Returns `false` (cursor unchanged)
    /// when the index is out of bounds.
    pub fn jump(&mut self, index: usize) -> bool {
        if index < self.steps.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    /// Return to the first step.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Pressing play on a finished log restarts it from the first step.
    /// Returns `true` when a restart happened.
    pub fn restart_if_finished(&mut self) -> bool {
        if !self.steps.is_empty() && self.at_end() {
            self.cursor = 0;
            true
        } else {
            false
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::StepKind;

    fn sample() -> StepPlayback {
        let values: Vec<Option<f64>> = [4.0, 2.0, 7.0].into_iter().map(Some).collect();
        StepPlayback::for_tree(&Tree::build(&values))
    }

    #[test]
    fn starts_at_the_start_step() {
        let playback = sample();
        assert_eq!(playback.cursor(), 0);
        assert_eq!(playback.current().unwrap().kind, StepKind::Start);
        assert_eq!(playback.progress(), (1, 14));
    }

    #[test]
    fn advance_and_retreat_stop_at_the_ends() {
        let mut playback = sample();
        assert!(!playback.retreat());

        let mut moved = 0;
        while playback.advance() {
            moved += 1;
        }
        assert_eq!(moved, playback.len() - 1);
        assert!(playback.at_end());
        assert!(!playback.advance());
        assert_eq!(playback.current().unwrap().kind, StepKind::End);

        assert!(playback.retreat());
        assert!(!playback.at_end());
    }

    #[test]
    fn jump_is_bounds_checked() {
        let mut playback = sample();
        assert!(playback.jump(5));
        assert_eq!(playback.cursor(), 5);
        assert!(!playback.jump(playback.len()));
        assert_eq!(playback.cursor(), 5);
    }

    #[test]
    fn reset_and_restart() {
        let mut playback = sample();
        playback.jump(playback.len() - 1);
        assert!(playback.at_end());

        // Not finished → play does not restart.
        playback.reset();
        assert!(!playback.restart_if_finished());
        assert_eq!(playback.cursor(), 0);

        playback.jump(playback.len() - 1);
        assert!(playback.restart_if_finished());
        assert_eq!(playback.cursor(), 0);
    }

    #[test]
    fn empty_log_is_inert() {
        let mut playback = StepPlayback::new(Vec::new());
        assert!(playback.is_empty());
        assert_eq!(playback.current(), None);
        assert_eq!(playback.progress(), (0, 0));
        assert!(playback.at_end());
        assert!(!playback.advance());
        assert!(!playback.restart_if_finished());
    }
}
