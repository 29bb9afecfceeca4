//! Progress cursor carried between chunks.

use super::ChunkOutcome;
use crate::model::MatchCandidate;
use serde::{Deserialize, Serialize};

/// Offset into the flattened pair space plus the matches found so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    pub offset: usize,
    pub total_pairs: usize,
    /// Accumulated in the order chunks produced them
    pub matches: Vec<MatchCandidate>,
}

impl ScanCursor {
    #[must_use]
    pub const fn new(total_pairs: usize) -> Self {
        Self {
            offset: 0,
            total_pairs,
            matches: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.offset >= self.total_pairs
    }

    /// Pairs left to visit.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.total_pairs.saturating_sub(self.offset)
    }

    /// Fraction of the pair space visited, 0.0 - 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_pairs == 0 {
            return 1.0;
        }
        (self.offset.min(self.total_pairs) as f64) / self.total_pairs as f64
    }

    /// Fold a chunk's result into the cursor.
    ///
    /// Outcomes that start anywhere but the current offset are ignored, so a
    /// replayed chunk cannot double-count matches.
    pub fn absorb(&mut self, outcome: &ChunkOutcome) -> bool {
        if outcome.offset != self.offset {
            return false;
        }
        self.matches.extend(outcome.matches.iter().cloned());
        self.offset = outcome.next_offset;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let mut cursor = ScanCursor::new(4);
        assert_eq!(cursor.progress(), 0.0);
        assert!(!cursor.is_done());

        let outcome = ChunkOutcome {
            offset: 0,
            next_offset: 2,
            ..ChunkOutcome::default()
        };
        assert!(cursor.absorb(&outcome));
        assert_eq!(cursor.progress(), 0.5);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_stale_outcome_ignored() {
        let mut cursor = ScanCursor::new(10);
        cursor.offset = 5;
        let stale = ChunkOutcome {
            offset: 0,
            next_offset: 5,
            ..ChunkOutcome::default()
        };
        assert!(!cursor.absorb(&stale));
        assert_eq!(cursor.offset, 5);
    }

    #[test]
    fn test_empty_space_is_done() {
        let cursor = ScanCursor::new(0);
        assert!(cursor.is_done());
        assert_eq!(cursor.progress(), 1.0);
    }
}
