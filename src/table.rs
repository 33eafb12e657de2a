//! The 8×8 probability matrix consumed by the rendering layer.

use crate::patterns::{Pattern, ALL_PATTERNS, NUM_PATTERNS};
use crate::simulate::{BatchCounts, PairProbs};

/// Read-only view over a finished batch: one row per Player 1 pattern, one
/// column per Player 2 pattern, in index order (BBB..RRR). Cells for pairs
/// the batch never ran are `None`. Regenerated from counts, never mutated.
#[derive(Debug, Clone)]
pub struct ProbabilityTable {
    cells: Vec<Option<PairProbs>>,
    trials: u64,
}

impl ProbabilityTable {
    pub fn from_counts(counts: &BatchCounts) -> ProbabilityTable {
        let probs = counts.probabilities();
        let mut cells = vec![None; NUM_PATTERNS * NUM_PATTERNS];
        for (&(p1, p2), &pair_probs) in &probs {
            cells[p1.index() * NUM_PATTERNS + p2.index()] = Some(pair_probs);
        }
        ProbabilityTable {
            cells,
            trials: counts.trials(),
        }
    }

    pub fn get(&self, p1: Pattern, p2: Pattern) -> Option<&PairProbs> {
        self.cells[p1.index() * NUM_PATTERNS + p2.index()].as_ref()
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Row/column labels in index order.
    pub fn labels() -> Vec<String> {
        ALL_PATTERNS.iter().map(|p| p.to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
