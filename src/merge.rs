//! Batch merging: the sole mechanism for growing an existing estimate.
//!
//! Merging sums the underlying counts, never averages probabilities, so the
//! result is bit-identical to a single run over the union of trials. Valid
//! only for batches built from disjoint trial-index ranges; because every
//! batch carries its ranges, disjointness is checked rather than assumed from
//! any seed-increment convention.

use crate::error::{PenneyError, PenneyResult};
use crate::simulate::BatchCounts;

/// Combine two independently computed batches. Associative and commutative.
pub fn merge(a: &BatchCounts, b: &BatchCounts) -> PenneyResult<BatchCounts> {
    if a.half_deck_size() != b.half_deck_size() {
        return Err(PenneyError::DeckSizeMismatch {
            a: a.half_deck_size(),
            b: b.half_deck_size(),
        });
    }
    if a.pairs() != b.pairs() {
        return Err(PenneyError::PairSetMismatch);
    }
    for ra in a.ranges() {
        for rb in b.ranges() {
            if ra.overlaps(rb) {
                return Err(PenneyError::OverlappingTrialRanges { seed: ra.seed });
            }
        }
    }

    let mut merged = a.clone();
    merged.absorb(b);
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
