//! Trial aggregation: run many independent decks and tally outcomes per
//! pattern pair under both scoring rules.
//!
//! Trials are embarrassingly parallel: every trial is a pure function of
//! `(trial_index, seed)`, workers fold into local grids, and the reduce step
//! is plain count addition, so the final tallies are identical for any worker
//! count or execution order. One deck is shared by all pattern pairs within a
//! trial: every pair sees the same deck sequence, which keeps cross-pair
//! comparisons paired.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::error::{PenneyError, PenneyResult};
use crate::patterns::{Pattern, NUM_PATTERNS};
use crate::scanner::{scan, ScanOutcome};

/// Which way a deck is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRule {
    /// Count discrete pattern-match events.
    Tricks,
    /// Count total cards captured across all matches.
    Cards,
}

impl ScoringRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringRule::Tricks => "tricks",
            ScoringRule::Cards => "cards",
        }
    }
}

impl fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Win/loss/draw counts for one pair under one scoring rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTally {
    pub p1_wins: u64,
    pub p2_wins: u64,
    pub draws: u64,
}

impl RuleTally {
    fn record(&mut self, p1_score: u32, p2_score: u32) {
        match p1_score.cmp(&p2_score) {
            Ordering::Greater => self.p1_wins += 1,
            Ordering::Less => self.p2_wins += 1,
            Ordering::Equal => self.draws += 1,
        }
    }

    fn add(&mut self, other: &RuleTally) {
        self.p1_wins += other.p1_wins;
        self.p2_wins += other.p2_wins;
        self.draws += other.draws;
    }

    pub fn total(&self) -> u64 {
        self.p1_wins + self.p2_wins + self.draws
    }
}

/// AggregateCounts for one ordered pattern pair: one tally per scoring rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    pub tricks: RuleTally,
    pub cards: RuleTally,
}

impl PairCounts {
    /// Classify one trial's scan outcome under both rules. Equal patterns are
    /// degenerate: Player 2 can never out-draw Player 1, so the trial is a
    /// Player 2 loss by convention, never a draw.
    fn record(&mut self, outcome: &ScanOutcome, equal_patterns: bool) {
        if equal_patterns {
            self.tricks.p1_wins += 1;
            self.cards.p1_wins += 1;
            return;
        }
        self.tricks.record(outcome.tricks[0], outcome.tricks[1]);
        self.cards.record(outcome.cards[0], outcome.cards[1]);
    }

    fn add(&mut self, other: &PairCounts) {
        self.tricks.add(&other.tricks);
        self.cards.add(&other.cards);
    }

    pub fn rule(&self, rule: ScoringRule) -> &RuleTally {
        match rule {
            ScoringRule::Tricks => &self.tricks,
            ScoringRule::Cards => &self.cards,
        }
    }
}

/// The trial indices one batch consumed from one seed's stream. Carried so
/// that merges can verify disjointness instead of trusting a seed-increment
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRange {
    pub seed: u64,
    pub start: u64,
    pub count: u64,
}

impl TrialRange {
    pub fn end(&self) -> u64 {
        self.start + self.count
    }

    pub fn overlaps(&self, other: &TrialRange) -> bool {
        self.seed == other.seed && self.start < other.end() && other.start < self.end()
    }
}

/// A finished batch of trials: per-pair counts in a fixed 64-slot grid
/// (row-major by pattern index) plus the trial ranges that produced them.
/// Immutable once built; grown only through [`crate::merge::merge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCounts {
    half_deck_size: usize,
    trials: u64,
    ranges: Vec<TrialRange>,
    pairs: Vec<(Pattern, Pattern)>,
    grid: Vec<PairCounts>,
}

impl BatchCounts {
    pub fn half_deck_size(&self) -> usize {
        self.half_deck_size
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn ranges(&self) -> &[TrialRange] {
        &self.ranges
    }

    /// Requested pairs, sorted and deduplicated.
    pub fn pairs(&self) -> &[(Pattern, Pattern)] {
        &self.pairs
    }

    /// Seed the batch was started under; used as the storage key.
    pub fn primary_seed(&self) -> u64 {
        self.ranges.first().map(|r| r.seed).unwrap_or(0)
    }

    /// Counts for one pair, or `None` if the pair was not requested.
    pub fn counts(&self, p1: Pattern, p2: Pattern) -> Option<&PairCounts> {
        if !self.pairs.contains(&(p1, p2)) {
            return None;
        }
        Some(&self.grid[slot(p1, p2)])
    }

    /// Element-wise addition of an identically-shaped batch. Compatibility
    /// checks live in [`crate::merge::merge`]; this is the raw sum.
    pub(crate) fn absorb(&mut self, other: &BatchCounts) {
        for (mine, theirs) in self.grid.iter_mut().zip(other.grid.iter()) {
            mine.add(theirs);
        }
        self.trials += other.trials;
        self.ranges.extend_from_slice(&other.ranges);
    }

    /// Every requested pair must have exactly one classification per trial
    /// per rule. Violations mean a corrupted or hand-edited aggregate.
    pub fn validate(&self) -> PenneyResult<()> {
        for &(p1, p2) in &self.pairs {
            let counts = &self.grid[slot(p1, p2)];
            for rule in [ScoringRule::Tricks, ScoringRule::Cards] {
                let got = counts.rule(rule).total();
                if got != self.trials {
                    return Err(PenneyError::CorruptAggregate {
                        pair: format!("{} vs {}", p1, p2),
                        got,
                        trials: self.trials,
                    });
                }
            }
        }
        Ok(())
    }

    /// Derived probabilities, Player 2's perspective, per scoring rule.
    pub fn probabilities(&self) -> HashMap<(Pattern, Pattern), PairProbs> {
        self.pairs
            .iter()
            .map(|&(p1, p2)| {
                let counts = &self.grid[slot(p1, p2)];
                ((p1, p2), PairProbs::from_counts(counts))
            })
            .collect()
    }
}

fn slot(p1: Pattern, p2: Pattern) -> usize {
    p1.index() * NUM_PATTERNS + p2.index()
}

/// Player 2's win/loss/draw probabilities under one rule. Each in `[0, 1]`;
/// the three sum to 1 (within floating-point tolerance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleProbs {
    pub win: f64,
    pub loss: f64,
    pub draw: f64,
}

impl RuleProbs {
    fn from_tally(tally: &RuleTally) -> RuleProbs {
        let total = tally.total() as f64;
        RuleProbs {
            win: tally.p2_wins as f64 / total,
            loss: tally.p1_wins as f64 / total,
            draw: tally.draws as f64 / total,
        }
    }
}

impl fmt::Display for RuleProbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Loss {:.1}% | Draw {:.1}%",
            self.win * 100.0,
            self.loss * 100.0,
            self.draw * 100.0,
        )
    }
}

/// Both rules' probabilities for one pattern pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairProbs {
    pub tricks: RuleProbs,
    pub cards: RuleProbs,
}

impl PairProbs {
    fn from_counts(counts: &PairCounts) -> PairProbs {
        PairProbs {
            tricks: RuleProbs::from_tally(&counts.tricks),
            cards: RuleProbs::from_tally(&counts.cards),
        }
    }

    pub fn rule(&self, rule: ScoringRule) -> &RuleProbs {
        match rule {
            ScoringRule::Tricks => &self.tricks,
            ScoringRule::Cards => &self.cards,
        }
    }
}

/// Run `count` trials over indices `start..start + count` of `seed`'s stream,
/// scanning every requested pair against each deck.
pub fn run_trials(
    pairs: &[(Pattern, Pattern)],
    start: u64,
    count: u64,
    seed: u64,
    half_deck_size: usize,
) -> PenneyResult<BatchCounts> {
    if count == 0 {
        return Err(PenneyError::InvalidTrialCount);
    }
    if half_deck_size == 0 {
        return Err(PenneyError::InvalidHalfDeckSize);
    }
    if pairs.is_empty() {
        return Err(PenneyError::EmptyPairSet);
    }
    let mut pairs = pairs.to_vec();
    pairs.sort();
    pairs.dedup();

    let grid_len = NUM_PATTERNS * NUM_PATTERNS;
    let grid = (start..start + count)
        .into_par_iter()
        .try_fold(
            || vec![PairCounts::default(); grid_len],
            |mut local, trial_index| -> PenneyResult<Vec<PairCounts>> {
                let deck = Deck::generate(trial_index, seed, half_deck_size)?;
                for &(p1, p2) in &pairs {
                    let outcome = scan(&deck, p1, p2);
                    local[slot(p1, p2)].record(&outcome, p1 == p2);
                }
                Ok(local)
            },
        )
        .try_reduce(
            || vec![PairCounts::default(); grid_len],
            |mut a, b| {
                for (mine, theirs) in a.iter_mut().zip(b.iter()) {
                    mine.add(theirs);
                }
                Ok(a)
            },
        )?;

    Ok(BatchCounts {
        half_deck_size,
        trials: count,
        ranges: vec![TrialRange { seed, start, count }],
        pairs,
        grid,
    })
}

/// Estimate win/loss/draw probabilities for each requested pair over
/// `num_trials` fresh decks. Deterministic: identical arguments yield
/// bit-identical results.
pub fn simulate(
    pairs: &[(Pattern, Pattern)],
    num_trials: u64,
    seed: u64,
) -> PenneyResult<HashMap<(Pattern, Pattern), PairProbs>> {
    let counts = run_trials(pairs, 0, num_trials, seed, crate::deck::HALF_DECK_SIZE)?;
    Ok(counts.probabilities())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
