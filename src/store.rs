//! Durable storage for finished aggregates, and the augmentation workflow.
//!
//! Aggregates are stored as JSON, keyed by seed, under `$PENNEY_HOME` (or
//! `~/.penney-cli/sim`). Saves are atomic: write to a temp file in the same
//! directory, then rename over the old aggregate, so a failed save leaves
//! whatever was previously persisted untouched.

use std::path::{Path, PathBuf};

use crate::error::PenneyResult;
use crate::merge::merge;
use crate::patterns::all_pairs;
use crate::simulate::{run_trials, BatchCounts};

pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PENNEY_HOME") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".penney-cli").join("sim")
}

pub fn aggregate_path(dir: &Path, seed: u64) -> PathBuf {
    dir.join(format!("aggregate_{}.json", seed))
}

pub fn save_counts(dir: &Path, counts: &BatchCounts) -> PenneyResult<()> {
    std::fs::create_dir_all(dir)?;
    let path = aggregate_path(dir, counts.primary_seed());
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(counts)?;
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// Load the aggregate stored for `seed`, if any. A malformed or internally
/// inconsistent blob is an error, not a silent fresh start.
pub fn load_counts(dir: &Path, seed: u64) -> PenneyResult<Option<BatchCounts>> {
    let path = aggregate_path(dir, seed);
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let counts: BatchCounts = serde_json::from_str(&json)?;
    counts.validate()?;
    Ok(Some(counts))
}

/// Extend the stored aggregate for `seed` by `extra_trials` fresh trials.
///
/// New trials always run over the next unused index range of the same seed
/// (`[trials, trials + extra)`), which is disjoint from everything already
/// absorbed by construction; merge re-checks anyway. If nothing is stored
/// yet, a fresh full-matrix aggregate is created. The stored file is only
/// replaced after the merged result is fully computed.
pub fn augment(
    dir: &Path,
    seed: u64,
    extra_trials: u64,
    half_deck_size: usize,
) -> PenneyResult<BatchCounts> {
    let merged = match load_counts(dir, seed)? {
        Some(existing) => {
            let next_start = existing
                .ranges()
                .iter()
                .filter(|r| r.seed == seed)
                .map(|r| r.end())
                .max()
                .unwrap_or(0);
            let addition = run_trials(
                existing.pairs(),
                next_start,
                extra_trials,
                seed,
                existing.half_deck_size(),
            )?;
            merge(&existing, &addition)?
        }
        None => run_trials(&all_pairs(), 0, extra_trials, seed, half_deck_size)?,
    };
    save_counts(dir, &merged)?;
    Ok(merged)
}
