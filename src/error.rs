use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenneyError {
    #[error("Invalid card symbol: {0} (expected 'B' or 'R')")]
    InvalidSymbol(char),

    #[error("Invalid pattern notation: {0}")]
    InvalidPatternNotation(String),

    #[error("Pattern must be exactly {expected} symbols, got {got}")]
    PatternLength { expected: usize, got: usize },

    #[error("Half deck size must be positive")]
    InvalidHalfDeckSize,

    #[error("Trial count must be positive")]
    InvalidTrialCount,

    #[error("No pattern pairs requested")]
    EmptyPairSet,

    #[error("Cannot merge: pattern pair sets differ")]
    PairSetMismatch,

    #[error("Cannot merge: half deck sizes differ ({a} vs {b})")]
    DeckSizeMismatch { a: usize, b: usize },

    #[error("Cannot merge: trial ranges overlap under seed {seed}")]
    OverlappingTrialRanges { seed: u64 },

    #[error("Stored aggregate is inconsistent: pair {pair} has {got} classifications over {trials} trials")]
    CorruptAggregate { pair: String, got: u64, trials: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PenneyResult<T> = Result<T, PenneyError>;
