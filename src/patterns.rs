use std::fmt;

use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{PenneyError, PenneyResult};

/// Every pattern is exactly this long; there are 2^3 = 8 of them.
pub const PATTERN_LEN: usize = 3;
pub const NUM_PATTERNS: usize = 1 << PATTERN_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Black,
    Red,
}

impl Symbol {
    pub fn from_char(c: char) -> PenneyResult<Symbol> {
        match c.to_ascii_uppercase() {
            'B' => Ok(Symbol::Black),
            'R' => Ok(Symbol::Red),
            _ => Err(PenneyError::InvalidSymbol(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Symbol::Black => 'B',
            Symbol::Red => 'R',
        }
    }

    /// Binary encoding: Black = 0, Red = 1.
    pub fn bit(self) -> usize {
        match self {
            Symbol::Black => 0,
            Symbol::Red => 1,
        }
    }

    fn from_bit(bit: usize) -> Symbol {
        if bit & 1 == 0 {
            Symbol::Black
        } else {
            Symbol::Red
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A player's chosen length-3 sequence, e.g. "RBB".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pattern([Symbol; PATTERN_LEN]);

impl Pattern {
    pub fn new(symbols: [Symbol; PATTERN_LEN]) -> Pattern {
        Pattern(symbols)
    }

    pub fn parse(notation: &str) -> PenneyResult<Pattern> {
        let notation = notation.trim();
        let chars: Vec<char> = notation.chars().collect();
        if chars.len() != PATTERN_LEN {
            return Err(PenneyError::PatternLength {
                expected: PATTERN_LEN,
                got: chars.len(),
            });
        }
        let mut symbols = [Symbol::Black; PATTERN_LEN];
        for (slot, &c) in symbols.iter_mut().zip(chars.iter()) {
            *slot = Symbol::from_char(c)
                .map_err(|_| PenneyError::InvalidPatternNotation(notation.to_string()))?;
        }
        Ok(Pattern(symbols))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Index in 0..8: binary value of the symbols, first symbol most significant.
    /// BBB = 0, BBR = 1, ... RRR = 7.
    pub fn index(&self) -> usize {
        self.0.iter().fold(0, |acc, s| (acc << 1) | s.bit())
    }

    pub fn from_index(index: usize) -> Pattern {
        let mut symbols = [Symbol::Black; PATTERN_LEN];
        for (i, slot) in symbols.iter_mut().enumerate() {
            *slot = Symbol::from_bit(index >> (PATTERN_LEN - 1 - i));
        }
        Pattern(symbols)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.0 {
            write!(f, "{}", s.to_char())?;
        }
        Ok(())
    }
}

/// All 8 patterns in index order: BBB, BBR, BRB, BRR, RBB, RBR, RRB, RRR.
pub static ALL_PATTERNS: Lazy<[Pattern; NUM_PATTERNS]> = Lazy::new(|| {
    let mut patterns = [Pattern([Symbol::Black; PATTERN_LEN]); NUM_PATTERNS];
    for (i, p) in patterns.iter_mut().enumerate() {
        *p = Pattern::from_index(i);
    }
    patterns
});

/// All 64 ordered (Player 1, Player 2) pattern pairs.
pub fn all_pairs() -> Vec<(Pattern, Pattern)> {
    ALL_PATTERNS
        .iter()
        .cartesian_product(ALL_PATTERNS.iter())
        .map(|(&p1, &p2)| (p1, p2))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for notation in ["BBB", "BBR", "BRB", "BRR", "RBB", "RBR", "RRB", "RRR"] {
            let p = Pattern::parse(notation).unwrap();
            assert_eq!(p.to_string(), notation);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            Pattern::parse("rbb").unwrap(),
            Pattern::parse("RBB").unwrap()
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(Pattern::parse("RB").is_err());
        assert!(Pattern::parse("RBBB").is_err());
        assert!(Pattern::parse("RBX").is_err());
        assert!(Pattern::parse("").is_err());
    }

    #[test]
    fn index_round_trip() {
        for i in 0..NUM_PATTERNS {
            assert_eq!(Pattern::from_index(i).index(), i);
        }
        assert_eq!(Pattern::parse("BBB").unwrap().index(), 0);
        assert_eq!(Pattern::parse("RBB").unwrap().index(), 4);
        assert_eq!(Pattern::parse("RRR").unwrap().index(), 7);
    }

    #[test]
    fn all_patterns_ordered_by_index() {
        assert_eq!(ALL_PATTERNS[0].to_string(), "BBB");
        assert_eq!(ALL_PATTERNS[7].to_string(), "RRR");
        for (i, p) in ALL_PATTERNS.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn all_pairs_covers_the_grid() {
        let pairs = all_pairs();
        assert_eq!(pairs.len(), NUM_PATTERNS * NUM_PATTERNS);
        let distinct: std::collections::HashSet<_> = pairs.iter().collect();
        assert_eq!(distinct.len(), pairs.len());
    }
}
