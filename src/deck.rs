use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PenneyError, PenneyResult};
use crate::patterns::Symbol;

/// 26 red + 26 black gives a standard 52-card deck.
pub const HALF_DECK_SIZE: usize = 26;

/// One shuffled deck: `2 * half_deck_size` symbols, exactly half of each color.
/// Immutable after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    symbols: Vec<Symbol>,
}

impl Deck {
    /// Generate the deck for one trial. Pure function of its inputs: the same
    /// `(trial_index, seed)` always yields the same deck, and each trial index
    /// draws from its own RNG stream, so results do not depend on how many
    /// decks were generated before this one or on which thread asks.
    pub fn generate(trial_index: u64, seed: u64, half_deck_size: usize) -> PenneyResult<Deck> {
        if half_deck_size == 0 {
            return Err(PenneyError::InvalidHalfDeckSize);
        }
        let mut symbols = Vec::with_capacity(2 * half_deck_size);
        symbols.extend(std::iter::repeat(Symbol::Black).take(half_deck_size));
        symbols.extend(std::iter::repeat(Symbol::Red).take(half_deck_size));
        let mut rng = StdRng::seed_from_u64(stream_key(seed, trial_index));
        symbols.shuffle(&mut rng);
        Ok(Deck { symbols })
    }

    pub fn from_symbols(symbols: Vec<Symbol>) -> Deck {
        Deck { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// SplitMix64 finalizer over the (seed, trial_index) pair. Counter-based
/// keying: every trial gets an independent stream instead of sharing one
/// running generator.
fn stream_key(seed: u64, trial_index: u64) -> u64 {
    let mut z = seed
        .wrapping_add(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(trial_index.wrapping_mul(0xD1B5_4A32_D192_ED03));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_is_balanced() {
        for half in [1, 5, 26, 100] {
            let deck = Deck::generate(0, 42, half).unwrap();
            assert_eq!(deck.len(), 2 * half);
            let reds = deck
                .symbols()
                .iter()
                .filter(|&&s| s == Symbol::Red)
                .count();
            assert_eq!(reds, half);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = Deck::generate(17, 42, HALF_DECK_SIZE).unwrap();
        let b = Deck::generate(17, 42, HALF_DECK_SIZE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_indices_give_distinct_decks() {
        // Two independent 52-card shuffles colliding is astronomically
        // unlikely; a collision here means the stream keying is broken.
        let a = Deck::generate(0, 42, HALF_DECK_SIZE).unwrap();
        let b = Deck::generate(1, 42, HALF_DECK_SIZE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_seeds_give_distinct_decks() {
        let a = Deck::generate(0, 42, HALF_DECK_SIZE).unwrap();
        let b = Deck::generate(0, 43, HALF_DECK_SIZE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_half_deck_is_rejected() {
        assert!(Deck::generate(0, 42, 0).is_err());
    }
}
