//! Single-pass deck scan: who takes which tricks and cards.
//!
//! One left-to-right pass with a bounded lookback buffer. When the most
//! recent symbols complete a player's pattern, that player takes a trick and
//! every card dealt since the last capture (the match window included), and
//! the buffer resets so captured cards can never be matched again. Player 1's
//! pattern is checked first, so a position that completes both patterns at
//! once always credits Player 1. Cards still on the table at end of deck are
//! discarded, not assigned to anyone.

use crate::deck::Deck;
use crate::patterns::{Pattern, Symbol, PATTERN_LEN};

/// Raw result of scanning one deck against one pattern pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Match events per player: [Player 1, Player 2].
    pub tricks: [u32; 2],
    /// Total cards captured per player: [Player 1, Player 2].
    pub cards: [u32; 2],
}

pub fn scan(deck: &Deck, p1: Pattern, p2: Pattern) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut lookback: Vec<Symbol> = Vec::with_capacity(PATTERN_LEN);
    let mut pending: u32 = 0;

    for &symbol in deck.symbols() {
        lookback.push(symbol);
        pending += 1;
        if lookback.len() > PATTERN_LEN {
            lookback.remove(0);
        }
        if lookback.len() < PATTERN_LEN {
            continue;
        }
        if lookback == p1.symbols() {
            outcome.tricks[0] += 1;
            outcome.cards[0] += pending;
            pending = 0;
            lookback.clear();
        } else if lookback == p2.symbols() {
            outcome.tricks[1] += 1;
            outcome.cards[1] += pending;
            pending = 0;
            lookback.clear();
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_of(notation: &str) -> Deck {
        let symbols = notation
            .chars()
            .map(|c| Symbol::from_char(c).unwrap())
            .collect();
        Deck::from_symbols(symbols)
    }

    fn p(notation: &str) -> Pattern {
        Pattern::parse(notation).unwrap()
    }

    #[test]
    fn repeated_match_captures_everything() {
        // R B B R B B against RBB: two tricks, all six cards to Player 1.
        let outcome = scan(&deck_of("RBBRBB"), p("RBB"), p("BBB"));
        assert_eq!(outcome.tricks, [2, 0]);
        assert_eq!(outcome.cards, [6, 0]);
    }

    #[test]
    fn capture_includes_cards_dealt_before_the_match() {
        // RR are on the table when BBB completes; Player 2 takes all five.
        let outcome = scan(&deck_of("RRBBB"), p("RBR"), p("BBB"));
        assert_eq!(outcome.tricks, [0, 1]);
        assert_eq!(outcome.cards, [0, 5]);
    }

    #[test]
    fn trailing_cards_are_discarded() {
        let outcome = scan(&deck_of("BBBRR"), p("BBB"), p("RRR"));
        assert_eq!(outcome.tricks, [1, 0]);
        assert_eq!(outcome.cards, [3, 0]);
    }

    #[test]
    fn no_match_scores_nothing() {
        let outcome = scan(&deck_of("RBRBRB"), p("RRR"), p("BBB"));
        assert_eq!(outcome, ScanOutcome::default());
    }

    #[test]
    fn player_one_wins_simultaneous_completion() {
        // Identical patterns complete at the same position; Player 1 is
        // checked first and must take the trick.
        let outcome = scan(&deck_of("RBB"), p("RBB"), p("RBB"));
        assert_eq!(outcome.tricks, [1, 0]);
        assert_eq!(outcome.cards, [3, 0]);
    }

    #[test]
    fn buffer_reset_prevents_overlapping_captures() {
        // BBBB against BBB: the second B-run would need the buffer to carry
        // over captured cards. Only one trick.
        let outcome = scan(&deck_of("BBBB"), p("BBB"), p("RRR"));
        assert_eq!(outcome.tricks, [1, 0]);
        assert_eq!(outcome.cards, [3, 0]);

        // Six Bs: two full disjoint windows.
        let outcome = scan(&deck_of("BBBBBB"), p("BBB"), p("RRR"));
        assert_eq!(outcome.tricks, [2, 0]);
        assert_eq!(outcome.cards, [6, 0]);
    }

    #[test]
    fn both_players_can_score_in_one_deck() {
        let outcome = scan(&deck_of("RRRBBB"), p("RRR"), p("BBB"));
        assert_eq!(outcome.tricks, [1, 1]);
        assert_eq!(outcome.cards, [3, 3]);
    }

    #[test]
    fn short_deck_scores_nothing() {
        let outcome = scan(&deck_of("RB"), p("RBB"), p("BBB"));
        assert_eq!(outcome, ScanOutcome::default());
    }
}
