//! Monte Carlo outcome estimation for Penney's Game played over shuffled
//! binary decks: deterministic deck generation, single-pass pattern scanning
//! under two scoring rules, and statistically-correct batch aggregation.

pub mod cli;
pub mod deck;
pub mod display;
pub mod error;
pub mod merge;
pub mod patterns;
pub mod scanner;
pub mod simulate;
pub mod store;
pub mod table;
