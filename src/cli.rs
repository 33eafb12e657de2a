use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::deck::{Deck, HALF_DECK_SIZE};
use crate::display::{
    deck_display, heatmap, pair_summary, print_error, print_success, probability_bar,
};
use crate::error::PenneyResult;
use crate::patterns::{all_pairs, Pattern, Symbol};
use crate::simulate::{run_trials, ScoringRule};
use crate::store;
use crate::table::ProbabilityTable;

#[derive(Parser)]
#[command(
    name = "penney",
    version = "1.0.0",
    about = "Penney's Game Monte Carlo toolkit: win/draw probabilities for every length-3 pattern pair."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RuleArg {
    Tricks,
    Cards,
    Both,
}

impl RuleArg {
    fn rules(self) -> Vec<ScoringRule> {
        match self {
            RuleArg::Tricks => vec![ScoringRule::Tricks],
            RuleArg::Cards => vec![ScoringRule::Cards],
            RuleArg::Both => vec![ScoringRule::Tricks, ScoringRule::Cards],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate win/loss/draw probabilities for one pattern pair
    Simulate {
        /// Player 1's pattern (e.g. BBB)
        #[arg(long)]
        p1: String,
        /// Player 2's pattern (e.g. RBB)
        #[arg(long)]
        p2: String,
        /// Number of shuffled decks to run
        #[arg(short, long, default_value_t = 100_000)]
        trials: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Cards of each color per deck
        #[arg(long = "half-deck", default_value_t = HALF_DECK_SIZE)]
        half_deck: usize,
    },
    /// Run all 64 pattern pairs and print the probability heatmap(s)
    Matrix {
        #[arg(short, long, default_value_t = 100_000)]
        trials: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, value_enum, default_value = "both")]
        rule: RuleArg,
        /// Persist the aggregate so it can be augmented later
        #[arg(long)]
        save: bool,
        #[arg(long = "half-deck", default_value_t = HALF_DECK_SIZE)]
        half_deck: usize,
    },
    /// Add trials to the stored aggregate and re-render the heatmaps
    Augment {
        /// Number of additional trials
        #[arg(short, long)]
        trials: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, value_enum, default_value = "both")]
        rule: RuleArg,
    },
    /// Print one generated deck
    Deal {
        /// Trial index within the seed's stream
        #[arg(long, default_value_t = 0)]
        trial: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long = "half-deck", default_value_t = HALF_DECK_SIZE)]
        half_deck: usize,
    },
}

pub fn run() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Simulate {
            p1,
            p2,
            trials,
            seed,
            half_deck,
        } => cmd_simulate(&p1, &p2, trials, seed, half_deck),
        Commands::Matrix {
            trials,
            seed,
            rule,
            save,
            half_deck,
        } => cmd_matrix(trials, seed, rule, save, half_deck),
        Commands::Augment { trials, seed, rule } => cmd_augment(trials, seed, rule),
        Commands::Deal {
            trial,
            seed,
            half_deck,
        } => cmd_deal(trial, seed, half_deck),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn cmd_simulate(
    p1: &str,
    p2: &str,
    trials: u64,
    seed: u64,
    half_deck: usize,
) -> PenneyResult<()> {
    let p1 = Pattern::parse(p1)?;
    let p2 = Pattern::parse(p2)?;

    let start = Instant::now();
    let counts = run_trials(&[(p1, p2)], 0, trials, seed, half_deck)?;
    let elapsed = start.elapsed();

    let probs = counts.probabilities();
    let pair_probs = &probs[&(p1, p2)];

    println!();
    println!("{}", pair_summary(p1, p2, pair_probs));
    println!();
    println!(
        "  P2 win ({}):  {}",
        ScoringRule::Tricks.as_str(),
        probability_bar(pair_probs.tricks.win, 40),
    );
    println!(
        "  P2 win ({}):   {}",
        ScoringRule::Cards.as_str(),
        probability_bar(pair_probs.cards.win, 40),
    );
    println!();
    println!(
        "  {} trials, seed {}, {:.2}s",
        trials.to_string().bold(),
        seed,
        elapsed.as_secs_f64(),
    );
    Ok(())
}

fn cmd_matrix(
    trials: u64,
    seed: u64,
    rule: RuleArg,
    save: bool,
    half_deck: usize,
) -> PenneyResult<()> {
    let start = Instant::now();
    let counts = run_trials(&all_pairs(), 0, trials, seed, half_deck)?;
    let elapsed = start.elapsed();

    let table = ProbabilityTable::from_counts(&counts);
    println!();
    for r in rule.rules() {
        println!("{}", heatmap(&table, r));
        println!();
    }
    println!(
        "  {} trials across 64 pairs, seed {}, {:.2}s",
        trials.to_string().bold(),
        seed,
        elapsed.as_secs_f64(),
    );

    if save {
        let dir = store::data_dir();
        store::save_counts(&dir, &counts)?;
        print_success(&format!(
            "Saved aggregate to {}",
            store::aggregate_path(&dir, counts.primary_seed()).display(),
        ));
    }
    Ok(())
}

fn cmd_augment(trials: u64, seed: u64, rule: RuleArg) -> PenneyResult<()> {
    let dir = store::data_dir();
    let before = store::load_counts(&dir, seed)?
        .map(|c| c.trials())
        .unwrap_or(0);

    let start = Instant::now();
    let merged = store::augment(&dir, seed, trials, HALF_DECK_SIZE)?;
    let elapsed = start.elapsed();

    let table = ProbabilityTable::from_counts(&merged);
    println!();
    for r in rule.rules() {
        println!("{}", heatmap(&table, r));
        println!();
    }
    println!(
        "  {} -> {} trials (+{}), seed {}, {:.2}s",
        before,
        merged.trials().to_string().bold(),
        trials,
        seed,
        elapsed.as_secs_f64(),
    );
    Ok(())
}

fn cmd_deal(trial: u64, seed: u64, half_deck: usize) -> PenneyResult<()> {
    let deck = Deck::generate(trial, seed, half_deck)?;
    let reds = deck
        .symbols()
        .iter()
        .filter(|&&s| s == Symbol::Red)
        .count();
    println!();
    println!("  {}", deck_display(deck.symbols()));
    println!();
    println!(
        "  trial {} seed {}: {} cards, {} red / {} black",
        trial,
        seed,
        deck.len(),
        reds,
        deck.len() - reds,
    );
    Ok(())
}
