use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::patterns::{Pattern, Symbol, ALL_PATTERNS};
use crate::simulate::{PairProbs, ScoringRule};
use crate::table::ProbabilityTable;

/// Render one scoring rule's 8×8 grid: rows are Player 1's pattern, columns
/// Player 2's, cells Player 2's win probability in percent.
pub fn heatmap(table: &ProbabilityTable, rule: ScoringRule) -> String {
    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("P1 \\ P2")];
    for p in ALL_PATTERNS.iter() {
        header.push(Cell::new(p.to_string()).set_alignment(CellAlignment::Center));
    }
    grid.set_header(header);

    for &p1 in ALL_PATTERNS.iter() {
        let mut row = vec![Cell::new(p1.to_string().bold().to_string())];
        for &p2 in ALL_PATTERNS.iter() {
            let cell = match table.get(p1, p2) {
                Some(probs) if p1 == p2 => {
                    Cell::new(format_pct(probs.rule(rule).win).dimmed().to_string())
                }
                Some(probs) => {
                    let win = probs.rule(rule).win;
                    Cell::new(colorize_pct(win))
                }
                None => Cell::new("-".dimmed().to_string()),
            };
            row.push(cell.set_alignment(CellAlignment::Right));
        }
        grid.add_row(row);
    }

    format!(
        "  {} | Player 2 win probability [{}], {} trials\n{}",
        "Penney's Game".bold(),
        rule.as_str(),
        table.trials(),
        grid,
    )
}

fn format_pct(p: f64) -> String {
    format!("{:.1}", p * 100.0)
}

fn colorize_pct(win: f64) -> String {
    let pct = format_pct(win);
    if win >= 0.6 {
        pct.green().bold().to_string()
    } else if win >= 0.4 {
        pct.yellow().to_string()
    } else {
        pct.red().to_string()
    }
}

/// Win/loss/draw summary for a single pair, one row per scoring rule.
pub fn pair_summary(p1: Pattern, p2: Pattern, probs: &PairProbs) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Rule"),
        Cell::new("P2 Win").set_alignment(CellAlignment::Right),
        Cell::new("P2 Loss").set_alignment(CellAlignment::Right),
        Cell::new("Draw").set_alignment(CellAlignment::Right),
    ]);
    for rule in [ScoringRule::Tricks, ScoringRule::Cards] {
        let r = probs.rule(rule);
        table.add_row(vec![
            Cell::new(rule.as_str().bold().to_string()),
            Cell::new(format!("{:.2}%", r.win * 100.0)),
            Cell::new(format!("{:.2}%", r.loss * 100.0)),
            Cell::new(format!("{:.2}%", r.draw * 100.0)),
        ]);
    }
    format!(
        "  {} (P1) vs {} (P2)\n{}",
        p1.to_string().bold(),
        p2.to_string().bold(),
        table,
    )
}

/// Horizontal probability bar, green/yellow/red by magnitude.
pub fn probability_bar(p: f64, width: usize) -> String {
    let filled = (p * width as f64) as usize;
    let filled = filled.min(width);
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", p * 100.0);

    if p >= 0.6 {
        format!("{} {}", bar.green(), pct)
    } else if p >= 0.4 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

/// One generated deck, red symbols in red.
pub fn deck_display(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| match s {
            Symbol::Red => s.to_char().to_string().red().to_string(),
            Symbol::Black => s.to_char().to_string().dimmed().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::HALF_DECK_SIZE;
    use crate::patterns::all_pairs;
    use crate::simulate::run_trials;

    #[test]
    fn heatmap_includes_all_labels() {
        let counts = run_trials(&all_pairs(), 0, 10, 42, HALF_DECK_SIZE).unwrap();
        let table = ProbabilityTable::from_counts(&counts);
        let rendered = heatmap(&table, ScoringRule::Tricks);
        for p in ALL_PATTERNS.iter() {
            assert!(rendered.contains(&p.to_string()));
        }
        assert!(rendered.contains("10 trials"));
    }

    #[test]
    fn bar_never_exceeds_width() {
        let bar = probability_bar(1.0, 10);
        assert!(bar.contains("100.0%"));
        let bar = probability_bar(0.0, 10);
        assert!(bar.contains("0.0%"));
    }
}
