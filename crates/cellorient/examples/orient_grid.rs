//! Scramble a structured grid, orient it again and print search statistics.
//!
//! Usage:
//!   cargo run -p cellorient --example orient_grid -- 16
//!   cargo run -p cellorient --example orient_grid -- mobius 5

use cellorient::prelude::*;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("mobius") => {
            let n = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
            show_mobius(n);
        }
        other => {
            let side = other.and_then(|s| s.parse().ok()).unwrap_or(8);
            show_grid(side);
        }
    }
}

fn show_grid(side: usize) {
    let scrambled = scramble(&structured_grid(side, side), ReplayToken::new(2025, 0), true);
    let before = conflicting_edges(&scrambled.cells).len();
    let mut cells = scrambled.cells;
    match reorder_cells(2, &mut cells, SearchCfg::default()) {
        Ok(stats) => {
            println!(
                "grid {side}x{side}: conflicts before={before} after={} steps={} backtracks={} max_depth={}",
                conflicting_edges(&cells).len(),
                stats.steps,
                stats.backtracks,
                stats.max_depth
            );
        }
        Err(err) => eprintln!("grid {side}x{side}: {err}"),
    }
}

fn show_mobius(n: usize) {
    let cells = mobius_strip(n.max(3));
    match find_rotations(2, &cells, SearchCfg::default()) {
        Ok(sol) => println!("mobius {n}: unexpectedly solved in {} steps", sol.stats.steps),
        Err(err) => println!("mobius {n}: {err}"),
    }
}
