//! Example demonstrating basic puzzle generation.
//!
//! This example shows how to:
//! - Create a `PuzzleGenerator` and generate a random puzzle
//! - Display the clue summary, the hidden solution, and the seed
//!
//! # Usage
//!
//! ```sh
//! cargo run --example generate_puzzle
//! ```

use armada_core::{Difficulty, Params};
use armada_generator::PuzzleGenerator;

fn main() {
    let params = Params::new(8, 10, Difficulty::Intermediate);
    let generator = PuzzleGenerator::new();

    let puzzle = generator.generate(&params);
    println!("Seed:");
    println!("  {}", puzzle.seed);
    println!();
    println!("Ships: {:?}", puzzle.clues.ships());
    println!(
        "Row totals: {:?}",
        puzzle.clues.rows().iter().map(fmt_total).collect::<Vec<_>>()
    );
    println!(
        "Column totals: {:?}",
        puzzle.clues.cols().iter().map(fmt_total).collect::<Vec<_>>()
    );
    println!();
    println!("Disclosed cells:");
    println!("{}", puzzle.clues.init());
    println!();
    println!("Solution:");
    println!("{}", puzzle.solution_board());
    println!();
    println!(
        "Tuning: {} rounds, fast return: {}",
        puzzle.trace.tuning_rounds, puzzle.trace.fast_return
    );
}

fn fmt_total(total: &Option<u8>) -> String {
    match total {
        Some(n) => n.to_string(),
        None => "?".to_string(),
    }
}
