//! Difficulty-targeting puzzle generator for the armada Battleships
//! puzzle engine.
//!
//! [`PuzzleGenerator`] samples a hidden fleet arrangement, derives clues
//! from it, and then tightens or loosens the clue set, consulting the
//! solvers of `armada-solver`, until the instance meets the difficulty
//! contract:
//!
//! - Basic and Intermediate puzzles fall to the simple deduction rules;
//! - Advanced puzzles need at least one advanced rule;
//! - Unreasonable puzzles defeat the deduction rules while the
//!   exhaustive search still proves a unique solution, and not too
//!   quickly.
//!
//! Generation is reproducible: a [`PuzzleSeed`] pins the whole random
//! stream.

mod generator;
mod placer;
mod seed;

pub use self::{
    generator::{GeneratedPuzzle, GenerationTrace, PuzzleGenerator},
    seed::{ParseSeedError, PuzzleSeed},
};
