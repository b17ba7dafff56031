//! Player-facing game state and string interfaces for the armada
//! Battleships puzzle engine.
//!
//! A host frontend owns rendering and input; this crate owns everything
//! between the strings it exchanges and the solvers:
//!
//! - [`desc`]: the puzzle description grammar (`s`/`r`/`c`/`y x z`)
//! - [`Move`]: the move grammar (cell writes, drags, line marks, and
//!   solver-produced solutions)
//! - [`GameState`]: the mutable play state with validation flags
//! - [`validate`]: the structural checks behind those flags
//! - [`solve_move`]: the Solve action, rendering a full solution as a
//!   move string

pub mod desc;

mod game;
mod moves;
mod validate;

pub use self::{
    game::{GameState, SolveError, solve_move},
    moves::{Move, MoveError},
    validate::{Validation, validate},
};
