//! Core grid primitives for the armada Battleships puzzle engine.
//!
//! A puzzle asks the player to reconstruct the positions of a fleet of
//! straight ships on a rectangular grid, given per-row and per-column
//! occupancy totals (some possibly hidden), the multiset of ship lengths,
//! and a set of initially disclosed cells. Ships may not touch each other,
//! not even diagonally.
//!
//! This crate holds the vocabulary shared by the solvers, the generator and
//! the game state:
//!
//! - [`CellState`]: the nine-way cell classification with its wire codes
//! - [`Grid`] and [`Board`]: dynamic H×W storage with a text codec
//! - [`Rotation`]: the four grid rotations used to write neighbour rules once
//! - [`Clues`]: the immutable definition of a puzzle instance
//! - [`ShipPlacement`] and [`completed_ships`]: fleet bookkeeping
//! - [`Params`] and [`Difficulty`]: host-facing generation parameters

mod cell;
mod clues;
mod fleet;
mod grid;
mod params;
mod rotate;

pub use self::{
    cell::CellState,
    clues::Clues,
    fleet::{Orientation, ShipPlacement, Solution, completed_ships, render_solution},
    grid::{Board, Grid, GridParseError, Position},
    params::{Difficulty, Params, ParamsError, SIZE_MAX, SIZE_MIN},
    rotate::{Rotation, RotatedGrid, RotatedGridMut},
};
