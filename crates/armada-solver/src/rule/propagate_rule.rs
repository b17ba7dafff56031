use armada_core::{Board, Clues};

use crate::{propagate, rule::Rule};

/// Neighbour propagation as a rule: applies
/// [`propagate`](crate::propagate::propagate) once.
#[derive(Debug, Default, Clone, Copy)]
pub struct Propagate;

impl Rule for Propagate {
    fn name(&self) -> &'static str {
        "propagate"
    }

    fn apply(&self, _clues: &Clues, board: &mut Board) -> bool {
        propagate::propagate(board)
    }
}
