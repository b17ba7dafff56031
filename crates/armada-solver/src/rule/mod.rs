//! The deduction rules applied by the logical solver.
//!
//! Each rule inspects the clues and the current board and writes every
//! cell state it can force, returning whether anything changed. Rules are
//! local and sound: they only ever raise a cell's knowledge, so applying
//! them in any order converges.
//!
//! The simple set ([`simple_rules`]) suffices for Basic and Intermediate
//! puzzles; the advanced set ([`advanced_rules`]) is enabled on top of it
//! for Advanced and Unreasonable grading.

use std::fmt::Debug;

use armada_core::{Board, Clues};

mod gap_fill;
mod gap_prune;
mod line_counts;
mod propagate_rule;
mod run_cap;

pub use self::{
    gap_fill::GapFill, gap_prune::GapPrune, line_counts::LineCounts,
    propagate_rule::Propagate, run_cap::RunCap,
};

/// A single deduction rule.
pub trait Rule: Debug {
    /// A short human-readable name for statistics and traces.
    fn name(&self) -> &'static str;

    /// Applies the rule once, writing every forced cell. Returns `true`
    /// if the board changed.
    fn apply(&self, clues: &Clues, board: &mut Board) -> bool;
}

/// A boxed rule.
pub type BoxedRule = Box<dyn Rule>;

/// The simple rule set, in application order: neighbour propagation,
/// row/column counting, and capping runs at the longest unfinished ship.
#[must_use]
pub fn simple_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(Propagate),
        Box::new(LineCounts),
        Box::new(RunCap),
    ]
}

/// The advanced rule set: pruning cells whose gaps are too small for the
/// shortest unfinished ship, and the counted-gap fill.
#[must_use]
pub fn advanced_rules() -> Vec<BoxedRule> {
    vec![Box::new(GapPrune), Box::new(GapFill)]
}

/// The number of each ship length still missing from the board, and the
/// longest and shortest unfinished lengths.
///
/// Shared bookkeeping for the run and gap rules: completed ships are
/// subtracted from the required distribution.
#[derive(Debug, Clone)]
pub(crate) struct Unfinished {
    /// `remaining[len - 1]` ships of length `len` still to be found.
    pub remaining: Vec<usize>,
}

impl Unfinished {
    pub(crate) fn scan(clues: &Clues, board: &Board) -> Self {
        let (done, _) = armada_core::completed_ships(board, clues.longest_ship());
        let remaining = clues
            .distribution()
            .iter()
            .zip(&done)
            .map(|(&want, &have)| want.saturating_sub(have))
            .collect();
        Self { remaining }
    }

    /// Length of the longest unfinished ship, or 0 when the fleet is
    /// complete.
    pub(crate) fn longest(&self) -> usize {
        self.remaining
            .iter()
            .rposition(|&n| n > 0)
            .map_or(0, |i| i + 1)
    }

    /// Length of the shortest unfinished ship, or 0 when the fleet is
    /// complete.
    pub(crate) fn shortest(&self) -> usize {
        self.remaining
            .iter()
            .position(|&n| n > 0)
            .map_or(0, |i| i + 1)
    }

    /// How many ships of the longest unfinished length are missing.
    pub(crate) fn longest_count(&self) -> usize {
        match self.longest() {
            0 => 0,
            len => self.remaining[len - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use armada_core::Board;

    use super::*;

    fn clues_7x7(ships: Vec<u8>) -> Clues {
        let h = 7;
        Clues::new(ships, vec![None; h], vec![None; h], Board::undef(h, h))
    }

    #[test]
    fn test_unfinished_tracks_completed_ships() {
        let clues = clues_7x7(vec![3, 2, 2]);
        let board: Board = "
            ^??????
            x??????
            v??????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        let unfinished = Unfinished::scan(&clues, &board);
        assert_eq!(unfinished.remaining, vec![0, 2, 0]);
        assert_eq!(unfinished.longest(), 2);
        assert_eq!(unfinished.shortest(), 2);
        assert_eq!(unfinished.longest_count(), 2);
    }

    #[test]
    fn test_unfinished_empty_fleet() {
        let clues = clues_7x7(vec![2]);
        let board: Board = "
            ^??????
            v??????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        let unfinished = Unfinished::scan(&clues, &board);
        assert_eq!(unfinished.longest(), 0);
        assert_eq!(unfinished.shortest(), 0);
        assert_eq!(unfinished.longest_count(), 0);
    }

    #[test]
    fn test_rule_sets() {
        let names: Vec<_> = simple_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["propagate", "line counts", "run cap"]);
        let names: Vec<_> = advanced_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["gap prune", "gap fill"]);
    }
}
