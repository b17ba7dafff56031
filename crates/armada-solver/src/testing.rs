//! Test utilities for rule implementations.
//!
//! [`RuleTester`] is a small harness for unit-testing deduction rules:
//! seed it with a glyph board and clues, apply rules, and assert on the
//! resulting cells with source-located failures.
//!
//! # Example
//!
//! ```
//! use armada_core::{Board, CellState, Clues};
//! use armada_solver::{rule::LineCounts, testing::RuleTester};
//!
//! let clues = Clues::new(
//!     vec![1],
//!     vec![Some(0), Some(1)],
//!     vec![None; 7],
//!     Board::undef(2, 7),
//! );
//! RuleTester::new(clues)
//!     .apply_once(&LineCounts)
//!     .assert_cell(0, 0, CellState::Vacant)
//!     .assert_unchanged(1, 0);
//! ```

use std::str::FromStr as _;

use armada_core::{Board, CellState, Clues};

use crate::rule::Rule;

/// A harness for verifying rule implementations.
///
/// Tracks the initial and current board, applies rules, and offers
/// chained assertions. All assertion methods panic with a detailed
/// message on failure and carry `#[track_caller]` so the failure points
/// at the test line.
#[derive(Debug)]
pub struct RuleTester {
    clues: Clues,
    initial: Board,
    current: Board,
}

impl RuleTester {
    /// Creates a tester whose board starts from the disclosed cells of
    /// the clues.
    #[must_use]
    pub fn new(clues: Clues) -> Self {
        let initial = clues.init().clone();
        let current = initial.clone();
        Self {
            clues,
            initial,
            current,
        }
    }

    /// Creates a tester from clues and a glyph board overriding the
    /// starting state.
    ///
    /// # Panics
    ///
    /// Panics if the board does not parse or its size does not match the
    /// clues.
    #[track_caller]
    #[must_use]
    pub fn with_board(clues: Clues, board: &str) -> Self {
        let initial = Board::from_str(board).unwrap();
        assert_eq!(
            (initial.height(), initial.width()),
            (clues.height(), clues.width()),
            "board size does not match the clues"
        );
        let current = initial.clone();
        Self {
            clues,
            initial,
            current,
        }
    }

    /// The current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.current
    }

    /// Applies the rule once.
    #[must_use]
    pub fn apply_once<R: Rule>(mut self, rule: &R) -> Self {
        rule.apply(&self.clues, &mut self.current);
        self
    }

    /// Applies the rule repeatedly until it reports no change.
    ///
    /// # Panics
    ///
    /// Panics if the rule keeps reporting change beyond any possible
    /// number of cell promotions, which would mean a non-monotone rule.
    #[track_caller]
    #[must_use]
    pub fn apply_until_stuck<R: Rule>(mut self, rule: &R) -> Self {
        let budget = 8 * self.current.height() * self.current.width() + 4;
        for _ in 0..budget {
            if !rule.apply(&self.clues, &mut self.current) {
                return self;
            }
        }
        panic!("rule {:?} did not reach a fixed point", rule.name());
    }

    /// Asserts the state of one cell.
    #[track_caller]
    #[must_use]
    pub fn assert_cell(self, y: usize, x: usize, want: CellState) -> Self {
        let got = self.current.get(y, x);
        assert_eq!(
            got, want,
            "expected {want:?} at ({y},{x}), found {got:?} on\n{}",
            self.current
        );
        self
    }

    /// Asserts that a cell still holds its initial state.
    #[track_caller]
    #[must_use]
    pub fn assert_unchanged(self, y: usize, x: usize) -> Self {
        let initial = self.initial.get(y, x);
        let got = self.current.get(y, x);
        assert_eq!(
            got, initial,
            "expected ({y},{x}) to keep {initial:?}, found {got:?} on\n{}",
            self.current
        );
        self
    }

    /// Asserts the whole board against a glyph string.
    #[track_caller]
    #[must_use]
    pub fn assert_board(self, want: &str) -> Self {
        let want = Board::from_str(want).unwrap();
        assert_eq!(
            self.current, want,
            "boards differ: expected\n{want}\nfound\n{}",
            self.current
        );
        self
    }
}
