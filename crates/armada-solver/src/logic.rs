use armada_core::{Board, Clues, Difficulty};

use crate::rule::{self, BoxedRule};

/// How far the deduction rules carried on a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicStatus {
    /// Every ship cell was found using the simple rules alone.
    SolvedSimple,
    /// Every ship cell was found, but at least one advanced rule was
    /// needed.
    SolvedAdvanced,
    /// A fixed point was reached with ship cells still missing.
    Stuck,
}

/// Per-rule application counts collected during a solve.
#[derive(Debug, Clone)]
pub struct LogicStats {
    names: Vec<&'static str>,
    applications: Vec<usize>,
    passes: usize,
}

impl LogicStats {
    /// Rule names in application order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// How many passes each rule changed the board, in the same order as
    /// [`names`](Self::names).
    #[must_use]
    pub fn applications(&self) -> &[usize] {
        &self.applications
    }

    /// Number of full passes over the rule sets.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }
}

/// The outcome of a [`LogicSolver`] run.
#[derive(Debug, Clone)]
pub struct LogicReport {
    /// The board at the fixed point: complete for the solved statuses,
    /// partial when stuck.
    pub board: Board,
    /// Cells known occupied at the fixed point.
    pub occupied: usize,
    /// Cells known vacant at the fixed point.
    pub vacant: usize,
    /// Grading of the solve.
    pub status: LogicStatus,
    /// Per-rule statistics.
    pub stats: LogicStats,
}

/// The deductive solver.
///
/// Applies the simple rules to a fixed point; once they stop producing
/// anything, the advanced set is given one pass, and any change it makes
/// hands control back to the simple rules. The run ends when neither set
/// changes the board. The board checksum grows strictly under every
/// legal write, so comparing checksums detects change.
///
/// The advanced set is only enabled for difficulties that may require it;
/// for Basic and Intermediate the solver never grades a puzzle
/// [`SolvedAdvanced`](LogicStatus::SolvedAdvanced).
///
/// # Examples
///
/// ```
/// use armada_core::{Board, Clues, Difficulty};
/// use armada_solver::{LogicSolver, LogicStatus};
///
/// // a one-row puzzle: three singletons among five cells
/// let clues = Clues::new(
///     vec![1, 1, 1],
///     vec![Some(3)],
///     vec![Some(1), Some(0), Some(1), Some(0), Some(1)],
///     Board::undef(1, 5),
/// );
/// let report = LogicSolver::new(Difficulty::Basic).solve(&clues);
/// assert_eq!(report.status, LogicStatus::SolvedSimple);
/// assert_eq!(report.board.to_string(), "o.o.o");
/// ```
#[derive(Debug)]
pub struct LogicSolver {
    simple: Vec<BoxedRule>,
    advanced: Vec<BoxedRule>,
}

impl LogicSolver {
    /// Creates a solver for the given difficulty. The advanced rules are
    /// included only when the difficulty may require them.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        let advanced = if difficulty.uses_advanced_rules() {
            rule::advanced_rules()
        } else {
            Vec::new()
        };
        Self {
            simple: rule::simple_rules(),
            advanced,
        }
    }

    /// Runs the rules to a fixed point on a fresh board seeded from the
    /// disclosed cells.
    #[must_use]
    pub fn solve(&self, clues: &Clues) -> LogicReport {
        let mut board = clues.init().clone();
        let mut stats = LogicStats {
            names: self
                .simple
                .iter()
                .chain(&self.advanced)
                .map(|r| r.name())
                .collect(),
            applications: vec![0; self.simple.len() + self.advanced.len()],
            passes: 0,
        };
        let mut complex = false;

        // every legal write raises a cell code, which bounds the number
        // of productive passes; the cap only cuts short boards whose
        // contradictory clues make the propagator oscillate
        let pass_limit = 8 * board.height() * board.width() + 4;

        while stats.passes < pass_limit {
            stats.passes += 1;
            let before = board.checksum();

            for (i, rule) in self.simple.iter().enumerate() {
                if rule.apply(clues, &mut board) {
                    stats.applications[i] += 1;
                }
            }
            if board.checksum() != before {
                continue;
            }

            if self.advanced.is_empty() {
                break;
            }
            for (i, rule) in self.advanced.iter().enumerate() {
                if rule.apply(clues, &mut board) {
                    stats.applications[self.simple.len() + i] += 1;
                }
            }
            if board.checksum() == before {
                break;
            }
            complex = true;
        }

        let occupied = board.occupied_count();
        let vacant = board.vacant_count();
        let status = if occupied == clues.ships_sum() {
            if complex {
                LogicStatus::SolvedAdvanced
            } else {
                LogicStatus::SolvedSimple
            }
        } else {
            LogicStatus::Stuck
        };

        LogicReport {
            board,
            occupied,
            vacant,
            status,
            stats,
        }
    }
}
