use std::sync::Arc;

use armada_core::{Board, CellState, Clues, Position};
use armada_solver::{ExactSolver, SearchOutcome};
use thiserror::Error;

use crate::{Move, Validation, validate};

/// The Solve action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The clues admit more than one arrangement.
    #[error("Multiple solutions exist for this puzzle")]
    MultipleSolutions,
    /// The clues admit no arrangement.
    #[error("No solution exists for this puzzle")]
    NoSolution,
}

/// Runs the exhaustive solver and renders the solution as a move string:
/// `S` followed by one `y..x..z..` triple per ship cell, every cell
/// typed.
///
/// # Errors
///
/// Fails when the clues do not determine exactly one arrangement.
pub fn solve_move(clues: &Clues) -> Result<String, SolveError> {
    let report = ExactSolver::new().solve(clues);
    let solution = match report.outcome {
        SearchOutcome::Unique(solution) => solution,
        SearchOutcome::NonUnique { .. } => return Err(SolveError::MultipleSolutions),
        SearchOutcome::NoSolution | SearchOutcome::LimitExceeded => {
            return Err(SolveError::NoSolution);
        }
    };

    let mut out = String::from("S");
    for (&len, placement) in clues.ships().iter().zip(&solution) {
        let len = len as usize;
        for (k, pos) in placement.cells(len).enumerate() {
            let state = placement.cell_state(len, k);
            out.push_str(&format!("y{}x{}z{}", pos.y, pos.x, state.code()));
        }
    }
    Ok(out)
}

/// A play state: the board as marked by the player, the line done marks,
/// and the validation flags derived from them.
///
/// The clues are shared read-only; disclosed cells cannot be overwritten
/// by moves. After every move the occupied cells are reclassified from
/// their neighbour context and the validation flags are refreshed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use armada_core::{Board, Clues};
/// use armada_game::{GameState, Move};
///
/// let clues = Arc::new(Clues::new(
///     vec![1],
///     vec![Some(1), Some(0), Some(0)],
///     vec![Some(1), Some(0), Some(0)],
///     Board::undef(3, 3),
/// ));
/// let mut game = GameState::new(clues.clone());
/// game.execute(&Move::parse(&clues, "y0x0z0").unwrap());
/// game.execute(&Move::parse(&clues, "d0y1x0y2x2").unwrap());
/// game.execute(&Move::parse(&clues, "d0y0x1y0x2").unwrap());
/// // with its neighbourhood vacated, the occupied mark is classified
/// // as a one-cell ship and the puzzle is recognized as solved
/// assert_eq!(game.board().to_string(), "o..\n...\n...");
/// assert!(game.is_completed());
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    clues: Arc<Clues>,
    board: Board,
    row_marks: Vec<bool>,
    col_marks: Vec<bool>,
    validation: Validation,
    completed: bool,
    cheated: bool,
}

impl GameState {
    /// Starts a game from its clues. The board is seeded with the
    /// disclosed cells, classified where their neighbours already settle
    /// the shape.
    #[must_use]
    pub fn new(clues: Arc<Clues>) -> Self {
        let mut board = clues.init().clone();
        board.classify_occupied();
        let validation = validate(&clues, &board);
        let completed = validation.solved;
        Self {
            row_marks: vec![false; clues.height()],
            col_marks: vec![false; clues.width()],
            board,
            validation,
            completed,
            cheated: false,
            clues,
        }
    }

    /// The puzzle being played.
    #[must_use]
    pub fn clues(&self) -> &Clues {
        &self.clues
    }

    /// The board as currently marked.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The validation flags for the current board.
    #[must_use]
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Whether the player marked this row as dealt with.
    #[must_use]
    pub fn row_marked(&self, y: usize) -> bool {
        self.row_marks[y]
    }

    /// Whether the player marked this column as dealt with.
    #[must_use]
    pub fn col_marked(&self, x: usize) -> bool {
        self.col_marks[x]
    }

    /// Whether the puzzle has been completed at some point.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether a solver-produced solution was applied.
    #[must_use]
    pub fn is_cheated(&self) -> bool {
        self.cheated
    }

    /// Applies one move, then reclassifies the board and refreshes the
    /// validation flags.
    pub fn execute(&mut self, mv: &Move) {
        match mv {
            Move::Cell { pos, state } => {
                let disclosed = self.clues.init()[*pos];
                self.board[*pos] = if disclosed == CellState::Undef {
                    *state
                } else {
                    disclosed
                };
            }
            Move::Drag { clear, from, to } => {
                for y in from.y.min(to.y)..=from.y.max(to.y) {
                    for x in from.x.min(to.x)..=from.x.max(to.x) {
                        let pos = Position::new(y, x);
                        if *clear {
                            if self.clues.init()[pos] == CellState::Undef
                                && self.board[pos] == CellState::Vacant
                            {
                                self.board[pos] = CellState::Undef;
                            }
                        } else if self.board[pos] == CellState::Undef {
                            self.board[pos] = CellState::Vacant;
                        }
                    }
                }
            }
            Move::ToggleRow(y) => self.row_marks[*y] = !self.row_marks[*y],
            Move::ToggleCol(x) => self.col_marks[*x] = !self.col_marks[*x],
            Move::Solution(cells) => {
                self.board = self.clues.init().clone();
                for &(pos, state) in cells {
                    self.board[pos] = state;
                }
                for pos in self.clues.init().positions() {
                    if self.board[pos] == CellState::Undef {
                        self.board[pos] = CellState::Vacant;
                    }
                }
                self.cheated = true;
            }
        }

        self.board.reclassify(self.clues.init());
        self.validation = validate(&self.clues, &self.board);
        self.completed |= self.validation.solved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singleton_clues() -> Arc<Clues> {
        Arc::new(Clues::new(
            vec![1],
            vec![Some(1), Some(0), Some(0)],
            vec![Some(1), Some(0), Some(0)],
            Board::undef(3, 3),
        ))
    }

    fn run(game: &mut GameState, text: &str) {
        let mv = Move::parse(game.clues(), text).unwrap();
        game.execute(&mv);
    }

    #[test]
    fn test_filling_the_board_completes_the_game() {
        let clues = singleton_clues();
        let mut game = GameState::new(clues);
        assert!(!game.is_completed());

        run(&mut game, "y0x0z0");
        assert!(!game.is_completed());

        // vacate everything else with a drag and one extra cell write
        run(&mut game, "d0y0x1y2x2");
        run(&mut game, "y1x0z-1");
        run(&mut game, "y2x0z-1");
        assert!(game.is_completed());
        assert!(game.validation().solved);
        assert!(!game.is_cheated());
        assert_eq!(game.board().get(0, 0), CellState::One);
    }

    #[test]
    fn test_disclosed_cells_resist_moves() {
        let mut init = Board::undef(3, 3);
        init.set(0, 0, CellState::One);
        let clues = Arc::new(Clues::new(
            vec![1],
            vec![Some(1), Some(0), Some(0)],
            vec![Some(1), Some(0), Some(0)],
            init,
        ));
        let mut game = GameState::new(clues);
        run(&mut game, "y0x0z-1");
        assert_eq!(game.board().get(0, 0), CellState::One);
    }

    #[test]
    fn test_drag_clear_spares_player_unknowns() {
        let clues = singleton_clues();
        let mut game = GameState::new(clues);
        run(&mut game, "d0y0x0y2x2");
        assert_eq!(game.board().get(1, 1), CellState::Vacant);
        run(&mut game, "d1y0x0y2x2");
        assert_eq!(game.board().get(1, 1), CellState::Undef);
    }

    #[test]
    fn test_line_toggles() {
        let clues = singleton_clues();
        let mut game = GameState::new(clues);
        assert!(!game.row_marked(1));
        run(&mut game, "r1");
        assert!(game.row_marked(1));
        run(&mut game, "r1");
        assert!(!game.row_marked(1));
        run(&mut game, "c2");
        assert!(game.col_marked(2));
    }

    #[test]
    fn test_solve_move_round_trip() {
        let clues = singleton_clues();
        let text = solve_move(&clues).unwrap();
        assert_eq!(text, "Sy0x0z5");

        let mut game = GameState::new(clues);
        run(&mut game, &text);
        assert!(game.is_completed());
        assert!(game.is_cheated());
    }

    #[test]
    fn test_solve_move_errors() {
        // ambiguous: two singletons on a diagonal
        let clues = Clues::new(
            vec![1, 1],
            vec![Some(1), Some(0), Some(1)],
            vec![Some(1), Some(0), Some(1)],
            Board::undef(3, 3),
        );
        assert_eq!(solve_move(&clues), Err(SolveError::MultipleSolutions));

        // contradictory: the only admissible row is disclosed vacant
        let mut init = Board::undef(3, 3);
        for x in 0..3 {
            init.set(0, x, CellState::Vacant);
        }
        let clues = Clues::new(
            vec![1],
            vec![Some(1), Some(0), Some(0)],
            vec![Some(1), Some(0), Some(0)],
            init,
        );
        assert_eq!(solve_move(&clues), Err(SolveError::NoSolution));
    }

    #[test]
    fn test_typed_marks_demote_when_context_changes() {
        let clues = singleton_clues();
        let mut game = GameState::new(clues);
        // a west end with nothing east of it falls back to plain occupied
        run(&mut game, "y1x0z4");
        assert_eq!(game.board().get(1, 0), CellState::Occ);
    }
}
