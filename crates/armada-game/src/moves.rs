use armada_core::{CellState, Clues, Position};
use thiserror::Error;

use crate::desc::Scanner;

/// A malformed move string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed move string")]
pub struct MoveError;

/// One player or solver move.
///
/// The wire forms are:
///
/// - `y<int>x<int>z<int>`: write one cell, `z` in `-2..=6` where `-2`
///   clears the cell back to unknown
/// - `d<0|1>y..x..y..x..`: a drag over a rectangle; `0` marks unknown
///   cells vacant, `1` clears vacant marks again
/// - `r<int>` / `c<int>`: toggle the done flag of a row or column
/// - `S` followed by one `y..x..z..` triple per ship cell: a full
///   solution produced by the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Write one cell.
    Cell {
        /// The cell to write.
        pos: Position,
        /// The state to write, [`Undef`](CellState::Undef) to clear.
        state: CellState,
    },
    /// Mark or unmark a rectangle of cells vacant.
    Drag {
        /// `true` clears vacant marks, `false` sets them.
        clear: bool,
        /// One corner of the rectangle.
        from: Position,
        /// The opposite corner.
        to: Position,
    },
    /// Toggle the done flag of a row.
    ToggleRow(usize),
    /// Toggle the done flag of a column.
    ToggleCol(usize),
    /// Fill in a complete solution, one typed state per ship cell.
    Solution(Vec<(Position, CellState)>),
}

impl Move {
    /// Parses a move string against the clue dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] for missing or out-of-range payloads, for a
    /// drag without two corners, and for a solution stream that does not
    /// cover exactly every ship cell.
    pub fn parse(clues: &Clues, text: &str) -> Result<Self, MoveError> {
        let (h, w) = (clues.height(), clues.width());
        let solving = text.starts_with('S');
        let dragging = text.starts_with('d');

        let mut clear = None;
        let mut ys: Vec<usize> = Vec::new();
        let mut xs: Vec<usize> = Vec::new();
        let mut zs: Vec<CellState> = Vec::new();
        let mut row = None;
        let mut col = None;

        let mut scanner = Scanner::new(text);
        while let Some(tag) = scanner.next_tag() {
            match tag {
                'd' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(0..=1).contains(&v) {
                        return Err(MoveError);
                    }
                    clear = Some(v == 1);
                }
                'y' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(0..h as i32).contains(&v) {
                        return Err(MoveError);
                    }
                    ys.push(v as usize);
                }
                'x' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(0..w as i32).contains(&v) {
                        return Err(MoveError);
                    }
                    xs.push(v as usize);
                }
                'z' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(-2..=6).contains(&v) {
                        return Err(MoveError);
                    }
                    zs.push(CellState::from_code(v as i8).unwrap());
                }
                'r' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(0..h as i32).contains(&v) {
                        return Err(MoveError);
                    }
                    row = Some(v as usize);
                }
                'c' => {
                    let v = scanner.integer().ok_or(MoveError)?;
                    if !(0..w as i32).contains(&v) {
                        return Err(MoveError);
                    }
                    col = Some(v as usize);
                }
                _ => {}
            }
        }

        if solving {
            let cells = clues.ships_sum();
            if ys.len() != cells || xs.len() != cells || zs.len() != cells {
                return Err(MoveError);
            }
            let triples = ys
                .into_iter()
                .zip(xs)
                .zip(zs)
                .map(|((y, x), state)| (Position::new(y, x), state))
                .collect();
            return Ok(Self::Solution(triples));
        }

        if dragging {
            if ys.len() < 2 || xs.len() < 2 {
                return Err(MoveError);
            }
            let clear = clear.ok_or(MoveError)?;
            return Ok(Self::Drag {
                clear,
                from: Position::new(ys[0], xs[0]),
                to: Position::new(ys[1], xs[1]),
            });
        }

        match (ys.last(), xs.last(), zs.last(), row, col) {
            (Some(&y), Some(&x), Some(&state), _, _) => Ok(Self::Cell {
                pos: Position::new(y, x),
                state,
            }),
            (_, _, _, Some(r), _) => Ok(Self::ToggleRow(r)),
            (_, _, _, _, Some(c)) => Ok(Self::ToggleCol(c)),
            _ => Err(MoveError),
        }
    }
}

#[cfg(test)]
mod tests {
    use armada_core::Board;

    use super::*;

    fn clues() -> Clues {
        Clues::new(
            vec![2, 1],
            vec![Some(0); 7],
            vec![Some(0); 7],
            Board::undef(7, 7),
        )
    }

    #[test]
    fn test_cell_write() {
        let mv = Move::parse(&clues(), "y2x3z5").unwrap();
        assert_eq!(
            mv,
            Move::Cell {
                pos: Position::new(2, 3),
                state: CellState::One,
            }
        );
        let mv = Move::parse(&clues(), "y2x3z-2").unwrap();
        assert_eq!(
            mv,
            Move::Cell {
                pos: Position::new(2, 3),
                state: CellState::Undef,
            }
        );
    }

    #[test]
    fn test_drag() {
        let mv = Move::parse(&clues(), "d0y1x1y3x4").unwrap();
        assert_eq!(
            mv,
            Move::Drag {
                clear: false,
                from: Position::new(1, 1),
                to: Position::new(3, 4),
            }
        );
        let mv = Move::parse(&clues(), "d1y6x6y6x6").unwrap();
        assert!(matches!(mv, Move::Drag { clear: true, .. }));
    }

    #[test]
    fn test_line_toggles() {
        assert_eq!(Move::parse(&clues(), "r4"), Ok(Move::ToggleRow(4)));
        assert_eq!(Move::parse(&clues(), "c0"), Ok(Move::ToggleCol(0)));
    }

    #[test]
    fn test_solution_stream() {
        // three ship cells in total
        let text = "Sy0x0z4y0x1z2y2x2z5";
        let mv = Move::parse(&clues(), text).unwrap();
        let Move::Solution(cells) = mv else {
            panic!("expected a solution move");
        };
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], (Position::new(0, 0), CellState::West));
        assert_eq!(cells[2], (Position::new(2, 2), CellState::One));
    }

    #[test]
    fn test_malformed_moves() {
        assert!(Move::parse(&clues(), "y2x3").is_err());
        assert!(Move::parse(&clues(), "y9x0z0").is_err());
        assert!(Move::parse(&clues(), "y0x0z9").is_err());
        assert!(Move::parse(&clues(), "d2y0x0y1x1").is_err());
        assert!(Move::parse(&clues(), "d0y0x0").is_err());
        assert!(Move::parse(&clues(), "Sy0x0z4").is_err());
        assert!(Move::parse(&clues(), "").is_err());
    }
}
