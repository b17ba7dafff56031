use armada_core::{Board, CellState, Clues};

use crate::rule::Rule;

/// Row and column counting.
///
/// For a line with a visible total: when the known-occupied cells already
/// reach the total, every remaining unknown cell is vacant; when the
/// unknown cells are exactly the ones needed to reach it, they are all
/// occupied.
///
/// The hidden lines of an axis share a single budget, the fleet size
/// minus the visible totals, and the same two deductions apply to all of
/// them collectively.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineCounts;

impl Rule for LineCounts {
    fn name(&self) -> &'static str {
        "line counts"
    }

    fn apply(&self, clues: &Clues, board: &mut Board) -> bool {
        let mut changed = false;
        changed |= count_axis(board, clues, Axis::Rows);
        changed |= count_axis(board, clues, Axis::Cols);
        changed
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Rows,
    Cols,
}

fn count_axis(board: &mut Board, clues: &Clues, axis: Axis) -> bool {
    let (lines, len, budget) = match axis {
        Axis::Rows => (clues.rows(), board.width(), clues.hidden_rows_budget()),
        Axis::Cols => (clues.cols(), board.height(), clues.hidden_cols_budget()),
    };
    let get = |board: &Board, line: usize, k: usize| match axis {
        Axis::Rows => board.get(line, k),
        Axis::Cols => board.get(k, line),
    };
    let set = |board: &mut Board, line: usize, k: usize, s: CellState| match axis {
        Axis::Rows => board.set(line, k, s),
        Axis::Cols => board.set(k, line, s),
    };

    let mut changed = false;
    let mut hidden_occ = 0usize;
    let mut hidden_und = 0usize;

    for (line, &total) in lines.iter().enumerate() {
        let mut occ = 0usize;
        let mut und = 0usize;
        for k in 0..len {
            let state = get(board, line, k);
            if state.is_occupied() {
                match total {
                    Some(_) => occ += 1,
                    None => hidden_occ += 1,
                }
            } else if state == CellState::Undef {
                match total {
                    Some(_) => und += 1,
                    None => hidden_und += 1,
                }
            }
        }
        let Some(total) = total else { continue };
        let total = total as usize;
        let fill = if occ == total {
            CellState::Vacant
        } else if occ + und == total {
            CellState::Occ
        } else {
            continue;
        };
        for k in 0..len {
            if get(board, line, k) == CellState::Undef {
                set(board, line, k, fill);
                changed = true;
            }
        }
    }

    // all hidden lines of an axis share one occupancy budget
    let fill = if hidden_occ == budget {
        Some(CellState::Vacant)
    } else if hidden_occ + hidden_und == budget {
        Some(CellState::Occ)
    } else {
        None
    };
    if let Some(fill) = fill {
        for (line, &total) in lines.iter().enumerate() {
            if total.is_some() {
                continue;
            }
            for k in 0..len {
                if get(board, line, k) == CellState::Undef {
                    set(board, line, k, fill);
                    changed = true;
                }
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturated_row_goes_vacant() {
        let clues = Clues::new(
            vec![2],
            vec![Some(2), Some(0), Some(0), Some(0), Some(0)],
            vec![None; 5],
            Board::undef(5, 5),
        );
        let mut board: Board = "
            ?##??
            ?????
            ?????
            ?????
            ?????
        "
        .parse()
        .unwrap();
        assert!(LineCounts.apply(&clues, &mut board));
        assert_eq!(board.get(0, 0), CellState::Vacant);
        assert_eq!(board.get(0, 3), CellState::Vacant);
        assert_eq!(board.get(0, 4), CellState::Vacant);
        // the zero rows empty out as well
        assert_eq!(board.get(2, 2), CellState::Vacant);
    }

    #[test]
    fn test_exact_deficit_fills_occupied() {
        let clues = Clues::new(
            vec![3],
            vec![Some(3), Some(0), Some(0), Some(0), Some(0)],
            vec![None; 5],
            Board::undef(5, 5),
        );
        let mut board: Board = "
            #?.?.
            ?????
            ?????
            ?????
            ?????
        "
        .parse()
        .unwrap();
        // one occupied plus two unknown cells reach the total of three,
        // so both unknowns are ship cells
        assert!(LineCounts.apply(&clues, &mut board));
        assert_eq!(board.get(0, 1), CellState::Occ);
        assert_eq!(board.get(0, 3), CellState::Occ);
    }

    #[test]
    fn test_hidden_rows_share_budget() {
        // fleet of 3 cells, one visible row carrying 2 of them: the two
        // hidden rows share a budget of 1
        let clues = Clues::new(
            vec![2, 1],
            vec![Some(2), None, None],
            vec![None; 5],
            Board::undef(3, 5),
        );
        let mut board: Board = "
            ?????
            #????
            .....
        "
        .parse()
        .unwrap();
        // the hidden budget of 1 is used up by the known ship cell
        assert!(LineCounts.apply(&clues, &mut board));
        for x in 1..5 {
            assert_eq!(board.get(1, x), CellState::Vacant, "x={x}");
        }
    }

    #[test]
    fn test_no_deduction_when_counts_are_loose() {
        let clues = Clues::new(
            vec![1],
            vec![Some(1)],
            vec![None; 5],
            Board::undef(1, 5),
        );
        let mut board = Board::undef(1, 5);
        // one ship cell somewhere in five unknowns: nothing is forced
        assert!(!LineCounts.apply(&clues, &mut board));
        assert_eq!(board, Board::undef(1, 5));
    }
}
