use armada_core::{Board, CellState, Clues};

use crate::rule::{Rule, Unfinished};

/// Capping runs at the longest unfinished ship.
///
/// Once a straight run of occupied cells reaches the length of the
/// longest ship still missing, it cannot grow, so the cells beyond both
/// of its ends are vacant. When that longest length is one, the cap is
/// only applied to cells whose perpendicular neighbours are not occupied,
/// since the run could still be growing on the other axis.
///
/// Occupied cells are first promoted to their typed states so that the
/// completed-ship tally sees finished ships.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunCap;

impl Rule for RunCap {
    fn name(&self) -> &'static str {
        "run cap"
    }

    fn apply(&self, clues: &Clues, board: &mut Board) -> bool {
        let mut changed = board.classify_occupied();
        let longest = Unfinished::scan(clues, board).longest();
        let (h, w) = (board.height(), board.width());

        // rows
        for y in 0..h {
            let mut k = 1;
            for x in 0..w {
                if board.get(y, x).is_occupied() {
                    if k < longest {
                        k += 1;
                    } else if longest > 1
                        || (!occupied(board.at(y as isize - 1, x as isize))
                            && !occupied(board.at(y as isize + 1, x as isize)))
                    {
                        if x + 1 < w && board.get(y, x + 1) == CellState::Undef {
                            board.set(y, x + 1, CellState::Vacant);
                            changed = true;
                        }
                        if x >= k && board.get(y, x - k) == CellState::Undef {
                            board.set(y, x - k, CellState::Vacant);
                            changed = true;
                        }
                    }
                } else {
                    k = 1;
                }
            }
        }

        // columns
        for x in 0..w {
            let mut k = 1;
            for y in 0..h {
                if board.get(y, x).is_occupied() {
                    if k < longest {
                        k += 1;
                    } else if longest > 1
                        || (!occupied(board.at(y as isize, x as isize - 1))
                            && !occupied(board.at(y as isize, x as isize + 1)))
                    {
                        if y + 1 < h && board.get(y + 1, x) == CellState::Undef {
                            board.set(y + 1, x, CellState::Vacant);
                            changed = true;
                        }
                        if y >= k && board.get(y - k, x) == CellState::Undef {
                            board.set(y - k, x, CellState::Vacant);
                            changed = true;
                        }
                    }
                } else {
                    k = 1;
                }
            }
        }

        changed
    }
}

fn occupied(state: Option<CellState>) -> bool {
    state.is_some_and(CellState::is_occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_length_run_is_capped() {
        // longest ship is 3; the run of three cannot grow
        let clues = Clues::new(
            vec![3, 2],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ???????
            ?###???
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(RunCap.apply(&clues, &mut board));
        assert_eq!(board.get(1, 0), CellState::Vacant);
        assert_eq!(board.get(1, 4), CellState::Vacant);
    }

    #[test]
    fn test_short_run_is_left_open() {
        let clues = Clues::new(
            vec![3, 2],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ???????
            ?##????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        RunCap.apply(&clues, &mut board);
        assert_eq!(board.get(1, 0), CellState::Undef);
        assert_eq!(board.get(1, 3), CellState::Undef);
    }

    #[test]
    fn test_completed_fleet_shrinks_the_cap() {
        // the three-ship is already done elsewhere, so a run of two is
        // capped by the remaining two-ship
        let clues = Clues::new(
            vec![3, 2],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ^??????
            x??????
            v??????
            ???????
            ???##??
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(RunCap.apply(&clues, &mut board));
        assert_eq!(board.get(4, 2), CellState::Vacant);
        assert_eq!(board.get(4, 5), CellState::Vacant);
    }

    #[test]
    fn test_unit_cap_spares_vertical_growth() {
        // longest unfinished ship is 1: a lone occupied cell with an
        // occupied vertical neighbour may still be part of a column run,
        // so its flanks stay open
        let clues = Clues::new(
            vec![2, 1],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ^??????
            v??????
            ???????
            ???#???
            ???#???
            ???????
            ???????
        "
        .parse()
        .unwrap();
        RunCap.apply(&clues, &mut board);
        // the row pass leaves the vertically stretched pair alone
        assert_eq!(board.get(3, 2), CellState::Undef);
        assert_eq!(board.get(3, 4), CellState::Undef);
    }
}
