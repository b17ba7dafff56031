use armada_core::{Board, CellState, Clues};

use crate::rule::{Rule, Unfinished};

/// Pruning cells whose gaps are too small.
///
/// An unknown cell can only hold a ship part if some ship still fits
/// through it. For every unknown cell the longest contiguous stretch of
/// not-known-vacant cells through it is measured on both axes, capped at
/// the shortest unfinished ship length; when neither reaches that length,
/// no remaining ship can cover the cell and it is vacant.
///
/// This is the first of the advanced rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct GapPrune;

impl Rule for GapPrune {
    fn name(&self) -> &'static str {
        "gap prune"
    }

    fn apply(&self, clues: &Clues, board: &mut Board) -> bool {
        let mut changed = board.classify_occupied();
        let shortest = Unfinished::scan(clues, board).shortest();
        let (h, w) = (board.height(), board.width());

        for y in 0..h {
            for x in 0..w {
                if board.get(y, x) != CellState::Undef {
                    continue;
                }

                // vertical stretch through the cell, capped at the target
                let mut k = 1;
                while k < shortest && y + k < h && board.get(y + k, x) != CellState::Vacant {
                    k += 1;
                }
                let mut gap = k;
                if gap >= shortest {
                    continue;
                }
                k = 1;
                while gap + k - 1 < shortest && y >= k && board.get(y - k, x) != CellState::Vacant
                {
                    k += 1;
                }
                gap += k - 1;
                if gap >= shortest {
                    continue;
                }

                // horizontal stretch
                k = 1;
                while k < shortest && x + k < w && board.get(y, x + k) != CellState::Vacant {
                    k += 1;
                }
                gap = k;
                if gap >= shortest {
                    continue;
                }
                k = 1;
                while gap + k - 1 < shortest && x >= k && board.get(y, x - k) != CellState::Vacant
                {
                    k += 1;
                }
                gap += k - 1;
                if gap < shortest {
                    board.set(y, x, CellState::Vacant);
                    changed = true;
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pocket_too_small_for_any_ship() {
        // shortest remaining ship is 2; the corner pocket of one cell
        // cannot hold it
        let clues = Clues::new(
            vec![3, 2],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ?.?????
            .??????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(GapPrune.apply(&clues, &mut board));
        assert_eq!(board.get(0, 0), CellState::Vacant);
        // an open cell stays open
        assert_eq!(board.get(3, 3), CellState::Undef);
    }

    #[test]
    fn test_stretch_counts_occupied_cells() {
        // the stretch through an unknown cell may run over occupied
        // cells, so a cell next to a ship part is not pruned
        let clues = Clues::new(
            vec![3],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ?#?....
            .......
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        GapPrune.apply(&clues, &mut board);
        assert_eq!(board.get(0, 0), CellState::Undef);
        assert_eq!(board.get(0, 2), CellState::Undef);
    }

    #[test]
    fn test_nothing_pruned_when_fleet_is_done() {
        let clues = Clues::new(
            vec![2],
            vec![None; 7],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ^.?????
            v.?????
            ..?????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(!GapPrune.apply(&clues, &mut board));
    }
}
