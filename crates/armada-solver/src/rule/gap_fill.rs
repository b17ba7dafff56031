use armada_core::{Board, CellState, Clues};

use crate::rule::{Rule, Unfinished};

/// The counted-gap fill.
///
/// A gap is a maximal run of not-known-vacant cells in a row or column
/// whose total (or, for hidden lines, the shared hidden budget) still
/// admits the longest unfinished ship. Each gap of length `g` holds at
/// most `(g + 1) / (L + 1)` ships of length `L`. When the sum of these
/// bounds over all gaps equals the number of missing longest ships, every
/// gap is packed as tightly as a nonogram line, and the overlap cells
/// common to all packings are occupied.
///
/// Skipped when the longest unfinished ship has length one. Runs on the
/// cell types as promoted by the preceding rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct GapFill;

#[derive(Debug, Clone, Copy)]
struct Gap {
    vertical: bool,
    y: usize,
    x: usize,
    len: usize,
}

impl Rule for GapFill {
    fn name(&self) -> &'static str {
        "gap fill"
    }

    fn apply(&self, clues: &Clues, board: &mut Board) -> bool {
        let unfinished = Unfinished::scan(clues, board);
        let longest = unfinished.longest();
        if longest <= 1 {
            return false;
        }
        let want = unfinished.longest_count();
        let (h, w) = (board.height(), board.width());

        let mut gaps: Vec<Gap> = Vec::with_capacity(want);
        let mut fitting = 0usize;

        // rows whose total still admits the longest ship
        for y in 0..h {
            let admits = match clues.rows()[y] {
                Some(total) => total as usize >= longest,
                None => clues.hidden_rows_budget() >= longest,
            };
            if !admits {
                continue;
            }
            let mut x = 0;
            while x < w {
                if board.get(y, x) == CellState::Undef {
                    let mut k = 1;
                    while x >= k && board.get(y, x - k) != CellState::Vacant {
                        k += 1;
                    }
                    let mut gap = k;
                    k = 1;
                    while x + k < w && board.get(y, x + k) != CellState::Vacant {
                        k += 1;
                    }
                    gap += k - 1;
                    if gap >= longest && gaps.len() < want {
                        gaps.push(Gap {
                            vertical: false,
                            y,
                            x: x + k - gap,
                            len: gap,
                        });
                    }
                    fitting += (gap + 1) / (longest + 1);
                    x += k - 1;
                }
                x += 1;
            }
        }

        // columns
        for x in 0..w {
            let admits = match clues.cols()[x] {
                Some(total) => total as usize >= longest,
                None => clues.hidden_cols_budget() >= longest,
            };
            if !admits {
                continue;
            }
            let mut y = 0;
            while y < h {
                if board.get(y, x) == CellState::Undef {
                    let mut k = 1;
                    while y >= k && board.get(y - k, x) != CellState::Vacant {
                        k += 1;
                    }
                    let mut gap = k;
                    k = 1;
                    while y + k < h && board.get(y + k, x) != CellState::Vacant {
                        k += 1;
                    }
                    gap += k - 1;
                    if gap >= longest && gaps.len() < want {
                        gaps.push(Gap {
                            vertical: true,
                            y: y + k - gap,
                            x,
                            len: gap,
                        });
                    }
                    fitting += (gap + 1) / (longest + 1);
                    y += k - 1;
                }
                y += 1;
            }
        }

        if fitting != want {
            return false;
        }

        // pack every gap like a nonogram line and keep the overlap
        let mut changed = false;
        for gap in gaps {
            let slack = (gap.len + 1) % (longest + 1);
            let ships_here = (gap.len + 1) / (longest + 1);
            for s in 0..ships_here {
                for l in 0..longest {
                    if l < slack {
                        continue;
                    }
                    let off = s * (longest + 1) + l;
                    let (y, x) = if gap.vertical {
                        (gap.y + off, gap.x)
                    } else {
                        (gap.y, gap.x + off)
                    };
                    if board.get(y, x) == CellState::Undef {
                        board.set(y, x, CellState::Occ);
                        changed = true;
                    }
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
    fn test_exact_gap_is_filled() {
        // a single missing three-ship and a single admitting gap of
        // exactly three cells: the whole gap is forced
        let clues = Clues::new(
            vec![3],
            vec![Some(3), Some(0), Some(0), Some(0), Some(0), Some(0), Some(0)],
            vec![
                Some(0),
                Some(0),
                Some(0),
                Some(1),
                Some(1),
                Some(1),
                Some(0),
            ],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            .?.???.
            ???????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        // no column total admits a three-ship, and in row 0 only the gap
        // at columns 3..5 does
        assert!(GapFill.apply(&clues, &mut board));
        assert_eq!(board.get(0, 3), CellState::Occ);
        assert_eq!(board.get(0, 4), CellState::Occ);
        assert_eq!(board.get(0, 5), CellState::Occ);
        assert_eq!(board.get(0, 1), CellState::Undef);
    }

    #[test]
    fn test_overlap_only_in_loose_gap() {
        // one missing three-ship in a four-cell gap: only the two middle
        // cells are common to both packings
        let clues = Clues::new(
            vec![3],
            vec![Some(3), Some(0), Some(0), Some(0), Some(0), Some(0), Some(0)],
            vec![
                Some(0),
                Some(0),
                Some(1),
                Some(1),
                Some(1),
                Some(0),
                Some(0),
            ],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            .????..
            ???????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(GapFill.apply(&clues, &mut board));
        assert_eq!(board.get(0, 1), CellState::Undef);
        assert_eq!(board.get(0, 2), CellState::Occ);
        assert_eq!(board.get(0, 3), CellState::Occ);
        assert_eq!(board.get(0, 4), CellState::Undef);
    }

    #[test]
    fn test_no_fill_when_gaps_outnumber_ships() {
        // two gaps admit the single missing ship: ambiguous, no fill
        let clues = Clues::new(
            vec![3],
            vec![Some(3), Some(0), Some(0), Some(0), Some(0), Some(0), Some(0)],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board: Board = "
            ???.???
            ???????
            ???????
            ???????
            ???????
            ???????
            ???????
        "
        .parse()
        .unwrap();
        assert!(!GapFill.apply(&clues, &mut board));
    }

    #[test]
    fn test_skipped_for_unit_ships() {
        let clues = Clues::new(
            vec![1, 1],
            vec![Some(2), Some(0), Some(0), Some(0), Some(0), Some(0), Some(0)],
            vec![None; 7],
            Board::undef(7, 7),
        );
        let mut board = Board::undef(7, 7);
        assert!(!GapFill.apply(&clues, &mut board));
    }
}
