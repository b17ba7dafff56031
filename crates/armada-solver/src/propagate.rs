//! One-shot enrichment of a board from the information its cells already
//! carry.
//!
//! Every typed cell implies the state of some of its neighbours: a ship
//! end blocks all neighbours except the cell behind it, a singleton blocks
//! all eight, an inner cell blocks its diagonals and, once one of its two
//! axes is decided, the perpendicular neighbours too. Plain occupied cells
//! block their diagonals.
//!
//! The directional and inner rules are written once in their "north" form
//! and replayed under the four [`Rotation`]s. Vacant writes are
//! unconditional; occupied writes only ever promote, so a cell is never
//! demoted here. Contradictory clues are not detected at this level: they
//! surface later as failed row/column or neighbour checks in the callers.

use armada_core::{Board, CellState, RotatedGridMut, Rotation};

/// Applies the neighbour implications of every cell once. Returns `true`
/// if any cell changed.
///
/// # Examples
///
/// ```
/// use armada_core::{Board, CellState};
/// use armada_solver::propagate::propagate;
///
/// let mut board: Board = "
///     ???
///     ?^?
///     ???
/// "
/// .parse()
/// .unwrap();
/// propagate(&mut board);
/// // everything around the north end is vacant except the cell below it
/// assert_eq!(board.get(0, 0), CellState::Vacant);
/// assert_eq!(board.get(1, 0), CellState::Vacant);
/// assert_eq!(board.get(2, 1), CellState::Occ);
/// ```
pub fn propagate(board: &mut Board) -> bool {
    use CellState::{Occ, One, Vacant};

    let (h, w) = (board.height(), board.width());
    let mut changed = false;

    for y in 0..h {
        for x in 0..w {
            for rot in Rotation::ALL {
                let (i, j) = rot.to_view(h, w, y, x);
                let mut view = RotatedGridMut::new(board, rot);
                if view.at(i as isize, j as isize) == Some(rot.end_state()) {
                    changed |= spread_end(&mut view, i, j);
                }
            }

            if board.get(y, x) == One {
                let mut view = RotatedGridMut::new(board, Rotation::R0);
                changed |= clear_ring(&mut view, y, x);
            }

            for rot in Rotation::ALL {
                let (i, j) = rot.to_view(h, w, y, x);
                let mut view = RotatedGridMut::new(board, rot);
                if view.at(i as isize, j as isize) == Some(CellState::Inner) {
                    changed |= spread_inner(&mut view, i, j);
                }
            }
        }
    }

    // plain occupied cells block their diagonals; a separate pass because
    // the rules above can create new occupied cells
    for y in 0..h {
        for x in 0..w {
            if board.get(y, x) != Occ {
                continue;
            }
            let mut view = RotatedGridMut::new(board, Rotation::R0);
            for (dy, dx) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                let (i, j) = (y as isize + dy, x as isize + dx);
                if view.at(i, j).is_some() {
                    changed |= view.set(i as usize, j as usize, Vacant);
                }
            }
        }
    }

    changed
}

/// A ship end at view `(i, j)`: all eight neighbours are vacant except the
/// cell below it in the view, which is occupied.
fn spread_end(view: &mut RotatedGridMut<'_, CellState>, i: usize, j: usize) -> bool {
    use CellState::{Occ, Vacant};

    let (vh, vw) = view.dims();
    let mut changed = false;
    if i > 0 {
        if j > 0 {
            changed |= view.set(i - 1, j - 1, Vacant);
        }
        changed |= view.set(i - 1, j, Vacant);
        if j + 1 < vw {
            changed |= view.set(i - 1, j + 1, Vacant);
        }
    }
    if j > 0 {
        changed |= view.set(i, j - 1, Vacant);
    }
    if j + 1 < vw {
        changed |= view.set(i, j + 1, Vacant);
    }
    if i + 1 < vh {
        if j > 0 {
            changed |= view.set(i + 1, j - 1, Vacant);
        }
        changed |= view.raise(i + 1, j, Occ);
        if j + 1 < vw {
            changed |= view.set(i + 1, j + 1, Vacant);
        }
    }
    changed
}

/// A singleton: all eight neighbours are vacant.
fn clear_ring(view: &mut RotatedGridMut<'_, CellState>, y: usize, x: usize) -> bool {
    let mut changed = false;
    for dy in -1..=1isize {
        for dx in -1..=1isize {
            if dy == 0 && dx == 0 {
                continue;
            }
            let (i, j) = (y as isize + dy, x as isize + dx);
            if view.at(i, j).is_some() {
                changed |= view.set(i as usize, j as usize, CellState::Vacant);
            }
        }
    }
    changed
}

/// An inner cell at view `(i, j)`: the up-left diagonal is vacant; when
/// the left neighbour is known occupied (or the border or a vacant cell
/// settles that the ship runs horizontally), the vertical neighbours are
/// forced accordingly.
fn spread_inner(view: &mut RotatedGridMut<'_, CellState>, i: usize, j: usize) -> bool {
    use CellState::{Occ, Vacant};

    let (vh, _) = view.dims();
    let mut changed = false;
    let (si, sj) = (i as isize, j as isize);

    if i > 0 && j > 0 {
        changed |= view.set(i - 1, j - 1, Vacant);
    }
    let left = view.at(si, sj - 1);
    if left.is_some_and(CellState::is_occupied) {
        // the ship runs horizontally, so nothing sits above or below
        if i > 0 {
            changed |= view.set(i - 1, j, Vacant);
        }
        if i + 1 < vh {
            changed |= view.set(i + 1, j, Vacant);
        }
    } else if left.is_none_or(|s| s == Vacant) {
        // cut off on the left, so the ship runs vertically through here
        if i > 0 {
            changed |= view.raise(i - 1, j, Occ);
        }
        if i + 1 < vh {
            changed |= view.raise(i + 1, j, Occ);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> Board {
        let mut board: Board = input.parse().unwrap();
        propagate(&mut board);
        board
    }

    #[test]
    fn test_north_end_implications() {
        let board = run("
            ?????
            ?????
            ???^?
            ?????
            ?????
        ");
        assert_eq!(
            board.to_string(),
            "?????\n??...\n??.^.\n??.#.\n??.?."
        );
    }

    #[test]
    fn test_each_end_direction() {
        for (glyph, expected) in [
            ('^', "...\n.^.\n.#."),
            ('v', ".#.\n.v.\n..."),
            ('<', "...\n.<#\n..."),
            ('>', "...\n#>.\n..."),
        ] {
            let mut board: Board = format!("???\n?{glyph}?\n???").parse().unwrap();
            propagate(&mut board);
            assert_eq!(board.to_string(), expected, "direction {glyph}");
        }
    }

    #[test]
    fn test_singleton_clears_ring() {
        let board = run("
            ???
            ?o?
            ???
        ");
        assert_eq!(board.to_string(), "...\n.o.\n...");
    }

    #[test]
    fn test_inner_with_decided_axis() {
        // the vacant cell left of the inner cell decides a vertical ship
        let board = run("?????  ?.x??  ?????");
        assert_eq!(board.get(0, 2), CellState::Occ);
        assert_eq!(board.get(2, 2), CellState::Occ);
        // diagonals of the inner cell are vacant
        assert_eq!(board.get(0, 1), CellState::Vacant);
        assert_eq!(board.get(0, 3), CellState::Vacant);
        assert_eq!(board.get(2, 1), CellState::Vacant);
        assert_eq!(board.get(2, 3), CellState::Vacant);
    }

    #[test]
    fn test_inner_with_occupied_axis() {
        // an occupied cell left of the inner cell decides a horizontal ship
        let board = run("?????  ?#x??  ?????");
        assert_eq!(board.get(0, 2), CellState::Vacant);
        assert_eq!(board.get(2, 2), CellState::Vacant);
        // and the cell on the far side is forced occupied
        assert_eq!(board.get(1, 3), CellState::Occ);
    }

    #[test]
    fn test_inner_near_border() {
        // an inner cell on the left edge must belong to a vertical ship
        let board = run("???  x??  ???");
        assert_eq!(board.get(0, 0), CellState::Occ);
        assert_eq!(board.get(2, 0), CellState::Occ);
        assert_eq!(board.get(0, 1), CellState::Vacant);
        assert_eq!(board.get(2, 1), CellState::Vacant);
    }

    #[test]
    fn test_occupied_blocks_diagonals() {
        let board = run("
            ???
            ?#?
            ???
        ");
        assert_eq!(board.to_string(), ".?.\n?#?\n.?.");
    }

    #[test]
    fn test_idempotent() {
        let mut board: Board = "
            ??????
            ?^????
            ??????
            ??????
            ????x?
            o?????
        "
        .parse()
        .unwrap();
        propagate(&mut board);
        let once = board.clone();
        let changed = propagate(&mut board);
        assert!(!changed);
        assert_eq!(board, once);
    }
}
