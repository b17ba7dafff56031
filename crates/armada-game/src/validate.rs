//! Structural validation of a play board.
//!
//! The checks do not compare against the hidden solution; they flag
//! states that cannot be part of any solution: occupied cells touching
//! diagonally, symbols inconsistent with their neighbours, exceeded line
//! totals, and more completed ships of a length than the fleet owns. The
//! per-symbol neighbour rules are written once in their "north" form and
//! replayed under the four rotations.

use armada_core::{Board, CellState, Clues, Grid, RotatedGrid, Rotation, completed_ships};

/// The validation flags attached to a play state, consumed by the
/// frontend for error highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Cells inconsistent with a neighbour.
    pub cell_errors: Grid<bool>,
    /// Rows whose visible total is exceeded, by ships or by vacancy.
    pub row_errors: Vec<bool>,
    /// Columns whose visible total is exceeded.
    pub col_errors: Vec<bool>,
    /// More completed ships of some length than the fleet owns, or a
    /// malformed ship.
    pub ships_error: bool,
    /// Per ship, whether a completed ship of its length is on the board.
    pub ships_done: Vec<bool>,
    /// All invariants hold and the fleet is complete.
    pub solved: bool,
}

/// Checks a board against the structural invariants of the puzzle.
///
/// # Examples
///
/// ```
/// use armada_core::{Board, Clues};
/// use armada_game::validate;
///
/// let clues = Clues::new(
///     vec![1],
///     vec![Some(1), Some(0), Some(0)],
///     vec![Some(1), Some(0), Some(0)],
///     Board::undef(3, 3),
/// );
/// let board: Board = "
///     o..
///     ...
///     ...
/// "
/// .parse()
/// .unwrap();
/// assert!(validate(&clues, &board).solved);
/// ```
#[must_use]
pub fn validate(clues: &Clues, board: &Board) -> Validation {
    use CellState::{Inner, Occ, One, Vacant};

    let (h, w) = (clues.height(), clues.width());
    let mut result = Validation {
        cell_errors: Grid::new(h, w, false),
        row_errors: vec![false; h],
        col_errors: vec![false; w],
        ships_error: false,
        ships_done: vec![false; clues.ships().len()],
        solved: true,
    };

    let occupied = |s: Option<CellState>| s.is_some_and(CellState::is_occupied);

    for y in 0..h {
        for x in 0..w {
            let mut bad = false;
            let state = board.get(y, x);
            let (sy, sx) = (y as isize, x as isize);

            // no two occupied cells may touch diagonally
            if state.is_occupied() {
                for (dy, dx) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                    if occupied(board.at(sy + dy, sx + dx)) {
                        bad = true;
                    }
                }
            }

            for rot in Rotation::ALL {
                let view = RotatedGrid::new(board, rot);
                let (i, j) = rot.to_view(h, w, y, x);
                let (i, j) = (i as isize, j as isize);
                let end = rot.end_state();

                bad |= match view.at(i, j).unwrap() {
                    Vacant => vacant_conflict(&view, i, j, end),
                    Occ => occ_conflict(&view, i, j, end),
                    Inner => inner_conflict(&view, i, j, end),
                    s if s == end => end_conflict(&view, i, j, end),
                    _ => false,
                };
            }

            // a singleton tolerates no occupied orthogonal neighbour
            if state == One {
                for (dy, dx) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                    if occupied(board.at(sy + dy, sx + dx)) {
                        bad = true;
                    }
                }
            }

            if bad {
                result.cell_errors.set(y, x, true);
                result.solved = false;
            }
        }
    }

    // line totals: ships may not exceed a visible total, and vacant
    // cells may not exceed what the total leaves free
    for (y, &total) in clues.rows().iter().enumerate() {
        let Some(total) = total else { continue };
        let ships = (0..w).filter(|&x| board.get(y, x).is_occupied()).count();
        let vacant = (0..w)
            .filter(|&x| board.get(y, x) == CellState::Vacant)
            .count();
        if ships > total as usize || vacant > w - total as usize {
            result.row_errors[y] = true;
        }
        if ships != total as usize {
            result.solved = false;
        }
    }
    for (x, &total) in clues.cols().iter().enumerate() {
        let Some(total) = total else { continue };
        let ships = (0..h).filter(|&y| board.get(y, x).is_occupied()).count();
        let vacant = (0..h)
            .filter(|&y| board.get(y, x) == CellState::Vacant)
            .count();
        if ships > total as usize || vacant > h - total as usize {
            result.col_errors[x] = true;
        }
        if ships != total as usize {
            result.solved = false;
        }
    }

    // the completed ships may not exceed the fleet in any length
    let (mut distr, malformed) = completed_ships(board, clues.longest_ship());
    result.ships_error = malformed
        || distr
            .iter()
            .zip(clues.distribution())
            .any(|(&have, &want)| have > want);
    if result.ships_error {
        result.solved = false;
    } else {
        for (i, &len) in clues.ships().iter().enumerate() {
            if distr[len as usize - 1] > 0 {
                result.ships_done[i] = true;
                distr[len as usize - 1] -= 1;
            } else {
                result.solved = false;
            }
        }
    }

    // a finished board carries exactly the fleet, every cell typed
    if result.solved && board.typed_count() != clues.ships_sum() {
        result.solved = false;
    }

    result
}

/// A vacant cell conflicts when the cell above it demands occupancy: a
/// ship end pointing into it, or an inner cell whose vertical run is
/// already implied. On the top row, an inner cell beside it implies the
/// same horizontally.
fn vacant_conflict(
    view: &RotatedGrid<'_, CellState>,
    i: isize,
    j: isize,
    end: CellState,
) -> bool {
    use CellState::{Inner, Vacant};

    let above = view.at(i - 1, j);
    if above == Some(end) {
        return true;
    }
    if above == Some(Inner)
        && (view.at(i - 2, j).is_some_and(CellState::is_occupied)
            || view.at(i - 1, j - 1) == Some(Vacant)
            || view.at(i - 1, j + 1) == Some(Vacant))
    {
        return true;
    }
    i == 0 && (view.at(i, j - 1) == Some(Inner) || view.at(i, j + 1) == Some(Inner))
}

/// A plain occupied cell conflicts with a ship end above it that does
/// not point at it, and with a singleton above it.
fn occ_conflict(
    view: &RotatedGrid<'_, CellState>,
    i: isize,
    j: isize,
    end: CellState,
) -> bool {
    use CellState::{Inner, Occ, Undef, Vacant};

    match view.at(i - 1, j) {
        Some(above) => !(above == end || matches!(above, Undef | Vacant | Occ | Inner)),
        None => false,
    }
}

/// A ship end conflicts when anything occupies the side it points to,
/// when its flanks are occupied, when the cell behind it cannot continue
/// the ship, or when it sits against the border it extends towards.
fn end_conflict(
    view: &RotatedGrid<'_, CellState>,
    i: isize,
    j: isize,
    end: CellState,
) -> bool {
    use CellState::{Inner, Occ, Undef};

    let vh = view.height();
    if view.at(i - 1, j).is_some_and(CellState::is_occupied) {
        return true;
    }
    if let Some(below) = view.at(i + 1, j) {
        if !(below == end.opposite_end() || matches!(below, Undef | Occ | Inner)) {
            return true;
        }
    }
    if view.at(i, j - 1).is_some_and(CellState::is_occupied)
        || view.at(i, j + 1).is_some_and(CellState::is_occupied)
    {
        return true;
    }
    i == vh as isize - 1
}

/// An inner cell conflicts when the cell above it is a foreign end or a
/// singleton, when it hugs the top border without room sideways, or when
/// its vertical context is half vacant and half occupied.
fn inner_conflict(
    view: &RotatedGrid<'_, CellState>,
    i: isize,
    j: isize,
    end: CellState,
) -> bool {
    use CellState::{Inner, Occ, Undef, Vacant};

    let vw = view.width();
    if let Some(above) = view.at(i - 1, j) {
        if !(above == end || matches!(above, Undef | Vacant | Occ | Inner)) {
            return true;
        }
    }
    if i == 0
        && (view.at(i + 1, j).is_some_and(CellState::is_occupied)
            || view.at(i, j - 1) == Some(Vacant)
            || view.at(i, j + 1) == Some(Vacant)
            || j == 0
            || j == vw as isize - 1)
    {
        return true;
    }
    if view.at(i - 1, j) == Some(Vacant) && view.at(i, j - 1) == Some(Vacant) {
        return true;
    }
    if let (Some(above), Some(below)) = (view.at(i - 1, j), view.at(i + 1, j)) {
        if (above == Vacant && below.is_occupied()) || (above.is_occupied() && below == Vacant) {
            return true;
        }
    }
    false
}
