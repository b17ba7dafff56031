use serde::{Deserialize, Serialize};

use crate::{Board, CellState, Position};

/// Ship orientation. One-cell ships are always recorded as
/// [`Horizontal`](Orientation::Horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// The ship extends to the right of its anchor cell.
    Horizontal,
    /// The ship extends below its anchor cell.
    Vertical,
}

impl Orientation {
    /// Unit step `(dy, dx)` along the ship.
    #[must_use]
    pub const fn step(self) -> (usize, usize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
        }
    }
}

/// The location of one placed ship: its orientation and the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipPlacement {
    /// Orientation of the ship.
    pub orientation: Orientation,
    /// Row of the top-left cell.
    pub y: usize,
    /// Column of the top-left cell.
    pub x: usize,
}

impl ShipPlacement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(orientation: Orientation, y: usize, x: usize) -> Self {
        Self { orientation, y, x }
    }

    /// The cells covered by a ship of length `len` at this placement,
    /// anchor first.
    pub fn cells(self, len: usize) -> impl Iterator<Item = Position> {
        let (dy, dx) = self.orientation.step();
        (0..len).map(move |k| Position::new(self.y + k * dy, self.x + k * dx))
    }

    /// The typed state of the `k`-th cell of a ship of length `len` at
    /// this placement.
    #[must_use]
    pub fn cell_state(self, len: usize, k: usize) -> CellState {
        debug_assert!(k < len);
        if len == 1 {
            CellState::One
        } else if k == 0 {
            match self.orientation {
                Orientation::Vertical => CellState::North,
                Orientation::Horizontal => CellState::West,
            }
        } else if k == len - 1 {
            match self.orientation {
                Orientation::Vertical => CellState::South,
                Orientation::Horizontal => CellState::East,
            }
        } else {
            CellState::Inner
        }
    }
}

/// A full placement of the fleet, in the same order as the ship lengths.
pub type Solution = Vec<ShipPlacement>;

/// Renders a solution as a fully typed board: every ship cell gets its
/// end/inner/singleton state, every other cell is
/// [`Vacant`](CellState::Vacant).
#[must_use]
pub fn render_solution(
    height: usize,
    width: usize,
    ships: &[u8],
    placements: &[ShipPlacement],
) -> Board {
    debug_assert_eq!(ships.len(), placements.len());
    let mut board = Board::new(height, width, CellState::Vacant);
    for (&len, &placement) in ships.iter().zip(placements) {
        let len = len as usize;
        for (k, pos) in placement.cells(len).enumerate() {
            board[pos] = placement.cell_state(len, k);
        }
    }
    board
}

/// Scans a board for completed ships and tallies them by length.
///
/// A completed ship is a [`North`](CellState::North) cell followed by
/// [`Inner`](CellState::Inner) cells and a terminating
/// [`South`](CellState::South) (or the west/east analogue in a row), or a
/// standalone [`One`](CellState::One). Returns the counts indexed by
/// `length - 1` up to `max_len`, and a flag that is `true` when some
/// `Inner` run is not properly terminated or runs past `max_len`.
///
/// # Examples
///
/// ```
/// use armada_core::{Board, completed_ships};
///
/// let board: Board = "
///     .^...
///     .x...
///     .x...
///     .v...
///     .....
/// "
/// .parse()
/// .unwrap();
/// let (distr, malformed) = completed_ships(&board, 4);
/// assert_eq!(distr, vec![0, 0, 0, 1]);
/// assert!(!malformed);
/// ```
#[must_use]
pub fn completed_ships(board: &Board, max_len: usize) -> (Vec<usize>, bool) {
    use CellState::{East, Inner, North, One, South, West};

    let (h, w) = (board.height(), board.width());
    let mut distr = vec![0usize; max_len];
    let mut malformed = false;

    for y in 0..h {
        for x in 0..w {
            let state = board.get(y, x);
            if y + 1 < h && state == North {
                let mut k = 0;
                loop {
                    k += 1;
                    if !(y + k + 1 < h && board.get(y + k, x) == Inner && k < max_len - 1) {
                        break;
                    }
                }
                if board.get(y + k, x) == South && k < max_len {
                    distr[k] += 1;
                } else if board.get(y + k, x) == Inner || k >= max_len {
                    malformed = true;
                }
            } else if x + 1 < w && state == West {
                let mut k = 0;
                loop {
                    k += 1;
                    if !(x + k + 1 < w && board.get(y, x + k) == Inner && k < max_len - 1) {
                        break;
                    }
                }
                if board.get(y, x + k) == East && k < max_len {
                    distr[k] += 1;
                } else if board.get(y, x + k) == Inner || k >= max_len {
                    malformed = true;
                }
            } else if state == One {
                distr[0] += 1;
            }
        }
    }

    (distr, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unterminated_run_is_malformed() {
        let board: Board = "
            .^...
            .x...
            .x...
            .x...
            .....
        "
        .parse()
        .unwrap();
        let (distr, malformed) = completed_ships(&board, 4);
        assert_eq!(distr, vec![0, 0, 0, 0]);
        assert!(malformed);
    }

    #[test]
    fn test_counts_rows_columns_and_singletons() {
        let board: Board = "
            <x>.o
            .....
            ^...^
            v...x
            ....v
        "
        .parse()
        .unwrap();
        let (distr, malformed) = completed_ships(&board, 3);
        assert!(!malformed);
        // one singleton, one ship of two, one of each of three
        assert_eq!(distr, vec![1, 1, 2]);
    }

    #[test]
    fn test_run_longer_than_max_is_malformed() {
        let board: Board = "
            ^....
            x....
            x....
            v....
            .....
        "
        .parse()
        .unwrap();
        // the ship of four cannot be tallied when only three are expected
        let (distr, malformed) = completed_ships(&board, 3);
        assert_eq!(distr, vec![0, 0, 0]);
        assert!(malformed);
    }

    #[test]
    fn test_placement_cells_and_states() {
        let ship = ShipPlacement::new(Orientation::Vertical, 2, 4);
        let cells: Vec<_> = ship.cells(3).collect();
        assert_eq!(
            cells,
            vec![Position::new(2, 4), Position::new(3, 4), Position::new(4, 4)]
        );
        assert_eq!(ship.cell_state(3, 0), CellState::North);
        assert_eq!(ship.cell_state(3, 1), CellState::Inner);
        assert_eq!(ship.cell_state(3, 2), CellState::South);

        let single = ShipPlacement::new(Orientation::Horizontal, 0, 0);
        assert_eq!(single.cell_state(1, 0), CellState::One);
    }

    #[test]
    fn test_render_solution() {
        let ships = [3, 1];
        let placements = [
            ShipPlacement::new(Orientation::Horizontal, 0, 0),
            ShipPlacement::new(Orientation::Horizontal, 2, 4),
        ];
        let board = render_solution(4, 5, &ships, &placements);
        assert_eq!(
            board.to_string(),
            "<x>..\n.....\n....o\n....."
        );
    }
}
