use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellState;

/// A cell coordinate: `y` is the row (from the top), `x` the column (from
/// the left). The row comes first, matching the `y..x..` order of the wire
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index from the top.
    pub y: usize,
    /// Column index from the left.
    pub x: usize,
}

impl Position {
    /// Creates a position from row and column indices.
    #[must_use]
    pub const fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }
}

/// Rectangular H×W storage backed by a flat vector.
///
/// # Examples
///
/// ```
/// use armada_core::{Grid, Position};
///
/// let mut grid = Grid::new(3, 5, 0u8);
/// grid[Position::new(1, 4)] = 7;
/// assert_eq!(grid.get(1, 4), 7);
/// assert_eq!(grid.at(-1, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(height: usize, width: usize, fill: T) -> Self {
        assert!(height > 0 && width > 0, "grid dimensions must be positive");
        Self {
            height,
            width,
            cells: vec![fill; height * width],
        }
    }

    /// Resets every cell to `fill`, keeping the dimensions.
    pub fn fill(&mut self, fill: T) {
        self.cells.fill(fill);
    }
}

impl<T> Grid<T> {
    /// Grid height (number of rows).
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid width (number of columns).
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Iterates over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let (h, w) = (self.height, self.width);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(y, x)))
    }

    fn offset(&self, y: usize, x: usize) -> usize {
        debug_assert!(y < self.height && x < self.width);
        y * self.width + x
    }
}

impl<T: Copy> Grid<T> {
    /// Returns the cell at `(y, x)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, y: usize, x: usize) -> T {
        self.cells[self.offset(y, x)]
    }

    /// Writes the cell at `(y, x)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set(&mut self, y: usize, x: usize, value: T) {
        let off = self.offset(y, x);
        self.cells[off] = value;
    }

    /// Returns the cell at signed coordinates, or `None` outside the grid.
    #[must_use]
    pub fn at(&self, y: isize, x: isize) -> Option<T> {
        if y < 0 || x < 0 {
            return None;
        }
        let (y, x) = (y as usize, x as usize);
        (y < self.height && x < self.width).then(|| self.get(y, x))
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        &self.cells[pos.y * self.width + pos.x]
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        &mut self.cells[pos.y * self.width + pos.x]
    }
}

/// A scratch grid of cell states, the working surface of the solvers and
/// the player.
pub type Board = Grid<CellState>;

impl Board {
    /// Creates a board of the given size with every cell
    /// [`Undef`](CellState::Undef).
    #[must_use]
    pub fn undef(height: usize, width: usize) -> Self {
        Self::new(height, width, CellState::Undef)
    }

    /// An additive checksum over the cell codes.
    ///
    /// Solver writes only ever raise a cell's code, so the checksum grows
    /// strictly with every change and equality between two snapshots means
    /// the board did not move.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.cells
            .iter()
            .map(|state| (state.code() + 2) as u32)
            .sum()
    }

    /// Number of cells known to be occupied (including typed cells).
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_occupied()).count()
    }

    /// Number of cells known to be vacant.
    #[must_use]
    pub fn vacant_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::Vacant)
            .count()
    }

    /// Number of occupied cells refined to a typed state.
    #[must_use]
    pub fn typed_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_typed()).count()
    }

    /// Promotes [`Occ`](CellState::Occ) cells to a typed state wherever
    /// the neighbour context determines one. Returns `true` if any cell
    /// changed.
    ///
    /// A cell becomes a ship end when the run continues on exactly one
    /// axis side and is cut off (border or vacant) on the other, a
    /// [`One`](CellState::One) when cut off on all four sides, and an
    /// [`Inner`](CellState::Inner) when flanked by occupied cells along
    /// an axis.
    pub fn classify_occupied(&mut self) -> bool {
        self.refine(None)
    }

    /// Promotes `Occ` cells as [`classify_occupied`](Self::classify_occupied)
    /// and additionally demotes typed cells whose neighbour context no
    /// longer supports the type, except cells pinned to a typed state by
    /// `init`.
    pub fn reclassify(&mut self, init: &Board) {
        self.refine(Some(init));
    }

    fn refine(&mut self, demote_against: Option<&Board>) -> bool {
        use CellState::{East, Inner, North, Occ, One, South, Vacant, West};

        let (h, w) = (self.height as isize, self.width as isize);
        let mut changed = false;

        for y in 0..h {
            for x in 0..w {
                let state = self.get(y as usize, x as usize);
                // treat the border as vacant on the cut-off side
                let cut = |s: Option<CellState>| s.is_none_or(|s| s == Vacant);
                let occ = |s: Option<CellState>| s.is_some_and(CellState::is_occupied);
                let up = self.at(y - 1, x);
                let down = self.at(y + 1, x);
                let left = self.at(y, x - 1);
                let right = self.at(y, x + 1);

                if state == Occ {
                    let promoted = if cut(up) && occ(down) {
                        Some(North)
                    } else if cut(down) && occ(up) {
                        Some(South)
                    } else if cut(left) && occ(right) {
                        Some(West)
                    } else if cut(right) && occ(left) {
                        Some(East)
                    } else if cut(up) && cut(down) && cut(left) && cut(right) {
                        Some(One)
                    } else if (occ(up) && occ(down)) || (occ(left) && occ(right)) {
                        Some(Inner)
                    } else {
                        None
                    };
                    if let Some(next) = promoted {
                        self.set(y as usize, x as usize, next);
                        changed = true;
                    }
                } else if let Some(init) = demote_against {
                    if !state.is_typed() || init.get(y as usize, x as usize).is_typed() {
                        continue;
                    }
                    let lost = match state {
                        North => !cut(up) || !occ(down),
                        South => !cut(down) || !occ(up),
                        West => !cut(left) || !occ(right),
                        East => !cut(right) || !occ(left),
                        One => !(cut(up) && cut(down) && cut(left) && cut(right)),
                        Inner => !((occ(up) && occ(down)) || (occ(left) && occ(right))),
                        _ => false,
                    };
                    if lost {
                        self.set(y as usize, x as usize, Occ);
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}

/// Failure to parse a glyph grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    /// The input contained no rows.
    #[error("empty grid")]
    Empty,
    /// A character was not one of the cell glyphs.
    #[error("unknown cell glyph {0:?}")]
    UnknownGlyph(char),
    /// Row {0} had a different width than the first row.
    #[error("row {0} has inconsistent width")]
    RaggedRow(usize),
}

impl FromStr for Board {
    type Err = GridParseError;

    /// Parses a whitespace-separated grid of cell glyphs:
    /// `?` undefined, `.` vacant, `#` occupied, `^ > v <` ship ends,
    /// `o` one-cell ship, `x` inner cell.
    ///
    /// ```
    /// use armada_core::{Board, CellState};
    ///
    /// let board: Board = "
    ///     ?.?
    ///     ?o?
    ///     ?.?
    /// "
    /// .parse()
    /// .unwrap();
    /// assert_eq!(board.get(1, 1), CellState::One);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.split_whitespace().collect();
        let first = rows.first().ok_or(GridParseError::Empty)?;
        let width = first.chars().count();
        let mut cells = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GridParseError::RaggedRow(i));
            }
            for c in row.chars() {
                cells.push(CellState::from_glyph(c).ok_or(GridParseError::UnknownGlyph(c))?);
            }
        }
        Ok(Self {
            height: rows.len(),
            width,
            cells,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.get(y, x).glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_round_trip() {
        let text = "?.#\n^>v\n<ox";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.height(), 3);
        assert_eq!(board.width(), 3);
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_bad_glyph_and_ragged_rows() {
        assert_eq!(
            "?!?".parse::<Board>(),
            Err(GridParseError::UnknownGlyph('!'))
        );
        assert_eq!(
            "??? ??".parse::<Board>(),
            Err(GridParseError::RaggedRow(1))
        );
        assert_eq!("  ".parse::<Board>(), Err(GridParseError::Empty));
    }

    #[test]
    fn test_signed_access() {
        let board = Board::undef(2, 2);
        assert_eq!(board.at(0, 0), Some(CellState::Undef));
        assert_eq!(board.at(-1, 0), None);
        assert_eq!(board.at(0, 2), None);
        assert_eq!(board.at(2, 1), None);
    }

    #[test]
    fn test_checksum_tracks_writes() {
        let mut board = Board::undef(3, 3);
        let base = board.checksum();
        board.set(1, 1, CellState::Occ);
        assert_eq!(board.checksum(), base + 2);
        board.set(1, 1, CellState::Inner);
        assert_eq!(board.checksum(), base + 8);
    }

    #[test]
    fn test_classify_promotes_column_run() {
        let mut board: Board = "
            .#.
            .#.
            .#.
        "
        .parse()
        .unwrap();
        assert!(board.classify_occupied());
        assert_eq!(board.get(0, 1), CellState::North);
        assert_eq!(board.get(1, 1), CellState::Inner);
        assert_eq!(board.get(2, 1), CellState::South);
    }

    #[test]
    fn test_classify_promotes_singleton_and_row_ends() {
        let mut board: Board = "
            #..#.
            ...#.
        "
        .parse()
        .unwrap();
        board.classify_occupied();
        // isolated cell becomes a one-cell ship
        assert_eq!(board.get(0, 0), CellState::One);
        // a vertical pair becomes its two ends
        assert_eq!(board.get(0, 3), CellState::North);
        assert_eq!(board.get(1, 3), CellState::South);
    }

    #[test]
    fn test_classify_leaves_ambiguous_cells() {
        // the middle cell of ##? could be an east end or an inner cell
        let mut board: Board = "?##?".parse().unwrap();
        board.classify_occupied();
        assert_eq!(board.get(0, 2), CellState::Occ);
    }

    #[test]
    fn test_reclassify_demotes_when_context_changes() {
        let init = Board::undef(1, 4);
        // a lone west end with nothing to its east loses its type
        let mut board: Board = "<???".parse().unwrap();
        board.reclassify(&init);
        assert_eq!(board.get(0, 0), CellState::Occ);

        // but a west end pinned by the clues keeps it
        let pinned: Board = "<???".parse().unwrap();
        let mut board: Board = "<???".parse().unwrap();
        board.reclassify(&pinned);
        assert_eq!(board.get(0, 0), CellState::West);
    }
}
