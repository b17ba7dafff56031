use crate::{CellState, Grid};

/// One of the four grid rotations.
///
/// Neighbour rules in this engine are written once, in their "north" form,
/// and replayed under each rotation: under [`R90`](Rotation::R90) the rule
/// written for [`North`](CellState::North) applies to
/// [`East`](CellState::East) cells, and so on. A rotation maps *view*
/// coordinates `(i, j)` to real grid coordinates, with the view dimensions
/// swapped for the quarter turns.
///
/// Moving down in the view (`i + 1`) moves along the ship of the
/// associated end state: south for `R0`, west for `R90`, north for
/// `R180`, east for `R270`.
///
/// # Examples
///
/// ```
/// use armada_core::{Position, Rotation};
///
/// // on a 4×6 grid, the view origin of the quarter turn is the
/// // top-right corner of the real grid
/// assert_eq!(Rotation::R90.to_real(4, 6, 0, 0), Position::new(0, 5));
/// assert_eq!(Rotation::R90.view_dims(4, 6), (6, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Identity.
    R0,
    /// Quarter turn; the north rule applies to east ends.
    R90,
    /// Half turn; the north rule applies to south ends.
    R180,
    /// Three-quarter turn; the north rule applies to west ends.
    R270,
}

impl Rotation {
    /// All rotations, identity first.
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// The view dimensions `(height, width)` for a real grid of `h` × `w`.
    #[must_use]
    pub const fn view_dims(self, h: usize, w: usize) -> (usize, usize) {
        match self {
            Self::R0 | Self::R180 => (h, w),
            Self::R90 | Self::R270 => (w, h),
        }
    }

    /// Maps view coordinates to the real position.
    #[must_use]
    pub const fn to_real(self, h: usize, w: usize, i: usize, j: usize) -> crate::Position {
        let (y, x) = match self {
            Self::R0 => (i, j),
            Self::R90 => (j, w - 1 - i),
            Self::R180 => (h - 1 - i, w - 1 - j),
            Self::R270 => (h - 1 - j, i),
        };
        crate::Position::new(y, x)
    }

    /// Maps a real position to its view coordinates.
    #[must_use]
    pub const fn to_view(self, h: usize, w: usize, y: usize, x: usize) -> (usize, usize) {
        match self {
            Self::R0 => (y, x),
            Self::R90 => (w - 1 - x, y),
            Self::R180 => (h - 1 - y, w - 1 - x),
            Self::R270 => (x, h - 1 - y),
        }
    }

    /// The ship-end state whose rule this rotation replays.
    #[must_use]
    pub const fn end_state(self) -> CellState {
        match self {
            Self::R0 => CellState::North,
            Self::R90 => CellState::East,
            Self::R180 => CellState::South,
            Self::R270 => CellState::West,
        }
    }
}

/// A read-only view of a grid under a rotation, with signed
/// bounds-checked access.
#[derive(Debug, Clone, Copy)]
pub struct RotatedGrid<'a, T> {
    grid: &'a Grid<T>,
    rot: Rotation,
}

impl<'a, T: Copy> RotatedGrid<'a, T> {
    /// Wraps a grid in a rotated view.
    #[must_use]
    pub fn new(grid: &'a Grid<T>, rot: Rotation) -> Self {
        Self { grid, rot }
    }

    /// View height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rot.view_dims(self.grid.height(), self.grid.width()).0
    }

    /// View width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rot.view_dims(self.grid.height(), self.grid.width()).1
    }

    /// The cell at signed view coordinates, or `None` outside the grid.
    #[must_use]
    pub fn at(&self, i: isize, j: isize) -> Option<T> {
        let (vh, vw) = self.rot.view_dims(self.grid.height(), self.grid.width());
        if i < 0 || j < 0 || i as usize >= vh || j as usize >= vw {
            return None;
        }
        let pos = self
            .rot
            .to_real(self.grid.height(), self.grid.width(), i as usize, j as usize);
        Some(self.grid[pos])
    }
}

/// A mutable view of a grid under a rotation.
#[derive(Debug)]
pub struct RotatedGridMut<'a, T> {
    grid: &'a mut Grid<T>,
    rot: Rotation,
}

impl<'a, T: Copy> RotatedGridMut<'a, T> {
    /// Wraps a grid in a mutable rotated view.
    #[must_use]
    pub fn new(grid: &'a mut Grid<T>, rot: Rotation) -> Self {
        Self { grid, rot }
    }

    /// View dimensions `(height, width)`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.rot.view_dims(self.grid.height(), self.grid.width())
    }

    /// The cell at signed view coordinates, or `None` outside the grid.
    #[must_use]
    pub fn at(&self, i: isize, j: isize) -> Option<T> {
        RotatedGrid::new(self.grid, self.rot).at(i, j)
    }

    /// Writes the cell at view coordinates. Returns `true` if the value
    /// changed.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the view.
    pub fn set(&mut self, i: usize, j: usize, value: T) -> bool
    where
        T: PartialEq,
    {
        let pos = self
            .rot
            .to_real(self.grid.height(), self.grid.width(), i, j);
        let changed = self.grid[pos] != value;
        self.grid[pos] = value;
        changed
    }
}

impl RotatedGridMut<'_, CellState> {
    /// Promotes the cell at view coordinates to at least `floor`,
    /// following the monotone state order. Returns `true` on change.
    pub fn raise(&mut self, i: usize, j: usize, floor: CellState) -> bool {
        let pos = self
            .rot
            .to_real(self.grid.height(), self.grid.width(), i, j);
        let next = self.grid[pos].promoted(floor);
        let changed = self.grid[pos] != next;
        self.grid[pos] = next;
        changed
    }
}
