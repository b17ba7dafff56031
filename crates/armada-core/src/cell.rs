use serde::{Deserialize, Serialize};

/// Classification of a single grid cell.
///
/// Cells progress from [`Undef`](CellState::Undef) (nothing known) through
/// [`Occ`](CellState::Occ) (known occupied, shape unknown) to one of the six
/// typed states describing which part of a ship the cell is. The typed
/// end states are named for the direction the ship end points *away* from
/// the rest of the ship: a `North` cell is the top end of a vertical ship,
/// which extends southwards below it.
///
/// Every state has a stable integer code used by the puzzle description and
/// move grammars (`z` payloads) and by the promotion order: codes never
/// decrease under solver writes, so an additive checksum over a board
/// detects any change.
///
/// # Examples
///
/// ```
/// use armada_core::CellState;
///
/// assert_eq!(CellState::Vacant.code(), -1);
/// assert_eq!(CellState::from_code(6), Some(CellState::Inner));
/// assert!(CellState::North.is_occupied());
/// assert!(!CellState::Occ.is_typed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Not disclosed and not yet determined.
    Undef,
    /// Known to hold no ship.
    Vacant,
    /// Known occupied; the specific ship part is not yet determined.
    Occ,
    /// Upper end of a vertical ship.
    North,
    /// Right end of a horizontal ship.
    East,
    /// Lower end of a vertical ship.
    South,
    /// Left end of a horizontal ship.
    West,
    /// A complete one-cell ship.
    One,
    /// Interior cell of a ship of length three or more.
    Inner,
}

impl CellState {
    /// All six typed occupied states in code order.
    pub const TYPED: [Self; 6] = [
        Self::North,
        Self::East,
        Self::South,
        Self::West,
        Self::One,
        Self::Inner,
    ];

    /// Returns the wire code of this state (`-2` to `6`).
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Undef => -2,
            Self::Vacant => -1,
            Self::Occ => 0,
            Self::North => 1,
            Self::East => 2,
            Self::South => 3,
            Self::West => 4,
            Self::One => 5,
            Self::Inner => 6,
        }
    }

    /// Parses a wire code back into a state.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        Some(match code {
            -2 => Self::Undef,
            -1 => Self::Vacant,
            0 => Self::Occ,
            1 => Self::North,
            2 => Self::East,
            3 => Self::South,
            4 => Self::West,
            5 => Self::One,
            6 => Self::Inner,
            _ => return None,
        })
    }

    /// Returns `true` if the cell is known to hold a ship part (code ≥ 0).
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        self.code() >= 0
    }

    /// Returns `true` if the cell is occupied with a determined part
    /// (code > 0).
    #[must_use]
    pub const fn is_typed(self) -> bool {
        self.code() > 0
    }

    /// Returns `true` for the four directional ship ends.
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, Self::North | Self::East | Self::South | Self::West)
    }

    /// Promotes this state to `other` when `other` carries more
    /// information, following the code order. Never demotes.
    #[must_use]
    pub fn promoted(self, other: Self) -> Self {
        if other.code() > self.code() { other } else { self }
    }

    /// The end state facing this one across a ship, e.g. `North` pairs
    /// with `South`.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not one of the four end states.
    #[must_use]
    pub fn opposite_end(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            _ => panic!("opposite_end on non-end state {self:?}"),
        }
    }

    /// The glyph used by the text codec (`?`, `.`, `#`, `^`, `>`, `v`,
    /// `<`, `o`, `x`).
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Undef => '?',
            Self::Vacant => '.',
            Self::Occ => '#',
            Self::North => '^',
            Self::East => '>',
            Self::South => 'v',
            Self::West => '<',
            Self::One => 'o',
            Self::Inner => 'x',
        }
    }

    /// Parses a codec glyph.
    #[must_use]
    pub const fn from_glyph(c: char) -> Option<Self> {
        Some(match c {
            '?' => Self::Undef,
            '.' => Self::Vacant,
            '#' => Self::Occ,
            '^' => Self::North,
            '>' => Self::East,
            'v' => Self::South,
            '<' => Self::West,
            'o' => Self::One,
            'x' => Self::Inner,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in -2..=6 {
            let state = CellState::from_code(code).unwrap();
            assert_eq!(state.code(), code);
        }
        assert_eq!(CellState::from_code(7), None);
        assert_eq!(CellState::from_code(-3), None);
    }

    #[test]
    fn test_glyphs_round_trip() {
        for code in -2..=6 {
            let state = CellState::from_code(code).unwrap();
            assert_eq!(CellState::from_glyph(state.glyph()), Some(state));
        }
        assert_eq!(CellState::from_glyph('!'), None);
    }

    #[test]
    fn test_promotion_is_monotone() {
        assert_eq!(CellState::Occ.promoted(CellState::North), CellState::North);
        assert_eq!(CellState::North.promoted(CellState::Occ), CellState::North);
        assert_eq!(CellState::Vacant.promoted(CellState::Occ), CellState::Occ);
        assert_eq!(CellState::Undef.promoted(CellState::Undef), CellState::Undef);
    }

    #[test]
    fn test_opposite_ends() {
        assert_eq!(CellState::North.opposite_end(), CellState::South);
        assert_eq!(CellState::South.opposite_end(), CellState::North);
        assert_eq!(CellState::East.opposite_end(), CellState::West);
        assert_eq!(CellState::West.opposite_end(), CellState::East);
    }

    #[test]
    fn test_occupancy_predicates() {
        assert!(!CellState::Undef.is_occupied());
        assert!(!CellState::Vacant.is_occupied());
        assert!(CellState::Occ.is_occupied());
        assert!(!CellState::Occ.is_typed());
        for state in CellState::TYPED {
            assert!(state.is_occupied());
            assert!(state.is_typed());
        }
        assert!(!CellState::One.is_end());
        assert!(!CellState::Inner.is_end());
        assert!(CellState::West.is_end());
    }
}
