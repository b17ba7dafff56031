use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted grid dimension.
pub const SIZE_MIN: usize = 7;
/// Largest accepted grid dimension.
pub const SIZE_MAX: usize = 25;

/// Difficulty of a generated puzzle.
///
/// `Basic` and `Intermediate` puzzles fall to the simple deduction rules
/// alone. `Advanced` puzzles additionally need the advanced rules, and
/// `Unreasonable` puzzles defeat the deduction rules entirely and require
/// backtracking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
    Unreasonable,
}

impl Difficulty {
    /// All difficulties in ascending order.
    pub const ALL: [Self; 4] = [
        Self::Basic,
        Self::Intermediate,
        Self::Advanced,
        Self::Unreasonable,
    ];

    /// The wire value (0 to 3) used in parameter strings.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Unreasonable => 3,
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Basic,
            1 => Self::Intermediate,
            2 => Self::Advanced,
            3 => Self::Unreasonable,
            _ => return None,
        })
    }

    /// Whether puzzles at this level may require the advanced deduction
    /// rules.
    #[must_use]
    pub const fn uses_advanced_rules(self) -> bool {
        matches!(self, Self::Advanced | Self::Unreasonable)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Unreasonable => "Unreasonable",
        };
        f.write_str(name)
    }
}

/// Invalid generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The difficulty value was outside 0 to 3.
    #[error("Unknown difficulty rating.")]
    UnknownDifficulty,
    /// A dimension fell outside the accepted range.
    #[error("Height and width must be between {SIZE_MIN} and {SIZE_MAX}.")]
    SizeOutOfRange,
}

/// Host-facing puzzle generation parameters.
///
/// # Examples
///
/// ```
/// use armada_core::{Difficulty, Params};
///
/// let params = Params::new(8, 10, Difficulty::Intermediate);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.to_string(), "8x10d1");
///
/// let bad = Params::new(5, 10, Difficulty::Basic);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Grid height.
    pub height: usize,
    /// Grid width.
    pub width: usize,
    /// Target difficulty.
    pub difficulty: Difficulty,
}

impl Params {
    /// Creates a parameter set. Call [`validate`](Self::validate) before
    /// using it.
    #[must_use]
    pub const fn new(height: usize, width: usize, difficulty: Difficulty) -> Self {
        Self {
            height,
            width,
            difficulty,
        }
    }

    /// Checks the dimensions against the accepted range.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.height < SIZE_MIN
            || self.height > SIZE_MAX
            || self.width < SIZE_MIN
            || self.width > SIZE_MAX
        {
            return Err(ParamsError::SizeOutOfRange);
        }
        Ok(())
    }

    /// Parses a parameter string of the form `8x10` or `8x10d2`. A missing
    /// difficulty suffix keeps the given default.
    #[must_use]
    pub fn parse(s: &str, default_difficulty: Difficulty) -> Option<Self> {
        let (size, diff) = match s.split_once('d') {
            Some((size, diff)) => (size, Some(diff)),
            None => (s, None),
        };
        let (h, w) = size.split_once('x')?;
        let height = h.parse().ok()?;
        let width = w.parse().ok()?;
        let difficulty = match diff {
            Some(d) => Difficulty::from_index(d.parse().ok()?)?,
            None => default_difficulty,
        };
        Some(Self {
            height,
            width,
            difficulty,
        })
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}d{}",
            self.height,
            self.width,
            self.difficulty.index()
        )
    }
}
