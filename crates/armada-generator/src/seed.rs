use std::{fmt, str::FromStr};

use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// A 32-byte seed pinning a whole puzzle generation.
///
/// Seeds render as 64 hexadecimal digits and round-trip through
/// [`FromStr`], so a puzzle can be regenerated from its printed seed.
///
/// # Examples
///
/// ```
/// use armada_generator::PuzzleSeed;
///
/// let seed: PuzzleSeed =
///     "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1"
///         .parse()
///         .unwrap();
/// assert_eq!(
///     seed.to_string(),
///     "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleSeed([u8; 32]);

impl PuzzleSeed {
    /// Wraps raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the thread RNG.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// The raw seed bytes.
    #[must_use]
    pub const fn bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The deterministic random stream for this seed.
    #[must_use]
    pub(crate) fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(self.0)
    }
}

/// Failure to parse a seed string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSeedError {
    /// The string was not exactly 64 characters long.
    #[error("seed must be 64 hex digits, got {0} characters")]
    BadLength(usize),
    /// A character was not a hexadecimal digit.
    #[error("invalid hex digit {0:?} in seed")]
    BadDigit(char),
}

impl FromStr for PuzzleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 64 {
            return Err(ParseSeedError::BadLength(chars.len()));
        }
        let mut bytes = [0u8; 32];
        for (i, pair) in chars.chunks(2).enumerate() {
            let hi = pair[0]
                .to_digit(16)
                .ok_or(ParseSeedError::BadDigit(pair[0]))?;
            let lo = pair[1]
                .to_digit(16)
                .ok_or(ParseSeedError::BadDigit(pair[1]))?;
            bytes[i] = (hi * 16 + lo) as u8;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let seed = PuzzleSeed::from_bytes([0xab; 32]);
        let text = seed.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<PuzzleSeed>().unwrap(), seed);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            "abc".parse::<PuzzleSeed>(),
            Err(ParseSeedError::BadLength(3))
        );
        let bad = "g".repeat(64);
        assert_eq!(
            bad.parse::<PuzzleSeed>(),
            Err(ParseSeedError::BadDigit('g'))
        );
    }

    #[test]
    fn test_same_seed_same_stream() {
        use rand::Rng as _;

        let seed = PuzzleSeed::from_bytes([7; 32]);
        let mut first = seed.rng();
        let mut second = seed.rng();
        let a: Vec<u32> = (0..8).map(|_| first.random()).collect();
        let b: Vec<u32> = (0..8).map(|_| second.random()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_seeds_differ() {
        assert_ne!(PuzzleSeed::random(), PuzzleSeed::random());
    }
}
