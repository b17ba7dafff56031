//! The puzzle description grammar.
//!
//! A description is a flat sequence of tagged integers:
//!
//! - `s<int>`: one ship length, once per ship
//! - `r<int>`: one row total per row, `-1` for a hidden total
//! - `c<int>`: one column total per column, `-1` for hidden
//! - `y<int>x<int>z<int>`: one disclosed cell, any number of times,
//!   with `z` the cell state code (`-1` vacant through `6` inner)
//!
//! Token order is not significant and unrecognized characters are
//! skipped, so `s5s4r2r-1c3c2c2y0x1z-1` and a pretty-printed variant
//! parse alike.

use armada_core::{Board, CellState, Clues, Params};
use thiserror::Error;

/// A malformed puzzle description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescError {
    /// A ship length was missing, zero or negative.
    #[error("Positive integer expected after 's'.")]
    BadShip,
    /// A ship length exceeded the grid.
    #[error("Ship size after 's' bigger than field size.")]
    ShipTooBig,
    /// A row total was missing or out of range.
    #[error("Integer between -1 and width is expected after 'r'.")]
    BadRowTotal,
    /// A column total was missing or out of range.
    #[error("Integer between -1 and height is expected after 'c'.")]
    BadColTotal,
    /// A cell row was missing or out of range.
    #[error("Integer between 0 and (height - 1) is expected after 'y'.")]
    BadCellRow,
    /// A cell column was missing or out of range.
    #[error("Integer between 0 and (width - 1) is expected after 'x'.")]
    BadCellColumn,
    /// A cell state code was missing or out of range.
    #[error("Integer between -1 and 6 is expected after 'z'.")]
    BadCellState,
    /// The description named no ships.
    #[error("Number of ships 's' must be at least one.")]
    NoShips,
    /// The number of `r` tokens did not match the height.
    #[error("Number of rows 'r' not equal to height.")]
    RowCountMismatch,
    /// The number of `c` tokens did not match the width.
    #[error("Number of columns 'c' not equal to width.")]
    ColCountMismatch,
    /// The `y`, `x` and `z` tokens did not pair up.
    #[error(
        "Number of 'y', 'x', 'z' (coordinates and value of initially disclosed cells) must be equal."
    )]
    DisclosureMismatch,
}

/// Renders a clue set as a description string.
///
/// # Examples
///
/// ```
/// use armada_core::{Board, CellState, Clues};
/// use armada_game::desc;
///
/// let mut init = Board::undef(7, 7);
/// init.set(0, 1, CellState::One);
/// let clues = Clues::new(
///     vec![2, 1],
///     vec![Some(1), None, Some(2), Some(0), Some(0), Some(0), Some(0)],
///     vec![Some(0); 7],
///     init,
/// );
/// let text = desc::encode(&clues);
/// assert!(text.starts_with("s2s1r1r-1r2"));
/// assert!(text.ends_with("y0x1z5"));
/// ```
#[must_use]
pub fn encode(clues: &Clues) -> String {
    let mut out = String::new();
    for &len in clues.ships() {
        out.push_str(&format!("s{len}"));
    }
    for &total in clues.rows() {
        out.push_str(&format!("r{}", total.map_or(-1, i32::from)));
    }
    for &total in clues.cols() {
        out.push_str(&format!("c{}", total.map_or(-1, i32::from)));
    }
    for pos in clues.init().positions() {
        let state = clues.init()[pos];
        if state != CellState::Undef {
            out.push_str(&format!("y{}x{}z{}", pos.y, pos.x, state.code()));
        }
    }
    out
}

/// Parses and validates a description string against the grid size in
/// `params`.
///
/// # Errors
///
/// Returns a [`DescError`] naming the first offending token, or a count
/// mismatch once the string has been consumed.
pub fn parse(params: &Params, desc: &str) -> Result<Clues, DescError> {
    let (h, w) = (params.height, params.width);
    let mut ships: Vec<u8> = Vec::new();
    let mut rows: Vec<Option<u8>> = Vec::new();
    let mut cols: Vec<Option<u8>> = Vec::new();
    let mut ys: Vec<usize> = Vec::new();
    let mut xs: Vec<usize> = Vec::new();
    let mut zs: Vec<CellState> = Vec::new();

    let mut scanner = Scanner::new(desc);
    while let Some(tag) = scanner.next_tag() {
        match tag {
            's' => {
                let v = scanner.integer().ok_or(DescError::BadShip)?;
                if v <= 0 {
                    return Err(DescError::BadShip);
                }
                if v > h as i32 || v > w as i32 {
                    return Err(DescError::ShipTooBig);
                }
                ships.push(v as u8);
            }
            'r' => {
                let v = scanner.integer().ok_or(DescError::BadRowTotal)?;
                if !(-1..=w as i32).contains(&v) {
                    return Err(DescError::BadRowTotal);
                }
                rows.push((v >= 0).then_some(v as u8));
            }
            'c' => {
                let v = scanner.integer().ok_or(DescError::BadColTotal)?;
                if !(-1..=h as i32).contains(&v) {
                    return Err(DescError::BadColTotal);
                }
                cols.push((v >= 0).then_some(v as u8));
            }
            'y' => {
                let v = scanner.integer().ok_or(DescError::BadCellRow)?;
                if !(0..h as i32).contains(&v) {
                    return Err(DescError::BadCellRow);
                }
                ys.push(v as usize);
            }
            'x' => {
                let v = scanner.integer().ok_or(DescError::BadCellColumn)?;
                if !(0..w as i32).contains(&v) {
                    return Err(DescError::BadCellColumn);
                }
                xs.push(v as usize);
            }
            'z' => {
                let v = scanner.integer().ok_or(DescError::BadCellState)?;
                if !(-1..=6).contains(&v) {
                    return Err(DescError::BadCellState);
                }
                zs.push(CellState::from_code(v as i8).unwrap());
            }
            _ => {}
        }
    }

    if ships.is_empty() {
        return Err(DescError::NoShips);
    }
    if rows.len() != h {
        return Err(DescError::RowCountMismatch);
    }
    if cols.len() != w {
        return Err(DescError::ColCountMismatch);
    }
    if ys.len() != xs.len() || xs.len() != zs.len() {
        return Err(DescError::DisclosureMismatch);
    }

    let mut init = Board::undef(h, w);
    for ((&y, &x), &state) in ys.iter().zip(&xs).zip(&zs) {
        init.set(y, x, state);
    }
    Ok(Clues::new(ships, rows, cols, init))
}

/// A cursor over a description or move string: tags are single letters,
/// payloads are optionally signed integers, anything else is skipped.
pub(crate) struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    pub(crate) fn next_tag(&mut self) -> Option<char> {
        loop {
            let c = self.rest.chars().next()?;
            self.rest = &self.rest[c.len_utf8()..];
            if matches!(c, 's' | 'r' | 'c' | 'y' | 'x' | 'z' | 'd' | 'S') {
                return Some(c);
            }
        }
    }

    /// Parses the integer right after a tag; `None` when no digits
    /// follow.
    pub(crate) fn integer(&mut self) -> Option<i32> {
        let negative = self.rest.starts_with('-');
        let digits = &self.rest[usize::from(negative)..];
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let value: i32 = digits[..end].parse().ok()?;
        self.rest = &digits[end..];
        Some(if negative { -value } else { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armada_core::Difficulty;

    fn params() -> Params {
        Params::new(7, 7, Difficulty::Basic)
    }

    fn minimal_desc() -> String {
        let mut s = String::from("s2");
        s.push_str(&"r0".repeat(7));
        s.push_str(&"c0".repeat(7));
        s
    }

    #[test]
    fn test_round_trip() {
        let mut init = Board::undef(7, 7);
        init.set(2, 3, CellState::Vacant);
        init.set(4, 0, CellState::North);
        let clues = Clues::new(
            vec![3, 2, 2],
            vec![Some(2), Some(0), Some(1), None, Some(2), Some(0), Some(2)],
            vec![Some(3), None, Some(0), Some(1), Some(1), Some(1), Some(1)],
            init,
        );
        let text = encode(&clues);
        let parsed = parse(&params(), &text).unwrap();
        assert_eq!(parsed, clues);
    }

    #[test]
    fn test_token_order_is_free() {
        let text = format!("y1x2z-1{}", minimal_desc());
        let clues = parse(&params(), &text).unwrap();
        assert_eq!(clues.init().get(1, 2), CellState::Vacant);
        assert_eq!(clues.ships(), &[2]);
    }

    #[test]
    fn test_unrecognized_characters_are_skipped() {
        let text = format!(" {} \n!", minimal_desc());
        assert!(parse(&params(), &text).is_ok());
    }

    #[test]
    fn test_missing_digits() {
        assert_eq!(parse(&params(), "s"), Err(DescError::BadShip));
        let text = format!("{}r", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::BadRowTotal));
    }

    #[test]
    fn test_range_checks() {
        assert_eq!(parse(&params(), "s0"), Err(DescError::BadShip));
        assert_eq!(parse(&params(), "s8"), Err(DescError::ShipTooBig));
        let text = format!("{}r8", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::BadRowTotal));
        let text = format!("{}y7x0z0", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::BadCellRow));
        let text = format!("{}y0x0z7", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::BadCellState));
        let text = format!("{}y0x0z-2", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::BadCellState));
    }

    #[test]
    fn test_count_checks() {
        let text: String = format!("{}r0", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::RowCountMismatch));

        let mut no_ships = minimal_desc();
        no_ships.replace_range(0..2, "");
        assert_eq!(parse(&params(), &no_ships), Err(DescError::NoShips));

        let text = format!("{}y0x0", minimal_desc());
        assert_eq!(parse(&params(), &text), Err(DescError::DisclosureMismatch));
    }
}
