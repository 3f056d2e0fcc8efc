//! A1-style addressing: column letters, cell references and ranges.

use std::fmt;
use std::str::FromStr;

use crate::grid::{CellAddress, Rectangle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Input is not of the form `<letters><digits>:<letters><digits>`.
    Malformed(String),
    /// Column letters are empty, contain non-letters, or overflow.
    InvalidColumn(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(input) => write!(f, "malformed range address: '{input}'"),
            Self::InvalidColumn(letters) => write!(f, "invalid column letters: '{letters}'"),
        }
    }
}

impl std::error::Error for RangeError {}

/// Convert a 0-based column index to letters: 0 -> A, 25 -> Z, 26 -> AA.
///
/// Defined for every `usize`. [`letters_to_column_index`] inverts it up to
/// `usize::MAX - 1`; the letters for `usize::MAX` do not parse back.
pub fn column_index_to_letters(index: usize) -> String {
    let mut result = String::new();
    // Widened so the bijective +1 cannot overflow
    let mut n = index as u128 + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Convert column letters back to a 0-based index. Case-insensitive.
pub fn letters_to_column_index(letters: &str) -> Result<usize, RangeError> {
    let invalid = || RangeError::InvalidColumn(letters.to_string());
    if letters.is_empty() {
        return Err(invalid());
    }

    let mut col: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = (ch.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    Ok(col - 1)
}

/// Format a rectangle as `B2:D10`.
pub fn to_range_address(rect: &Rectangle) -> String {
    format!("{}:{}", rect.top_left(), rect.bottom_right())
}

/// Parse `B2:D10` into a rectangle. Reversed corners are normalized.
pub fn parse_range_address(input: &str) -> Result<Rectangle, RangeError> {
    let malformed = || RangeError::Malformed(input.to_string());
    let (start, end) = input.split_once(':').ok_or_else(malformed)?;
    let start = parse_cell_ref(start).ok_or_else(malformed)?;
    let end = parse_cell_ref(end).ok_or_else(malformed)?;
    Ok(Rectangle::spanning(start, end))
}

/// Parse a single `<letters><digits>` reference; `None` on anything else.
fn parse_cell_ref(cell_ref: &str) -> Option<CellAddress> {
    let split = cell_ref.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let col = letters_to_column_index(letters).ok()?;
    let row_number: usize = digits.parse().ok()?;
    // Row numbers are 1-indexed
    let row = row_number.checked_sub(1)?;
    Some(CellAddress::new(row, col))
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cell_ref(s).ok_or_else(|| RangeError::Malformed(s.to_string()))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_range_address(self))
    }
}

impl FromStr for Rectangle {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range_address(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_index_to_letters(0), "A");
        assert_eq!(column_index_to_letters(25), "Z");
        assert_eq!(column_index_to_letters(26), "AA");
        assert_eq!(column_index_to_letters(51), "AZ");
        assert_eq!(column_index_to_letters(52), "BA");
        assert_eq!(column_index_to_letters(701), "ZZ");
        assert_eq!(column_index_to_letters(702), "AAA");
    }

    #[test]
    fn test_letters_round_trip_two_letter_span() {
        for i in 0..=701 {
            let letters = column_index_to_letters(i);
            assert_eq!(letters_to_column_index(&letters), Ok(i), "column {letters}");
        }
    }

    #[test]
    fn test_letters_at_index_limit() {
        let max = column_index_to_letters(usize::MAX);
        assert!(!max.is_empty());
        assert!(matches!(letters_to_column_index(&max), Err(RangeError::InvalidColumn(_))));

        let below = column_index_to_letters(usize::MAX - 1);
        assert_eq!(letters_to_column_index(&below), Ok(usize::MAX - 1));
    }

    #[test]
    fn test_letters_case_insensitive() {
        assert_eq!(letters_to_column_index("ab"), Ok(27));
        assert_eq!(letters_to_column_index("aB"), Ok(27));
    }

    #[test]
    fn test_letters_invalid() {
        assert!(letters_to_column_index("").is_err());
        assert!(letters_to_column_index("A1").is_err());
        assert!(letters_to_column_index(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn test_format_range() {
        let rect = Rectangle::new(0, 1, 0, 1);
        assert_eq!(to_range_address(&rect), "A1:B2");
        assert_eq!(Rectangle::new(1, 9, 1, 3).to_string(), "B2:D10");
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range_address("B2:D10"), Ok(Rectangle::new(1, 9, 1, 3)));
        assert_eq!(parse_range_address("a1:z100"), Ok(Rectangle::new(0, 99, 0, 25)));
        assert_eq!("D10:B2".parse::<Rectangle>(), Ok(Rectangle::new(1, 9, 1, 3)));
    }

    #[test]
    fn test_parse_range_malformed() {
        for bad in ["", "A1", "A1:", ":B2", "A0:B2", "1A:B2", "A1:B2C", "A-1:B2", "$A$1:B2", " A1:B2", "A1:B2:C3"] {
            assert!(
                matches!(parse_range_address(bad), Err(RangeError::Malformed(_))),
                "expected malformed: {bad:?}"
            );
        }
    }

    #[test]
    fn test_cell_address_display_parse() {
        let cell = CellAddress::new(2, 27);
        assert_eq!(cell.to_string(), "AB3");
        assert_eq!("AB3".parse::<CellAddress>(), Ok(cell));
        assert!("AB".parse::<CellAddress>().is_err());
    }
}
