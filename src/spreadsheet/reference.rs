//! A1-style cell references.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$").expect("Hardcode regex pattern"));

/// Rows in a worksheet grid
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Columns in a worksheet grid (`A` to `XFD`)
pub(crate) const MAX_COLS: usize = 16_384;

/// Converts 0-based row and column indexes to a reference such as `B3`.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::<char>::new();
    let mut col = col + 1;
    while col > 0 {
        col -= 1;
        letters.push((b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}

/// Parses a reference such as `B3` (or `$B$3`) to 0-based `(row, col)` indexes.
/// References outside the worksheet grid give `None`.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let captures = REFERENCE.captures(reference)?;
    let col = captures
        .get(1)?
        .as_str()
        .bytes()
        .fold(0usize, |index, letter| index * 26 + (letter.to_ascii_uppercase() - b'A') as usize + 1);
    let row = captures.get(2)?.as_str().parse::<usize>().ok()?;
    if row > MAX_ROWS || col > MAX_COLS {
        return None;
    }
    Some((row.checked_sub(1)?, col.checked_sub(1)?))
}
