//! Utilities for formatting and parsing A1-style cell references.
//!
//! Everything here is 1-based, matching the layout engine's coordinates.

/// Largest column index an XLSX sheet can address (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row index an XLSX sheet can address.
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a 1-based column index to its letter name (1 → "A", 27 → "AA").
///
/// Column 0 has no name and yields an empty string.
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + digit));
        n /= 26;
    }
    result
}

/// Format a 1-based (row, col) pair as "A1".
pub fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row)
}

/// Format a 1-based (row, col) pair as an absolute reference "$A$1".
pub fn absolute_cell_name(row: u32, col: u32) -> String {
    format!("${}${}", col_to_letter(col), row)
}

/// Format a rectangle as "A1:C3", collapsing single cells to "A1".
pub fn range_name(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> String {
    if start_row == end_row && start_col == end_col {
        cell_name(start_row, start_col)
    } else {
        format!(
            "{}:{}",
            cell_name(start_row, start_col),
            cell_name(end_row, end_col)
        )
    }
}

/// Format a rectangle with absolute references, qualified by sheet name.
pub fn sheet_range_name(
    sheet: &str,
    start_row: u32,
    start_col: u32,
    end_row: u32,
    end_col: u32,
) -> String {
    format!(
        "'{}'!{}:{}",
        sheet.replace('\'', "''"),
        absolute_cell_name(start_row, start_col),
        absolute_cell_name(end_row, end_col)
    )
}

/// Parse a cell reference like "B3" into 1-based (row, col).
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() && !saw_row {
            let upper = ch.to_ascii_uppercase();
            col = col.checked_mul(26)?.checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((row, col))
}

/// Parse "A1:B10" or "A1" into 1-based (start_row, start_col, end_row, end_col).
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_row, start_col) = parse_cell_ref(start)?;
        let (end_row, end_col) = parse_cell_ref(end)?;
        Some((start_row, start_col, end_row, end_col))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some((row, col, row, col))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(1), "A");
        assert_eq!(col_to_letter(26), "Z");
        assert_eq!(col_to_letter(27), "AA");
        assert_eq!(col_to_letter(702), "ZZ");
        assert_eq!(col_to_letter(703), "AAA");
        assert_eq!(col_to_letter(MAX_COLUMN), "XFD");
        assert_eq!(col_to_letter(0), "");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((1, 1)));
        assert_eq!(parse_cell_ref("$C$7"), Some((7, 3)));
        assert_eq!(parse_cell_ref("aa10"), Some((10, 27)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
        assert_eq!(parse_cell_ref(""), None);
    }

    #[test]
    fn test_range_names() {
        assert_eq!(range_name(1, 1, 1, 1), "A1");
        assert_eq!(range_name(2, 1, 3, 4), "A2:D3");
        assert_eq!(parse_cell_range("A2:D3"), Some((2, 1, 3, 4)));
        assert_eq!(
            sheet_range_name("Bob's", 1, 1, 2, 2),
            "'Bob''s'!$A$1:$B$2"
        );
    }
}
