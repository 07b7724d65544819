//! Conversion between A1-style cell references and 0-based indexes

/// Converts column letters ("A", "AB") to a 0-based column index.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for letter in letters.chars() {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        index = index.checked_mul(26)?.checked_add(letter as usize - 'A' as usize + 1)?;
    }
    Some(index - 1)
}

/// Converts a 1-based row number ("12") to a 0-based row index.
pub(crate) fn row_to_index(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|row| *row > 0).map(|row| row - 1)
}

/// Parses a cell reference such as "B12" into (row, col).
/// Absolute markers ("$B$12") are accepted.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.replace('$', "").to_ascii_uppercase();
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    Some((row_to_index(digits)?, col_to_index(letters)?))
}

/// Converts a 0-based column index to column letters.
pub(crate) fn index_to_col(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = String::new();
    while col > 0 {
        col -= 1;
        letters.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    letters
}

/// Converts (row, col) to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}
