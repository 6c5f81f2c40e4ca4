//! A1-style cell reference helpers

/// Convert a zero-based column index to an Excel column letter
///
/// Examples:
/// - 0 → A
/// - 1 → B
/// - 25 → Z
/// - 26 → AA
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Single cell reference, e.g. `J2`, from a zero-based column and 1-based row
pub fn cell(col: u16, row: u32) -> String {
    format!("{}{}", column_index_to_letter(col as usize), row)
}

/// Absolute single-column range on another sheet, e.g. `'字典'!$A$2:$A$5`
///
/// Rows are 1-based and inclusive. The sheet name is always quoted.
pub fn absolute_column_range(sheet: &str, col: u16, first_row: u32, last_row: u32) -> String {
    let letter = column_index_to_letter(col as usize);
    format!(
        "'{}'!${}${}:${}${}",
        sheet.replace('\'', "''"),
        letter,
        first_row,
        letter,
        last_row
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(701), "ZZ");
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(9, 2), "J2");
        assert_eq!(cell(26, 1001), "AA1001");
    }

    #[test]
    fn test_absolute_column_range() {
        assert_eq!(absolute_column_range("字典", 0, 2, 5), "'字典'!$A$2:$A$5");
        assert_eq!(absolute_column_range("O'Brien", 1, 2, 2), "'O''Brien'!$B$2:$B$2");
    }
}
