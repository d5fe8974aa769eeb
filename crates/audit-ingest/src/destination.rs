//! Parsing of defined-name destinations such as `Form!$A$3:$A$1000`.

use audit_model::column_index;

/// A resolved cell block: sheet plus 0-based column and 1-based rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub sheet: String,
    pub start_column: u32,
    pub start_row: u32,
    pub end_column: u32,
    pub end_row: u32,
}

impl Destination {
    pub fn is_single_column(&self) -> bool {
        self.start_column == self.end_column
    }
}

/// Parse a defined-name formula. Returns `None` for anything that is not a
/// plain sheet-qualified cell or block reference.
pub fn parse_destination(formula: &str) -> Option<Destination> {
    let formula = formula.trim().trim_start_matches('=');
    let (sheet, block) = formula.rsplit_once('!')?;
    let sheet = unquote_sheet(sheet)?;
    let (start, end) = match block.split_once(':') {
        Some((start, end)) => (start, end),
        None => (block, block),
    };
    let (start_column, start_row) = parse_cell(start)?;
    let (end_column, end_row) = parse_cell(end)?;
    if end_row < start_row || end_column < start_column {
        return None;
    }
    Some(Destination {
        sheet,
        start_column,
        start_row,
        end_column,
        end_row,
    })
}

fn unquote_sheet(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => Some(quoted.replace("''", "'")),
        None => Some(raw.to_string()),
    }
}

fn parse_cell(raw: &str) -> Option<(u32, u32)> {
    let cell: String = raw.chars().filter(|c| *c != '$').collect();
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    let column = column_index(letters)?;
    let row = digits.parse::<u32>().ok().filter(|row| *row > 0)?;
    Some((column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_blocks_and_quoted_sheets() {
        let dest = parse_destination("'Federal Awards'!$B$3:$B$1000").expect("dest");
        assert_eq!(dest.sheet, "Federal Awards");
        assert_eq!((dest.start_column, dest.start_row), (1, 3));
        assert_eq!((dest.end_column, dest.end_row), (1, 1000));
        assert!(dest.is_single_column());

        let single = parse_destination("=Coversheet!$A$1").expect("single");
        assert_eq!(single.start_row, single.end_row);
    }

    #[test]
    fn rejects_broken_references() {
        assert_eq!(parse_destination("#REF!"), None);
        assert_eq!(parse_destination("Form!$A$0"), None);
        assert_eq!(parse_destination("Form!$A$5:$A$3"), None);
        assert_eq!(parse_destination("no sheet"), None);
    }
}
