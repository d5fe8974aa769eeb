//! Uniform trailing-row trimming.
//!
//! Spreadsheet tooling reports rows well past the last one a user filled in,
//! and not equally for every column. All column ranges on a sheet are cut (or
//! padded) to one common length so row alignment survives ragged trailing
//! blanks. Single-cell ranges are scalars and are left as they are.

use audit_model::{CellValue, Sheet, WorkbookIr};

/// Length every column range on the sheet is trimmed to.
pub fn common_length(sheet: &Sheet) -> usize {
    sheet
        .ranges
        .iter()
        .filter(|range| range.is_column())
        .filter_map(|range| range.values.iter().rposition(|value| !value.is_empty()))
        .map(|last| last + 1)
        .max()
        .unwrap_or(0)
}

pub fn trim_sheet(sheet: &mut Sheet) {
    let length = common_length(sheet);
    for range in sheet.ranges.iter_mut().filter(|range| range.is_column()) {
        let mut values = std::mem::take(&mut range.values);
        values.resize(length, CellValue::Missing);
        range.set_values(values);
    }
}

pub fn trim_workbook(ir: &mut WorkbookIr) {
    for sheet in &mut ir.sheets {
        trim_sheet(sheet);
    }
}
