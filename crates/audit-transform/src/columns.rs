//! Column access helpers shared by the section transforms.

use audit_model::{CellValue, WorkbookIr};

/// Values of a column range, empty when the workbook does not carry it.
pub fn column(ir: &WorkbookIr, name: &str) -> Vec<CellValue> {
    ir.values(name).map(<[CellValue]>::to_vec).unwrap_or_default()
}

/// Text of the value at `row`, trimmed; empty for missing rows.
pub fn text_at(values: &[CellValue], row: usize) -> String {
    values
        .get(row)
        .map(|value| value.to_text().trim().to_string())
        .unwrap_or_default()
}

pub fn is_blank(values: &[CellValue], row: usize) -> bool {
    values.get(row).is_none_or(CellValue::is_empty)
}

/// Fill blank cells of `name` on rows selected by `wanted` with a computed
/// value. Absent ranges are left absent.
pub fn fill_blanks(
    ir: &mut WorkbookIr,
    name: &str,
    mut wanted: impl FnMut(usize) -> Option<CellValue>,
) {
    let Some(range) = ir.range_mut(name) else {
        return;
    };
    let mut values = std::mem::take(&mut range.values);
    for (row, value) in values.iter_mut().enumerate() {
        if value.is_empty()
            && let Some(default) = wanted(row)
        {
            *value = default;
        }
    }
    range.set_values(values);
}

/// Apply `f` to every value of every range.
pub fn map_all_values(ir: &mut WorkbookIr, mut f: impl FnMut(&str, CellValue) -> CellValue) {
    for sheet in &mut ir.sheets {
        for range in &mut sheet.ranges {
            let name = range.name.clone();
            let values = std::mem::take(&mut range.values)
                .into_iter()
                .map(|value| f(&name, value))
                .collect();
            range.values = values;
        }
    }
}
