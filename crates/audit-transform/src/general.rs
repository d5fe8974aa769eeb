//! Transforms applied to every section before its own.

use std::collections::BTreeSet;

use audit_model::{CellValue, WorkbookIr};
use audit_standards::{SectionTemplate, ValueKind};

use crate::columns::map_all_values;

/// Strip surrounding whitespace from text cells.
pub fn strip_text(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    map_all_values(&mut ir, |_, value| match value {
        CellValue::Text(text) if text.trim().len() != text.len() => {
            CellValue::Text(text.trim().to_string())
        }
        other => other,
    });
    ir
}

/// Upper-case answers in Y/N columns and fields so `y` reads as `Y`.
pub fn uppercase_yes_no(mut ir: WorkbookIr, template: &SectionTemplate) -> WorkbookIr {
    let answers: BTreeSet<&str> = template
        .columns
        .iter()
        .chain(template.fields.iter())
        .filter(|mapping| matches!(mapping.kind, ValueKind::YesNo | ValueKind::Flag))
        .map(|mapping| mapping.range)
        .collect();
    map_all_values(&mut ir, |name, value| match value {
        CellValue::Text(text) if answers.contains(name) => {
            CellValue::Text(text.to_ascii_uppercase())
        }
        other => other,
    });
    ir
}
