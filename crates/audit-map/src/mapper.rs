//! Template-driven mapping of workbook ranges into a JSON document.

use audit_model::{CellValue, SectionRecord, WorkbookIr};
use audit_standards::{Fanout, RangeMapping, SectionTemplate, ValueKind};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MappingError, Result};

type Entry = Map<String, Value>;

/// Map a checked workbook into its canonical section record.
pub fn map_section(ir: &WorkbookIr, template: &SectionTemplate) -> Result<SectionRecord> {
    let document = map_document(ir, template)?;
    Ok(SectionRecord::from_json(template.section, document)?)
}

/// Build the section's JSON document without binding it to a record type.
///
/// Data rows are indexed by their physical position below the header, so a
/// value on spreadsheet row `header_row + 1 + n` always lands in entry `n`.
/// Rows skipped by every column are backfilled as empty entries.
pub fn map_document(ir: &WorkbookIr, template: &SectionTemplate) -> Result<Value> {
    let mut document = Entry::new();
    for field in &template.fields {
        if let Some(value) = ir.scalar(field.range)
            && let Some(json) = convert(field, 0, value)?
        {
            insert_at(&mut document, field.path, json)?;
        }
    }
    if let Some(entries_path) = template.entries_path {
        let entries = map_entries(ir, template)?;
        debug!(
            section = %template.section,
            entries = entries.len(),
            "mapped section entries"
        );
        document.insert(
            entries_path.to_string(),
            Value::Array(entries.into_iter().map(Value::Object).collect()),
        );
    }
    Ok(Value::Object(document))
}

fn map_entries(ir: &WorkbookIr, template: &SectionTemplate) -> Result<Vec<Entry>> {
    let mut rows: Vec<Entry> = Vec::new();
    for column in &template.columns {
        let Some(range) = ir.range(column.range) else {
            continue;
        };
        for (index, value) in range.values.iter().enumerate() {
            let Some(row) = template.row_index(range.row_of(index)) else {
                continue;
            };
            if let Some(json) = convert(column, row, value)? {
                insert_at(entry(&mut rows, row), column.path, json)?;
            }
        }
    }
    for fanout in &template.fanouts {
        map_fanout(ir, template, fanout, &mut rows)?;
    }
    Ok(rows)
}

fn entry(rows: &mut Vec<Entry>, row: usize) -> &mut Entry {
    if rows.len() <= row {
        rows.resize_with(row + 1, Entry::new);
    }
    &mut rows[row]
}

/// The cell of `range` on data row `row`, if the range reaches that far.
fn cell_for_row<'a>(
    ir: &'a WorkbookIr,
    template: &SectionTemplate,
    range: &str,
    row: usize,
) -> Option<&'a CellValue> {
    let named = ir.range(range)?;
    let physical = template.header_row as usize + 1 + row;
    let index = physical.checked_sub(named.start_cell.row as usize)?;
    named.get(index)
}

fn split(value: &CellValue, delimiter: char) -> Vec<String> {
    let text = value.to_text();
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(delimiter)
        .map(|piece| piece.trim().to_string())
        .collect()
}

/// Expand delimited parallel cells into a list of sub-entries per row. The
/// first part decides how many sub-entries a row gets; pieces of the other
/// parts pair up by position.
fn map_fanout(
    ir: &WorkbookIr,
    template: &SectionTemplate,
    fanout: &Fanout,
    rows: &mut Vec<Entry>,
) -> Result<()> {
    let Some(&(driver, _)) = fanout.parts.first() else {
        return Ok(());
    };
    let Some(range) = ir.range(driver) else {
        return Ok(());
    };
    for index in 0..range.values.len() {
        let Some(row) = template.row_index(range.row_of(index)) else {
            continue;
        };
        let count = range
            .get(index)
            .map_or(0, |value| split(value, fanout.delimiter).len());
        if count == 0 {
            continue;
        }
        let mut subentries = vec![Entry::new(); count];
        for &(part, key) in fanout.parts {
            let pieces = cell_for_row(ir, template, part, row)
                .map(|value| split(value, fanout.delimiter))
                .unwrap_or_default();
            for (subentry, piece) in subentries.iter_mut().zip(pieces) {
                if !piece.is_empty() {
                    subentry.insert(key.to_string(), Value::String(piece));
                }
            }
        }
        let list = Value::Array(subentries.into_iter().map(Value::Object).collect());
        insert_at(entry(rows, row), fanout.list_path, list)?;
    }
    Ok(())
}

/// Coerce one cell by the mapping's kind. Empty cells map to nothing.
fn convert(mapping: &RangeMapping, row: usize, value: &CellValue) -> Result<Option<Value>> {
    if value.is_empty() {
        return Ok(None);
    }
    let invalid = |expected: &'static str| MappingError::InvalidValue {
        range: mapping.range,
        row,
        value: value.to_text(),
        expected,
    };
    let json = match mapping.kind {
        ValueKind::Text | ValueKind::YesNo => Value::String(value.to_text().trim().to_string()),
        ValueKind::Integer => value
            .as_integer()
            .map(Value::from)
            .ok_or_else(|| invalid("a whole number"))?,
        ValueKind::Flag => match value.to_text().trim() {
            "Y" => Value::Bool(true),
            "N" => Value::Bool(false),
            _ => return Err(invalid("Y or N")),
        },
        ValueKind::Date => value
            .as_date()
            .map(|date| Value::String(date.to_string()))
            .ok_or_else(|| invalid("a date"))?,
    };
    Ok(Some(json))
}

/// Write `value` at a nested path, creating intermediate objects.
fn insert_at(target: &mut Entry, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut node = target;
    for (depth, key) in parents.iter().enumerate() {
        let child = node
            .entry(*key)
            .or_insert_with(|| Value::Object(Entry::new()));
        node = match child {
            Value::Object(map) => map,
            _ => {
                return Err(MappingError::PathConflict {
                    path: path[..=depth].join("."),
                });
            }
        };
    }
    node.insert((*last).to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_paths_share_parents() {
        let mut entry = Entry::new();
        insert_at(&mut entry, &["program", "a"], json!(1)).unwrap();
        insert_at(&mut entry, &["program", "b"], json!("x")).unwrap();
        assert_eq!(Value::Object(entry), json!({ "program": { "a": 1, "b": "x" } }));
    }

    #[test]
    fn scalar_parents_are_a_conflict() {
        let mut entry = Entry::new();
        insert_at(&mut entry, &["program"], json!("flat")).unwrap();
        let err = insert_at(&mut entry, &["program", "a"], json!(1)).unwrap_err();
        assert!(matches!(err, MappingError::PathConflict { path } if path == "program"));
    }

    #[test]
    fn split_keeps_positions_of_empty_pieces() {
        let pieces = split(&CellValue::text("A | |C"), '|');
        assert_eq!(pieces, vec!["A", "", "C"]);
        assert!(split(&CellValue::Missing, '|').is_empty());
    }
}
