//! Workbook reading.
//!
//! Spreadsheets are read through their defined names: each name resolves to a
//! cell block whose values become one IR range. Migrated submissions arrive as
//! the IR serialized to JSON and skip spreadsheet parsing.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use audit_model::{CellRef, CellValue, NamedRange, Sheet, WorkbookIr, column_letters};
use audit_standards::SECTION_NAME_RANGE;
use calamine::{Data, Range, Reader, Xlsx, XlsxError, open_workbook_from_rs};
use chrono::NaiveTime;
use tracing::{debug, trace};

use crate::destination::{Destination, parse_destination};
use crate::error::{IngestError, Result};
use crate::trim::trim_workbook;

/// Input format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Json,
}

impl WorkbookFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read a workbook file into trimmed IR.
pub fn read_workbook(path: &Path) -> Result<WorkbookIr> {
    let format = WorkbookFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_workbook_bytes(&bytes, format)
}

pub fn read_workbook_bytes(bytes: &[u8], format: WorkbookFormat) -> Result<WorkbookIr> {
    let mut ir = match format {
        WorkbookFormat::Xlsx => read_xlsx(bytes)?,
        WorkbookFormat::Json => read_json(bytes)?,
    };
    if ir.range(SECTION_NAME_RANGE).is_none() {
        return Err(IngestError::UnknownWorkbook {
            range: SECTION_NAME_RANGE,
        });
    }
    trim_workbook(&mut ir);
    Ok(ir)
}

fn read_json(bytes: &[u8]) -> Result<WorkbookIr> {
    serde_json::from_slice(bytes).map_err(|source| IngestError::Json { source })
}

fn read_xlsx(bytes: &[u8]) -> Result<WorkbookIr> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(
        |e: XlsxError| IngestError::Spreadsheet {
            message: e.to_string(),
        },
    )?;

    let mut by_sheet: BTreeMap<String, Vec<(String, Destination)>> = BTreeMap::new();
    for (name, formula) in workbook.defined_names() {
        if name.starts_with("_xlnm") {
            continue;
        }
        let destination =
            parse_destination(formula).ok_or_else(|| IngestError::InvalidDestination {
                name: name.clone(),
                destination: formula.to_string(),
            })?;
        if !destination.is_single_column() {
            debug!(name = %name, destination = %formula, "skipping multi-column defined name");
            continue;
        }
        by_sheet
            .entry(destination.sheet.clone())
            .or_default()
            .push((name.clone(), destination));
    }

    // Keep the workbook's sheet order rather than alphabetical order.
    let sheet_names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::new();
    for sheet_name in sheet_names {
        let Some(names) = by_sheet.remove(&sheet_name) else {
            continue;
        };
        let cells = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| IngestError::Sheet {
                sheet: sheet_name.clone(),
                message: e.to_string(),
            })?;
        let mut sheet = Sheet::new(sheet_name);
        for (name, destination) in names {
            sheet.ranges.push(read_range(&cells, name, &destination));
        }
        debug!(sheet = %sheet.name, ranges = sheet.ranges.len(), "read sheet");
        sheets.push(sheet);
    }
    for (sheet, names) in by_sheet {
        debug!(sheet = %sheet, names = names.len(), "defined names point at a missing sheet");
    }
    Ok(WorkbookIr::new(sheets))
}

fn read_range(cells: &Range<Data>, name: String, destination: &Destination) -> NamedRange {
    let values: Vec<CellValue> = (destination.start_row..=destination.end_row)
        .map(|row| {
            cells
                .get_value((row - 1, destination.start_column))
                .map(cell_value)
                .unwrap_or_default()
        })
        .collect();
    trace!(name = %name, values = values.len(), "read named range");
    NamedRange {
        name,
        start_cell: CellRef::new(column_letters(destination.start_column), destination.start_row),
        end_cell: CellRef::new(column_letters(destination.end_column), destination.end_row),
        values,
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Integer(*value),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) if datetime.time() == NaiveTime::MIN => {
                CellValue::Text(datetime.date().format("%Y-%m-%d").to_string())
            }
            Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Number(value.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => CellValue::Text(error.to_string()),
    }
}
