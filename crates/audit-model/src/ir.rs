//! Workbook intermediate representation (IR).
//!
//! A workbook is read into an ordered list of sheets, each holding the named
//! ranges that live on it. A range keeps its source address so that every
//! value can be traced back to a spreadsheet cell when reporting errors.
//!
//! The IR serializes as a plain JSON list of sheets. Migrated submissions are
//! delivered in exactly this shape and skip spreadsheet parsing entirely.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value as read from the workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Missing,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// True for missing cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used by every string-typed rule.
    ///
    /// Whole floats render without a fractional part so that `93.0` read from
    /// a numeric cell compares equal to the text `93`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Missing => String::new(),
            CellValue::Bool(true) => "Y".to_string(),
            CellValue::Bool(false) => "N".to_string(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
                    format!("{}", *value as i64)
                } else {
                    value.to_string()
                }
            }
            CellValue::Text(text) => text.clone(),
        }
    }

    /// Integer view of the cell, if it holds a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Number(value)
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 =>
            {
                Some(*value as i64)
            }
            CellValue::Text(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        parse_date(&self.to_text())
    }
}

/// Parse the date forms workbooks carry: ISO first, then US style.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split('T').next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%Y"))
        .ok()
}

/// Spreadsheet cell address: column letters and 1-based row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub column: String,
    pub row: u32,
}

impl CellRef {
    pub fn new(column: impl Into<String>, row: u32) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Convert a 0-based column index into spreadsheet letters (`0` -> `A`).
pub fn column_letters(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert spreadsheet letters into a 0-based column index (`A` -> `0`).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(ch.to_ascii_uppercase() as u8 - b'A') + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// A named cell block and its values, one per physical row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRange {
    /// Stable semantic key (the workbook's defined name).
    pub name: String,
    pub start_cell: CellRef,
    pub end_cell: CellRef,
    pub values: Vec<CellValue>,
}

impl NamedRange {
    pub fn new(name: impl Into<String>, start_cell: CellRef, values: Vec<CellValue>) -> Self {
        let end_row = start_cell.row + (values.len().max(1) as u32) - 1;
        let end_cell = CellRef::new(start_cell.column.clone(), end_row);
        Self {
            name: name.into(),
            start_cell,
            end_cell,
            values,
        }
    }

    /// Ranges spanning more than one row hold per-row column data.
    pub fn is_column(&self) -> bool {
        self.end_cell.row > self.start_cell.row
    }

    /// Physical row of the value at `index`.
    pub fn row_of(&self, index: usize) -> u32 {
        self.start_cell.row + index as u32
    }

    /// Cell address of the value at `index`.
    pub fn cell_at(&self, index: usize) -> CellRef {
        CellRef::new(self.start_cell.column.clone(), self.row_of(index))
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// Replace the values and keep the end cell consistent with them.
    pub fn set_values(&mut self, values: Vec<CellValue>) {
        let span = values.len().max(1) as u32;
        self.end_cell = CellRef::new(
            self.start_cell.column.clone(),
            self.start_cell.row + span - 1,
        );
        self.values = values;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub ranges: Vec<NamedRange>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ranges: Vec::new(),
        }
    }

    pub fn range(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.iter().find(|range| range.name == name)
    }
}

/// The whole workbook as an ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkbookIr {
    pub sheets: Vec<Sheet>,
}

impl WorkbookIr {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Find a named range on any sheet.
    pub fn range(&self, name: &str) -> Option<&NamedRange> {
        self.sheets.iter().find_map(|sheet| sheet.range(name))
    }

    pub fn range_mut(&mut self, name: &str) -> Option<&mut NamedRange> {
        self.sheets
            .iter_mut()
            .flat_map(|sheet| sheet.ranges.iter_mut())
            .find(|range| range.name == name)
    }

    /// Name of the sheet holding the named range.
    pub fn sheet_of(&self, name: &str) -> Option<&str> {
        self.sheets
            .iter()
            .find(|sheet| sheet.range(name).is_some())
            .map(|sheet| sheet.name.as_str())
    }

    pub fn values(&self, name: &str) -> Option<&[CellValue]> {
        self.range(name).map(|range| range.values.as_slice())
    }

    /// First value of a (scalar) named range.
    pub fn scalar(&self, name: &str) -> Option<&CellValue> {
        self.range(name).and_then(|range| range.values.first())
    }

    /// Text of a scalar range, empty when absent.
    pub fn scalar_text(&self, name: &str) -> String {
        self.scalar(name)
            .map(|value| value.to_text().trim().to_string())
            .unwrap_or_default()
    }

    /// Replace the values of a named range. Returns false when no such range.
    pub fn replace_values(&mut self, name: &str, values: Vec<CellValue>) -> bool {
        match self.range_mut(name) {
            Some(range) => {
                range.set_values(values);
                true
            }
            None => false,
        }
    }

    /// Sheet and cell address of the value at `index` in a named range.
    pub fn locate(&self, name: &str, index: usize) -> Option<(String, CellRef)> {
        let sheet = self.sheet_of(name)?;
        let range = self.range(name)?;
        Some((sheet.to_string(), range.cell_at(index)))
    }
}
