use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::CellRef;

/// Human-readable explanation attached to a cell error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub text: String,
    pub link: String,
}

/// A field-level problem, always locatable back to a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellError {
    pub column: String,
    pub row: u32,
    pub sheet: String,
    pub detail: ErrorDetail,
}

impl CellError {
    pub fn new(
        sheet: impl Into<String>,
        cell: &CellRef,
        text: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            column: cell.column.clone(),
            row: cell.row,
            sheet: sheet.into(),
            detail: ErrorDetail {
                text: text.into(),
                link: link.into(),
            },
        }
    }

    pub fn cell(&self) -> CellRef {
        CellRef::new(self.column.clone(), self.row)
    }

    pub fn text(&self) -> &str {
        &self.detail.text
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}: {}",
            self.sheet, self.column, self.row, self.detail.text
        )
    }
}
