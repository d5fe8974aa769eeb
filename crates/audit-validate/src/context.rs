//! Shared view of one section's IR for the checks.

use audit_model::{CellError, CellRef, CellValue, WorkbookIr, YesNo, column_letters};
use audit_standards::{IntakeConfig, SectionTemplate};

/// Everything a check may look at.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub ir: &'a WorkbookIr,
    pub template: &'a SectionTemplate,
    pub config: &'a IntakeConfig,
    /// Migrated data may carry the migration sentinel.
    pub is_migration: bool,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        ir: &'a WorkbookIr,
        template: &'a SectionTemplate,
        config: &'a IntakeConfig,
    ) -> Self {
        Self {
            ir,
            template,
            config,
            is_migration: false,
        }
    }

    pub fn migration(mut self, is_migration: bool) -> Self {
        self.is_migration = is_migration;
        self
    }

    pub fn values(&self, name: &str) -> &'a [CellValue] {
        self.ir.values(name).unwrap_or(&[])
    }

    /// Number of data rows: the longest column range after trimming.
    pub fn row_count(&self) -> usize {
        self.template
            .column_ranges()
            .into_iter()
            .map(|name| self.values(name).len())
            .max()
            .unwrap_or(0)
    }

    /// Trimmed text of a column value, empty when missing.
    pub fn text(&self, name: &str, row: usize) -> String {
        self.values(name)
            .get(row)
            .map(|value| value.to_text().trim().to_string())
            .unwrap_or_default()
    }

    pub fn is_blank(&self, name: &str, row: usize) -> bool {
        self.values(name).get(row).is_none_or(CellValue::is_empty)
    }

    /// A Y/N column value; `None` when blank or not a valid answer.
    pub fn yes_no(&self, name: &str, row: usize) -> Option<YesNo> {
        YesNo::parse(&self.text(name, row), self.is_migration)
    }

    pub fn field(&self, name: &str) -> String {
        self.ir.scalar_text(name)
    }

    /// Rows where `name` holds a non-blank value.
    pub fn filled_rows(&self, name: &'a str) -> impl Iterator<Item = (usize, String)> + 'a {
        let ctx = *self;
        (0..self.row_count())
            .map(move |row| (row, ctx.text(name, row)))
            .filter(|(_, text)| !text.is_empty())
    }

    /// Cell error at `row` of the named range.
    pub fn error_at(
        &self,
        name: &str,
        row: usize,
        text: impl Into<String>,
        anchor: &str,
    ) -> CellError {
        let (sheet, cell) = self.ir.locate(name, row).unwrap_or_else(|| {
            // Ranges the workbook lacks are reported on the data sheet.
            let row = self.template.header_row + 1 + row as u32;
            (self.template.sheet.to_string(), CellRef::new(column_letters(0), row))
        });
        CellError::new(sheet, &cell, text, self.config.help_link(anchor))
    }

    /// Cell error on a scalar field.
    pub fn field_error(&self, name: &str, text: impl Into<String>, anchor: &str) -> CellError {
        let (sheet, cell) = self
            .ir
            .locate(name, 0)
            .unwrap_or_else(|| (self.template.sheet.to_string(), CellRef::new("A", 1)));
        CellError::new(sheet, &cell, text, self.config.help_link(anchor))
    }
}

/// Human label for a named range: `award_reference` -> `Award reference`.
pub fn label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
