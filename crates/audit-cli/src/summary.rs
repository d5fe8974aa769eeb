//! Terminal tables for intake and cross-validation results.

use audit_core::AgencyAssignment;
use audit_model::CellError;
use audit_validate::CrossValidationError;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

/// One row per cell error, addressed as `Sheet!A1`.
pub fn cell_error_table(errors: &[CellError]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Cell"), header_cell("Message")]);
    for error in errors {
        table.add_row(vec![
            Cell::new(format!("{}!{}", error.sheet, error.cell())).fg(Color::Red),
            Cell::new(error.text()),
        ]);
    }
    table
}

pub fn cross_error_table(errors: &[CrossValidationError]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Validator"), header_cell("Message")]);
    for error in errors {
        table.add_row(vec![
            Cell::new(error.validator.as_str()).fg(Color::Yellow),
            Cell::new(&error.message),
        ]);
    }
    table
}

pub fn agency_line(assignment: &AgencyAssignment) -> String {
    match assignment {
        AgencyAssignment::Cognizant(agency) => format!("Cognizant agency: {agency}"),
        AgencyAssignment::Oversight(agency) => format!("Oversight agency: {agency}"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn print_cell_errors(errors: &[CellError]) {
    let mut table = cell_error_table(errors);
    apply_table_style(&mut table);
    println!("{table}");
    println!("{} cell error(s)", errors.len());
}

pub fn print_cross_errors(errors: &[CrossValidationError]) {
    if errors.is_empty() {
        println!("No cross-validation errors");
        return;
    }
    let mut table = cross_error_table(errors);
    apply_table_style(&mut table);
    println!("{table}");
    println!("{} cross-validation error(s)", errors.len());
}
