//! Terminal summaries for rejected workbooks and cross-validation runs.

use audit_cli::summary::{agency_line, cell_error_table, cross_error_table};
use audit_core::AgencyAssignment;
use audit_model::{CellError, CellRef, ValidatorKey};
use audit_validate::CrossValidationError;
use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;

fn plain(mut table: Table) -> String {
    table.load_preset(ASCII_MARKDOWN).force_no_tty();
    table.to_string()
}

#[test]
fn cell_errors_render_one_row_per_cell() {
    let errors = vec![
        CellError::new(
            "Form",
            &CellRef::new("A", 4),
            "0BCDEFGHJK12 is not a valid UEI",
            "https://example.test/help#uei",
        ),
        CellError::new(
            "Form",
            &CellRef::new("A", 5),
            "Duplicate",
            "https://example.test/help#dup",
        ),
    ];
    let rendered = plain(cell_error_table(&errors));
    insta::assert_snapshot!(rendered, @r"
    | Cell    | Message                         |
    |---------|---------------------------------|
    | Form!A4 | 0BCDEFGHJK12 is not a valid UEI |
    | Form!A5 | Duplicate                       |
    ");
}

#[test]
fn help_links_stay_out_of_the_table() {
    let errors = vec![CellError::new(
        "Form",
        &CellRef::new("C", 3),
        "Amount is required",
        "https://example.test/help#amount",
    )];
    let rendered = plain(cell_error_table(&errors));
    assert!(rendered.contains("Form!C3"));
    assert!(!rendered.contains("https://"));
}

#[test]
fn cross_errors_name_their_validator() {
    let errors = vec![CrossValidationError {
        validator: ValidatorKey::AdditionalUeis,
        message: "Additional UEIs are declared but the section is missing".to_string(),
    }];
    let rendered = plain(cross_error_table(&errors));
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("| Validator"));
    assert!(lines[2].starts_with("| additional_ueis | Additional UEIs are declared"));
}

#[test]
fn agency_line_names_the_role() {
    assert_eq!(
        agency_line(&AgencyAssignment::Cognizant("20".to_string())),
        "Cognizant agency: 20"
    );
    assert_eq!(
        agency_line(&AgencyAssignment::Oversight("93".to_string())),
        "Oversight agency: 93"
    );
}

#[test]
fn assignment_json_sets_exactly_one_field() {
    insta::assert_json_snapshot!(AgencyAssignment::Oversight("93".to_string()), @r#"
    {
      "cognizant_agency": null,
      "oversight_agency": "93"
    }
    "#);
}
