//! Additional UEIs, additional EINs and secondary auditor checks.

use std::collections::BTreeSet;

use audit_model::CellError;

use crate::context::{CheckContext, label};
use crate::patterns::{is_ein, is_email, is_phone, is_state, is_uei, is_zip};

/// Values in `name` must match `shape` and appear only once.
fn unique_identifiers(
    ctx: &CheckContext<'_>,
    name: &'static str,
    shape: fn(&str) -> bool,
    expected: &str,
    anchor: &str,
) -> Vec<CellError> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for (row, value) in ctx.filled_rows(name) {
        let text = if !shape(&value) {
            format!("{value} is not a valid {expected}")
        } else if !seen.insert(value.clone()) {
            format!("{value} appears more than once")
        } else {
            continue;
        };
        errors.push(ctx.error_at(name, row, text, anchor));
    }
    errors
}

pub fn additional_ueis(ctx: &CheckContext<'_>) -> Vec<CellError> {
    unique_identifiers(ctx, "additional_uei", is_uei, "UEI", "uei")
}

pub fn additional_eins(ctx: &CheckContext<'_>) -> Vec<CellError> {
    unique_identifiers(ctx, "additional_ein", is_ein, "EIN (nine digits)", "ein")
}

pub fn secondary_auditors(ctx: &CheckContext<'_>) -> Vec<CellError> {
    const SHAPES: [(&str, fn(&str) -> bool, &str); 5] = [
        ("secondary_auditor_ein", is_ein, "nine digits"),
        ("secondary_auditor_address_state", is_state, "a two-letter state code"),
        ("secondary_auditor_address_zipcode", is_zip, "a five or nine digit ZIP code"),
        ("secondary_auditor_contact_phone", is_phone, "a ten digit phone number"),
        ("secondary_auditor_contact_email", is_email, "an email address"),
    ];
    let mut errors = Vec::new();
    for (name, shape, expected) in SHAPES {
        for (row, value) in ctx.filled_rows(name).filter(|(_, value)| !shape(value)) {
            errors.push(ctx.error_at(
                name,
                row,
                format!("{} must be {expected}, not {value}", label(name)),
                "secondary-auditor",
            ));
        }
    }
    errors
}
