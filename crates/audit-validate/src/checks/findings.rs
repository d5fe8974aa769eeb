//! Findings, Findings Text and Corrective Action Plan checks.

use std::collections::BTreeSet;

use audit_model::records::NOT_APPLICABLE;
use audit_model::{CellError, YesNo};

use crate::context::CheckContext;
use crate::patterns::{
    COMPLIANCE_LETTERS, is_allowed_grid, is_award_reference, is_compliance_requirement,
    is_reference_number,
};

const GRID: [&str; 5] = [
    "modified_opinion",
    "other_matters",
    "material_weakness",
    "significant_deficiency",
    "other_findings",
];

pub fn award_references(ctx: &CheckContext<'_>) -> Vec<CellError> {
    ctx.filled_rows("award_reference")
        .filter(|(_, reference)| !is_award_reference(reference))
        .map(|(row, reference)| {
            ctx.error_at(
                "award_reference",
                row,
                format!("Award reference {reference} must look like AWARD-0001"),
                "award-reference",
            )
        })
        .collect()
}

/// Reference numbers must be `YYYY-NNN`.
pub fn reference_numbers(ctx: &CheckContext<'_>) -> Vec<CellError> {
    ctx.filled_rows("reference_number")
        .filter(|(_, reference)| !is_reference_number(reference))
        .map(|(row, reference)| {
            ctx.error_at(
                "reference_number",
                row,
                format!("Reference number {reference} must look like 2023-001"),
                "reference-number",
            )
        })
        .collect()
}

/// Findings Text and the Corrective Action Plan describe each finding once.
pub fn unique_reference_numbers(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut seen = BTreeSet::new();
    ctx.filled_rows("reference_number")
        .filter(|(_, reference)| !seen.insert(reference.clone()))
        .map(|(row, reference)| {
            ctx.error_at(
                "reference_number",
                row,
                format!("Reference number {reference} appears more than once"),
                "reference-number",
            )
        })
        .collect()
}

pub fn compliance_requirements(ctx: &CheckContext<'_>) -> Vec<CellError> {
    ctx.filled_rows("compliance_requirement")
        .filter(|(_, letters)| !is_compliance_requirement(letters))
        .map(|(row, letters)| {
            ctx.error_at(
                "compliance_requirement",
                row,
                format!(
                    "Compliance requirement {letters} must use the letters \
                     {COMPLIANCE_LETTERS}, each at most once"
                ),
                "compliance-requirement",
            )
        })
        .collect()
}

/// The five classification flags must form one of the allowed combinations.
pub fn finding_grid(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let flags: Option<Vec<YesNo>> = GRID.iter().map(|name| ctx.yes_no(name, row)).collect();
        // Rows with a blank or malformed flag are reported by other checks.
        let Some(flags) = flags.and_then(|flags| <[YesNo; 5]>::try_from(flags).ok()) else {
            continue;
        };
        if !is_allowed_grid(flags) {
            let pattern: String = flags.iter().map(YesNo::as_str).collect();
            errors.push(ctx.error_at(
                GRID[0],
                row,
                format!("The combination {pattern} of finding classifications is not allowed"),
                "finding-grid",
            ));
        }
    }
    errors
}

/// Repeat findings list their prior references; others carry `N/A`.
pub fn prior_references(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let references = ctx.text("prior_references", row);
        let text = match ctx.yes_no("repeat_prior_reference", row) {
            Some(YesNo::No) if references != NOT_APPLICABLE => {
                format!("Prior references must be N/A when this is not a repeat finding, not {references}")
            }
            Some(YesNo::Yes) if references.is_empty() || references == NOT_APPLICABLE => {
                "Prior references are required for a repeat finding".to_string()
            }
            Some(YesNo::Yes) => {
                let bad: Vec<&str> = references
                    .split(',')
                    .map(str::trim)
                    .filter(|reference| !is_reference_number(reference))
                    .collect();
                if bad.is_empty() {
                    continue;
                }
                format!(
                    "Prior references must be comma separated, like 2021-001, 2022-004; \
                     could not read {}",
                    bad.join(", ")
                )
            }
            _ => continue,
        };
        errors.push(ctx.error_at("prior_references", row, text, "prior-references"));
    }
    errors
}
