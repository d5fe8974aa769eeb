//! General Information and Notes to SEFA checks.

use audit_model::{CellError, DeMinimisRate, parse_date};

use crate::context::{CheckContext, label};
use crate::patterns::is_ein;

const AUDIT_TYPES: [&str; 2] = ["single-audit", "program-specific"];
const AUDIT_PERIODS: [&str; 3] = ["annual", "biennial", "other"];

pub fn auditee_ein(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let ein = ctx.field("auditee_ein");
    if ein.is_empty() || is_ein(&ein) {
        return Vec::new();
    }
    vec![ctx.field_error(
        "auditee_ein",
        format!("Auditee EIN {ein} must be nine digits"),
        "ein",
    )]
}

pub fn audit_type_and_period(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for (name, allowed) in [
        ("audit_type", &AUDIT_TYPES[..]),
        ("audit_period_covered", &AUDIT_PERIODS[..]),
    ] {
        let value = ctx.field(name);
        if !value.is_empty() && !allowed.contains(&value.as_str()) {
            errors.push(ctx.field_error(
                name,
                format!("{} must be one of {}, not {value}", label(name), allowed.join(", ")),
                "fiscal-period",
            ));
        }
    }
    errors
}

/// The fiscal period must end after it starts.
pub fn fiscal_period(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let start = parse_date(&ctx.field("fy_start_date"));
    let end = parse_date(&ctx.field("fy_end_date"));
    match (start, end) {
        (Some(start), Some(end)) if end <= start => vec![ctx.field_error(
            "fy_end_date",
            format!("Fiscal period end {end} must be after its start {start}"),
            "fiscal-period",
        )],
        _ => Vec::new(),
    }
}

pub fn de_minimis_rate(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let answer = ctx.field("is_minimis_rate_used");
    if answer.is_empty() || DeMinimisRate::parse(&answer, ctx.is_migration).is_some() {
        return Vec::new();
    }
    vec![ctx.field_error(
        "is_minimis_rate_used",
        format!("De minimis rate answer must be Y, N, or Both, not {answer}"),
        "de-minimis-rate",
    )]
}

/// A note needs both a title and content.
pub fn note_pairs(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let title_blank = ctx.is_blank("note_title", row);
        let content_blank = ctx.is_blank("note_content", row);
        let missing = match (title_blank, content_blank) {
            (true, false) => "note_title",
            (false, true) => "note_content",
            _ => continue,
        };
        errors.push(ctx.error_at(
            missing,
            row,
            "A note needs both a title and content",
            "required",
        ));
    }
    errors
}
