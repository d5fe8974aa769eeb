//! Checks shared by every section.

use audit_model::{CellError, MIGRATION_SENTINEL, YesNo, parse_date};
use audit_standards::{AUDITEE_UEI_RANGE, RangeMapping, ValueKind};

use crate::context::{CheckContext, label};
use crate::patterns::is_uei;

fn mappings<'t>(ctx: &CheckContext<'t>) -> impl Iterator<Item = (&'t RangeMapping, bool)> {
    let template = ctx.template;
    template
        .fields
        .iter()
        .map(|field| (field, true))
        .chain(template.columns.iter().map(|column| (column, false)))
}

pub fn migration_sentinel(ctx: &CheckContext<'_>) -> Vec<CellError> {
    if ctx.is_migration {
        return Vec::new();
    }
    let mut errors = Vec::new();
    let mut names: Vec<&str> = ctx.template.fields.iter().map(|f| f.range).collect();
    names.extend(ctx.template.column_ranges());
    for name in names {
        for (row, value) in ctx.values(name).iter().enumerate() {
            if value.to_text().trim() == MIGRATION_SENTINEL {
                errors.push(ctx.error_at(
                    name,
                    row,
                    format!("{MIGRATION_SENTINEL} is only permitted in migrated submissions"),
                    "migration-sentinel",
                ));
            }
        }
    }
    errors
}

pub fn auditee_uei_shape(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let uei = ctx.field(AUDITEE_UEI_RANGE);
    if uei.is_empty() || is_uei(&uei) || uei == MIGRATION_SENTINEL {
        return Vec::new();
    }
    vec![ctx.field_error(
        AUDITEE_UEI_RANGE,
        format!("Auditee UEI {uei} is not a valid UEI"),
        "uei",
    )]
}

pub fn required(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let rows = ctx.row_count();
    let mut errors = Vec::new();
    for (mapping, is_field) in mappings(ctx).filter(|(m, _)| m.required) {
        let name = mapping.range;
        if is_field {
            if ctx.field(name).is_empty() {
                errors.push(ctx.field_error(
                    name,
                    format!("{} is required", label(name)),
                    "required",
                ));
            }
            continue;
        }
        for row in (0..rows).filter(|row| ctx.is_blank(name, *row)) {
            errors.push(ctx.error_at(
                name,
                row,
                format!("{} is required", label(name)),
                "required",
            ));
        }
    }
    errors
}

/// Y/N answers must be exactly `Y` or `N` (or the sentinel for migrations).
pub fn yes_no(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for (mapping, is_field) in mappings(ctx) {
        let allow_migration = ctx.is_migration && mapping.kind == ValueKind::YesNo;
        if !matches!(mapping.kind, ValueKind::YesNo | ValueKind::Flag) {
            continue;
        }
        let name = mapping.range;
        let message = |text: &str| format!("{} must be Y or N, not {text}", label(name));
        // A stray sentinel is already reported by `migration_sentinel`.
        let invalid = |text: &str| {
            !text.is_empty()
                && YesNo::parse(text, allow_migration).is_none()
                && (ctx.is_migration || text != MIGRATION_SENTINEL)
        };
        if is_field {
            let text = ctx.field(name);
            if invalid(&text) {
                errors.push(ctx.field_error(name, message(&text), "yes-no"));
            }
            continue;
        }
        for row in 0..ctx.values(name).len() {
            let text = ctx.text(name, row);
            if invalid(&text) {
                errors.push(ctx.error_at(name, row, message(&text), "yes-no"));
            }
        }
    }
    errors
}

pub fn whole_numbers(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for (mapping, is_field) in mappings(ctx).filter(|(m, _)| m.kind == ValueKind::Integer) {
        let name = mapping.range;
        let message = |text: &str| format!("{} must be a whole number, not {text}", label(name));
        if is_field {
            let value = ctx.ir.scalar(name);
            if let Some(value) = value.filter(|v| !v.is_empty() && v.as_integer().is_none()) {
                errors.push(ctx.field_error(name, message(&value.to_text()), "whole-number"));
            }
            continue;
        }
        for (row, value) in ctx.values(name).iter().enumerate() {
            if !value.is_empty() && value.as_integer().is_none() {
                errors.push(ctx.error_at(name, row, message(&value.to_text()), "whole-number"));
            }
        }
    }
    errors
}

pub fn dates(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    let date_fields = mappings(ctx).filter(|(m, is_field)| *is_field && m.kind == ValueKind::Date);
    for (mapping, _) in date_fields {
        let text = ctx.field(mapping.range);
        if !text.is_empty() && parse_date(&text).is_none() {
            errors.push(ctx.field_error(
                mapping.range,
                format!("{} must be a date, not {text}", label(mapping.range)),
                "date",
            ));
        }
    }
    errors
}
