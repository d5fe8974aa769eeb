//! Federal Awards checks.

use std::collections::{BTreeMap, BTreeSet};

use audit_model::records::{NOT_APPLICABLE, OTHER_CLUSTER, STATE_CLUSTER};
use audit_model::{CellError, YesNo};

use crate::context::{CheckContext, label};
use crate::patterns::{
    REPORT_TYPES, extension_needs_identification, is_agency_prefix, is_award_reference,
    is_extension,
};

pub fn award_references(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for (row, reference) in ctx.filled_rows("award_reference") {
        if !is_award_reference(&reference) {
            errors.push(ctx.error_at(
                "award_reference",
                row,
                format!("Award reference {reference} must look like AWARD-0001"),
                "award-reference",
            ));
        } else if !seen.insert(reference.clone()) {
            errors.push(ctx.error_at(
                "award_reference",
                row,
                format!("Award reference {reference} appears more than once"),
                "unique-award-reference",
            ));
        }
    }
    errors
}

pub fn assistance_listings(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let catalog = ctx.config.program_catalog.as_ref();
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let prefix = ctx.text("federal_agency_prefix", row);
        let extension = ctx.text("three_digit_extension", row);
        if !prefix.is_empty() && !is_agency_prefix(&prefix) {
            errors.push(ctx.error_at(
                "federal_agency_prefix",
                row,
                format!("Federal agency prefix {prefix} must be two digits"),
                "aln-prefix",
            ));
            continue;
        }
        if let Some(catalog) = catalog
            && !prefix.is_empty()
            && !catalog.has_prefix(&prefix)
        {
            errors.push(ctx.error_at(
                "federal_agency_prefix",
                row,
                format!("Federal agency prefix {prefix} is not a known agency"),
                "aln-prefix",
            ));
            continue;
        }
        if extension.is_empty() {
            continue;
        }
        if !is_extension(&extension) {
            errors.push(ctx.error_at(
                "three_digit_extension",
                row,
                format!("Extension {extension} must be three digits, RD, RD#, or U##"),
                "three-digit-extension",
            ));
            continue;
        }
        if extension_needs_identification(&extension) {
            if ctx.is_blank("additional_award_identification", row) {
                errors.push(ctx.error_at(
                    "additional_award_identification",
                    row,
                    format!("Extension {extension} requires an additional award identification"),
                    "additional-award-identification",
                ));
            }
        } else if let Some(catalog) = catalog
            && !prefix.is_empty()
            && !catalog.contains(&prefix, &extension)
        {
            errors.push(ctx.error_at(
                "three_digit_extension",
                row,
                format!("{prefix}.{extension} is not in the assistance listing catalog"),
                "three-digit-extension",
            ));
        }
    }
    errors
}

/// A value is required when `flag` is `Y` and must be empty when it is `N`.
fn required_iff_yes(
    ctx: &CheckContext<'_>,
    flag: &str,
    dependent: &str,
    anchor: &str,
) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let blank = ctx.is_blank(dependent, row);
        let text = match ctx.yes_no(flag, row) {
            Some(YesNo::Yes) if blank => format!(
                "{} is required when {} is Y",
                label(dependent),
                label(flag).to_lowercase()
            ),
            Some(YesNo::No) if !blank => format!(
                "{} must be empty when {} is N",
                label(dependent),
                label(flag).to_lowercase()
            ),
            _ => continue,
        };
        errors.push(ctx.error_at(dependent, row, text, anchor));
    }
    errors
}

pub fn audit_report_type(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = required_iff_yes(ctx, "is_major", "audit_report_type", "audit-report-type");
    for (row, report_type) in ctx.filled_rows("audit_report_type") {
        if ctx.yes_no("is_major", row) == Some(YesNo::Yes)
            && !REPORT_TYPES.contains(&report_type.as_str())
        {
            errors.push(ctx.error_at(
                "audit_report_type",
                row,
                format!("Audit report type {report_type} must be one of U, Q, A, D"),
                "audit-report-type",
            ));
        }
    }
    errors
}

pub fn subrecipient_amount(ctx: &CheckContext<'_>) -> Vec<CellError> {
    required_iff_yes(ctx, "is_passed", "subrecipient_amount", "subrecipient-amount")
}

pub fn loan_balance(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = required_iff_yes(
        ctx,
        "is_guaranteed",
        "loan_balance_at_audit_period_end",
        "loan-balance",
    );
    for (row, balance) in ctx.filled_rows("loan_balance_at_audit_period_end") {
        if balance != NOT_APPLICABLE && balance.parse::<i64>().is_err() {
            errors.push(ctx.error_at(
                "loan_balance_at_audit_period_end",
                row,
                format!("Loan balance {balance} must be a whole number or N/A"),
                "loan-balance",
            ));
        }
    }
    errors
}

/// Passthrough names are required for indirect awards, forbidden for direct
/// ones, and must pair up with identifying numbers.
pub fn passthrough(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let names = ctx.text("passthrough_name", row);
        let text = match ctx.yes_no("is_direct", row) {
            Some(YesNo::No) if names.is_empty() => {
                "Passthrough name is required for indirect awards".to_string()
            }
            Some(YesNo::Yes) if !names.is_empty() => {
                "Passthrough name must be empty for direct awards".to_string()
            }
            _ => {
                let numbers = ctx.text("passthrough_identifying_number", row);
                if names.is_empty() || numbers.is_empty() {
                    continue;
                }
                let name_count = names.split('|').count();
                let number_count = numbers.split('|').count();
                if name_count == number_count {
                    continue;
                }
                errors.push(ctx.error_at(
                    "passthrough_identifying_number",
                    row,
                    format!(
                        "{name_count} passthrough names but {number_count} identifying numbers"
                    ),
                    "passthrough",
                ));
                continue;
            }
        };
        errors.push(ctx.error_at("passthrough_name", row, text, "passthrough"));
    }
    errors
}

/// `STATE CLUSTER` and `OTHER CLUSTER NOT LISTED ABOVE` each need their
/// companion name, and the companions must be empty for any other cluster.
pub fn cluster_names(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for row in 0..ctx.row_count() {
        let cluster = ctx.text("cluster_name", row);
        for (sentinel, companion) in [
            (STATE_CLUSTER, "state_cluster_name"),
            (OTHER_CLUSTER, "other_cluster_name"),
        ] {
            let blank = ctx.is_blank(companion, row);
            let text = if cluster == sentinel && blank {
                format!("{} is required when the cluster is {sentinel}", label(companion))
            } else if cluster != sentinel && !blank {
                format!("{} must be empty unless the cluster is {sentinel}", label(companion))
            } else {
                continue;
            };
            errors.push(ctx.error_at(companion, row, text, "cluster-name"));
        }
    }
    errors
}

fn amount(ctx: &CheckContext<'_>, row: usize) -> Option<i64> {
    ctx.values("amount_expended")
        .get(row)
        .and_then(|value| value.as_integer())
}

/// Sum of amounts per key; `None` when a key's sum does not fit in `i64`.
fn sums_by(
    ctx: &CheckContext<'_>,
    key: impl Fn(usize) -> Option<String>,
) -> BTreeMap<String, Option<i64>> {
    let mut sums: BTreeMap<String, Option<i64>> = BTreeMap::new();
    for row in 0..ctx.row_count() {
        if let (Some(key), Some(amount)) = (key(row), amount(ctx, row)) {
            let sum = sums.entry(key).or_insert(Some(0));
            *sum = sum.and_then(|total| total.checked_add(amount));
        }
    }
    sums
}

fn compare_total(
    ctx: &CheckContext<'_>,
    range: &str,
    row: usize,
    expected: Option<i64>,
    anchor: &str,
) -> Option<CellError> {
    let Some(expected) = expected else {
        return Some(ctx.error_at(
            range,
            row,
            format!(
                "The amounts expended behind {} add up to more than {}",
                label(range),
                i64::MAX
            ),
            anchor,
        ));
    };
    let found = ctx.values(range).get(row).and_then(|value| value.as_integer())?;
    (found != expected).then(|| {
        ctx.error_at(
            range,
            row,
            format!("{} is {found}, but the amounts expended add up to {expected}", label(range)),
            anchor,
        )
    })
}

pub fn program_totals(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let key = |row: usize| {
        let prefix = ctx.text("federal_agency_prefix", row);
        let extension = ctx.text("three_digit_extension", row);
        (!prefix.is_empty() && !extension.is_empty()).then(|| format!("{prefix}.{extension}"))
    };
    let sums = sums_by(ctx, key);
    (0..ctx.row_count())
        .filter_map(|row| {
            let expected = key(row).and_then(|aln| sums.get(&aln).copied())?;
            compare_total(ctx, "federal_program_total", row, expected, "federal-program-total")
        })
        .collect()
}

pub fn cluster_totals(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let key = |row: usize| {
        let cluster = ctx.text("cluster_name", row);
        let key = match cluster.as_str() {
            "" | NOT_APPLICABLE => return None,
            STATE_CLUSTER => format!("{STATE_CLUSTER}:{}", ctx.text("state_cluster_name", row)),
            OTHER_CLUSTER => format!("{OTHER_CLUSTER}:{}", ctx.text("other_cluster_name", row)),
            _ => cluster,
        };
        Some(key.to_ascii_uppercase())
    };
    let sums = sums_by(ctx, key);
    (0..ctx.row_count())
        .filter(|row| !ctx.is_blank("award_reference", *row))
        .filter_map(|row| {
            let expected = match key(row) {
                Some(cluster) => sums.get(&cluster).copied().unwrap_or(Some(0)),
                None => Some(0),
            };
            compare_total(ctx, "cluster_total", row, expected, "cluster-total")
        })
        .collect()
}

pub fn total_amount_expended(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let Some(found) = ctx.ir.scalar("total_amount_expended").and_then(|v| v.as_integer()) else {
        return Vec::new();
    };
    let expected = (0..ctx.row_count())
        .filter_map(|row| amount(ctx, row))
        .try_fold(0i64, i64::checked_add);
    let message = match expected {
        Some(expected) if expected == found => return Vec::new(),
        Some(expected) => format!(
            "Total amount expended is {found}, but the amounts expended add up to {expected}"
        ),
        None => format!("The amounts expended add up to more than {}", i64::MAX),
    };
    vec![ctx.field_error("total_amount_expended", message, "total-amount-expended")]
}

pub fn findings_count(ctx: &CheckContext<'_>) -> Vec<CellError> {
    ctx.values("number_of_audit_findings")
        .iter()
        .enumerate()
        .filter_map(|(row, value)| value.as_integer().filter(|n| *n < 0).map(|n| (row, n)))
        .map(|(row, count)| {
            ctx.error_at(
                "number_of_audit_findings",
                row,
                format!("Number of audit findings cannot be negative ({count})"),
                "whole-number",
            )
        })
        .collect()
}
