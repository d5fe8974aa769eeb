//! Per-section transforms.

use std::collections::BTreeMap;

use audit_model::records::{NOT_APPLICABLE, OTHER_CLUSTER, STATE_CLUSTER};
use audit_model::{CellValue, WorkbookIr};
use audit_standards::SectionTemplate;

use crate::columns::{column, fill_blanks, is_blank, text_at};

/// Rows that carry an award reference.
fn award_rows(ir: &WorkbookIr) -> Vec<bool> {
    let references = column(ir, "award_reference");
    (0..references.len())
        .map(|row| !is_blank(&references, row))
        .collect()
}

pub fn default_findings_count(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    let rows = award_rows(&ir);
    fill_blanks(&mut ir, "number_of_audit_findings", |row| {
        rows.get(row)
            .copied()
            .unwrap_or(false)
            .then_some(CellValue::Integer(0))
    });
    ir
}

pub fn default_cluster_name(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    let rows = award_rows(&ir);
    fill_blanks(&mut ir, "cluster_name", |row| {
        rows.get(row)
            .copied()
            .unwrap_or(false)
            .then(|| CellValue::text(NOT_APPLICABLE))
    });
    ir
}

/// Sum `amount_expended` by a per-row key; rows without a key or a whole
/// amount do not contribute. A key whose sum does not fit in `i64` maps to
/// `None` and its total is left for the checks to report.
fn sums_by(
    ir: &WorkbookIr,
    key: impl Fn(usize) -> Option<String>,
) -> BTreeMap<String, Option<i64>> {
    let amounts = column(ir, "amount_expended");
    let mut sums: BTreeMap<String, Option<i64>> = BTreeMap::new();
    for (row, amount) in amounts.iter().enumerate() {
        let (Some(key), Some(amount)) = (key(row), amount.as_integer()) else {
            continue;
        };
        let sum = sums.entry(key).or_insert(Some(0));
        *sum = sum.and_then(|total| total.checked_add(amount));
    }
    sums
}

/// Assistance listing of each row, `prefix.extension`.
fn aln_keys(ir: &WorkbookIr) -> impl Fn(usize) -> Option<String> + use<> {
    let prefixes = column(ir, "federal_agency_prefix");
    let extensions = column(ir, "three_digit_extension");
    move |row| {
        let prefix = text_at(&prefixes, row);
        let extension = text_at(&extensions, row);
        (!prefix.is_empty() && !extension.is_empty()).then(|| format!("{prefix}.{extension}"))
    }
}

/// Cluster a row belongs to, `None` when it is not clustered.
fn cluster_keys(ir: &WorkbookIr) -> impl Fn(usize) -> Option<String> + use<> {
    let names = column(ir, "cluster_name");
    let state = column(ir, "state_cluster_name");
    let other = column(ir, "other_cluster_name");
    move |row| {
        let name = text_at(&names, row);
        let key = match name.as_str() {
            "" | NOT_APPLICABLE => return None,
            STATE_CLUSTER => format!("{STATE_CLUSTER}:{}", text_at(&state, row)),
            OTHER_CLUSTER => format!("{OTHER_CLUSTER}:{}", text_at(&other, row)),
            _ => name,
        };
        Some(key.to_ascii_uppercase())
    }
}

pub fn default_program_total(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    let key = aln_keys(&ir);
    let sums = sums_by(&ir, &key);
    fill_blanks(&mut ir, "federal_program_total", |row| {
        key(row)
            .and_then(|aln| sums.get(&aln).copied().flatten())
            .map(CellValue::Integer)
    });
    ir
}

pub fn default_cluster_total(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    let rows = award_rows(&ir);
    let key = cluster_keys(&ir);
    let sums = sums_by(&ir, &key);
    fill_blanks(&mut ir, "cluster_total", |row| {
        if !rows.get(row).copied().unwrap_or(false) {
            return None;
        }
        let total = match key(row) {
            Some(cluster) => sums.get(&cluster).copied().flatten()?,
            None => 0,
        };
        Some(CellValue::Integer(total))
    });
    ir
}

pub fn default_prior_references(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    let repeats = column(&ir, "repeat_prior_reference");
    fill_blanks(&mut ir, "prior_references", |row| {
        (text_at(&repeats, row) == "N").then(|| CellValue::text(NOT_APPLICABLE))
    });
    ir
}

/// Replace `seq_number` with 1..N over the rows that hold a note, and cut
/// every note column to those rows.
pub fn renumber_notes(mut ir: WorkbookIr, template: &SectionTemplate) -> WorkbookIr {
    let titles = column(&ir, "note_title");
    let contents = column(&ir, "note_content");
    let rows = titles.len().max(contents.len());
    let count = (0..rows)
        .rev()
        .find(|row| !is_blank(&titles, *row) || !is_blank(&contents, *row))
        .map_or(0, |last| last + 1);

    for name in template.column_ranges() {
        let Some(range) = ir.range_mut(name) else {
            continue;
        };
        let mut values = std::mem::take(&mut range.values);
        if name == "seq_number" {
            values = (1..=count as i64).map(CellValue::Integer).collect();
        } else {
            values.resize(count, CellValue::Missing);
        }
        range.set_values(values);
    }
    ir
}

/// EINs are nine digits; `12-3456789` is accepted and normalized.
pub fn strip_ein_hyphens(mut ir: WorkbookIr, _template: &SectionTemplate) -> WorkbookIr {
    for name in ["auditee_ein", "additional_ein", "secondary_auditor_ein"] {
        let Some(range) = ir.range_mut(name) else {
            continue;
        };
        for value in &mut range.values {
            if let CellValue::Text(text) = value
                && text.contains('-')
            {
                *text = text.replace('-', "");
            }
        }
    }
    ir
}
