//! Consistency between awards, findings and their narratives.

use std::collections::{BTreeMap, BTreeSet};

use audit_model::YesNo;
use audit_model::records::FindingEntry;

use super::{CrossContext, join_list};
use crate::patterns::{award_reference_digits, reference_year};

fn findings<'a>(ctx: &CrossContext<'a>) -> &'a [FindingEntry] {
    ctx.submission
        .sections
        .findings_uniform_guidance
        .as_ref()
        .map(|section| section.findings_uniform_guidance_entries.as_slice())
        .unwrap_or_default()
}

/// Left-pad the numeric suffix of an award reference to `width` digits.
/// References of another shape are returned unchanged.
pub(crate) fn pad_award_reference(reference: &str, width: usize) -> String {
    match award_reference_digits(reference) {
        Some(digits) => format!("AWARD-{digits:0>width$}"),
        None => reference.trim().to_string(),
    }
}

fn digit_width(reference: &str) -> usize {
    award_reference_digits(reference).map_or(0, str::len)
}

/// Widest award reference suffix across Federal Awards and Findings.
fn reference_width(ctx: &CrossContext<'_>) -> usize {
    let awards = ctx
        .submission
        .sections
        .federal_awards
        .iter()
        .flat_map(|section| &section.federal_awards)
        .map(|award| digit_width(&award.award_reference));
    findings(ctx)
        .iter()
        .map(|finding| digit_width(finding.award_reference()))
        .chain(awards)
        .max()
        .unwrap_or(0)
}

pub fn award_reference_declaration(ctx: &CrossContext<'_>) -> Vec<String> {
    let Some(awards) = &ctx.submission.sections.federal_awards else {
        return Vec::new();
    };
    let width = reference_width(ctx);
    let declared: BTreeSet<String> = awards
        .federal_awards
        .iter()
        .map(|award| pad_award_reference(&award.award_reference, width))
        .collect();
    let undeclared: BTreeSet<&str> = findings(ctx)
        .iter()
        .map(|finding| finding.award_reference().trim())
        .filter(|reference| !declared.contains(&pad_award_reference(reference, width)))
        .collect();
    if undeclared.is_empty() {
        return Vec::new();
    }
    let listed: Vec<&str> = undeclared.into_iter().collect();
    let (noun, verb) = if listed.len() == 1 {
        ("award", "is")
    } else {
        ("awards", "are")
    };
    vec![format!(
        "Findings cite {noun} {}, which {verb} not declared in Federal Awards",
        join_list(&listed)
    )]
}

/// A finding reference number appears at most once per award.
pub fn finding_reference_uniqueness(ctx: &CrossContext<'_>) -> Vec<String> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for finding in findings(ctx) {
        *counts
            .entry((finding.award_reference().trim(), finding.reference_number().trim()))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((award, reference), count)| {
            format!("Finding {reference} is reported {count} times for {award}")
        })
        .collect()
}

/// Declared per-award finding counts equal the findings listed for the award.
///
/// Workbook versions pad award references to different widths, so both sides
/// are padded to the widest reference before they are compared.
pub fn findings_count_consistency(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let (Some(awards), Some(_)) = (&sections.federal_awards, &sections.findings_uniform_guidance)
    else {
        return Vec::new();
    };
    let width = reference_width(ctx);
    let mut counted: BTreeMap<String, i64> = BTreeMap::new();
    for finding in findings(ctx) {
        *counted
            .entry(pad_award_reference(finding.award_reference(), width))
            .or_default() += 1;
    }
    awards
        .federal_awards
        .iter()
        .filter_map(|award| {
            let declared = award.program.number_of_audit_findings;
            let found = counted
                .get(&pad_award_reference(&award.award_reference, width))
                .copied()
                .unwrap_or(0);
            (declared != found).then(|| {
                format!(
                    "Federal Awards declares {declared} finding(s) for {}, but Findings lists {found}",
                    award.award_reference
                )
            })
        })
        .collect()
}

/// Prior references of repeat findings exist in the auditee's earlier
/// submissions. References from before the exemption year are not checked.
pub fn prior_references(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let Some(section) = &sections.findings_uniform_guidance else {
        return Vec::new();
    };
    let exempt_before = ctx.thresholds.prior_reference_exempt_before;
    let audit_year = sections
        .general_information
        .as_ref()
        .map(|general| general.audit_year());
    let mut known: Option<BTreeSet<String>> = None;
    let mut messages = Vec::new();
    for finding in &section.findings_uniform_guidance_entries {
        if finding.findings.repeat_prior_reference != YesNo::Yes {
            continue;
        }
        for reference in finding.prior_references() {
            if reference_year(&reference).is_none_or(|year| year < exempt_before) {
                continue;
            }
            let earlier = known.get_or_insert_with(|| {
                ctx.history
                    .prior_finding_references(section.auditee_uei.trim(), audit_year)
            });
            if !earlier.contains(&reference) {
                messages.push(format!(
                    "Finding {} for {} cites prior finding {reference}, which is not in any \
                     earlier submission for UEI {}",
                    finding.reference_number(),
                    finding.award_reference(),
                    section.auditee_uei.trim()
                ));
            }
        }
    }
    messages
}

/// Two sets of reference numbers must agree. `other` is the narrative
/// section; its absence is reported by section completeness instead.
fn references_agree(
    ctx: &CrossContext<'_>,
    other: &str,
    listed: Option<Vec<&str>>,
) -> Vec<String> {
    let Some(listed) = listed else {
        return Vec::new();
    };
    let findings: BTreeSet<&str> = findings(ctx)
        .iter()
        .map(|finding| finding.reference_number().trim())
        .collect();
    let listed: BTreeSet<&str> = listed.into_iter().map(str::trim).collect();
    let mut messages = Vec::new();
    let without: Vec<&str> = findings.difference(&listed).copied().collect();
    if !without.is_empty() {
        messages.push(format!("{other} is missing finding(s) {}", join_list(&without)));
    }
    let unknown: Vec<&str> = listed.difference(&findings).copied().collect();
    if !unknown.is_empty() {
        messages.push(format!(
            "{other} lists {}, which {} not reported in Findings",
            join_list(&unknown),
            if unknown.len() == 1 { "is" } else { "are" }
        ));
    }
    messages
}

pub fn corrective_action_plan_references(ctx: &CrossContext<'_>) -> Vec<String> {
    let listed = ctx
        .submission
        .sections
        .corrective_action_plan
        .as_ref()
        .map(|section| {
            section
                .corrective_action_plan_entries
                .iter()
                .map(|entry| entry.reference_number.as_str())
                .collect()
        });
    references_agree(ctx, "The Corrective Action Plan", listed)
}

pub fn findings_text_references(ctx: &CrossContext<'_>) -> Vec<String> {
    let listed = ctx.submission.sections.findings_text.as_ref().map(|section| {
        section
            .findings_text_entries
            .iter()
            .map(|entry| entry.reference_number.as_str())
            .collect()
    });
    references_agree(ctx, "Findings Text", listed)
}

#[cfg(test)]
mod tests {
    use super::pad_award_reference;

    #[test]
    fn award_references_pad_to_the_requested_width() {
        assert_eq!(pad_award_reference("AWARD-1", 4), "AWARD-0001");
        assert_eq!(pad_award_reference("AWARD-00012", 4), "AWARD-00012");
        assert_eq!(pad_award_reference("award 7", 4), "award 7");
    }
}
