//! Entity identity and section presence.

use audit_model::SectionName;

use super::{CrossContext, join_list};
use crate::patterns::{is_ein, is_uei};

/// Every present section declares the auditee UEI of General Information
/// (or of the first present section when it is absent).
pub fn uei_consistency(ctx: &CrossContext<'_>) -> Vec<String> {
    let declared = ctx.submission.sections.declared_ueis();
    let Some((reference_section, reference)) = declared.first().copied() else {
        return Vec::new();
    };
    declared
        .iter()
        .skip(1)
        .filter(|(_, uei)| !uei.trim().eq_ignore_ascii_case(reference.trim()))
        .map(|(section, uei)| {
            format!(
                "{section} declares UEI {uei}, but {reference_section} declares {reference}"
            )
        })
        .collect()
}

/// Shared shape of the multiple-UEI and multiple-EIN rules: the answer and
/// the list must agree, and the primary identifier is never listed.
fn additional_identifiers(
    kind: &str,
    covered: bool,
    primary: &str,
    listed: &[&str],
) -> Vec<String> {
    let mut messages = Vec::new();
    if covered && listed.is_empty() {
        messages.push(format!(
            "General Information says multiple {kind}s are covered, but no additional {kind}s were listed"
        ));
    }
    if !covered && !listed.is_empty() {
        messages.push(format!(
            "Additional {kind}s were listed, but General Information says only one {kind} is covered"
        ));
    }
    if !primary.is_empty() && listed.iter().any(|id| id.trim().eq_ignore_ascii_case(primary)) {
        messages.push(format!(
            "The auditee {kind} {primary} must not be listed as an additional {kind}"
        ));
    }
    messages
}

pub fn additional_ueis(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let Some(general) = &sections.general_information else {
        return Vec::new();
    };
    let listed: Vec<&str> = sections
        .additional_ueis
        .iter()
        .flat_map(|section| &section.additional_ueis_entries)
        .map(|entry| entry.additional_uei.as_str())
        .collect();
    additional_identifiers(
        "UEI",
        general.multiple_ueis_covered,
        general.auditee_uei.trim(),
        &listed,
    )
}

pub fn additional_eins(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let Some(general) = &sections.general_information else {
        return Vec::new();
    };
    let listed: Vec<&str> = sections
        .additional_eins
        .iter()
        .flat_map(|section| &section.additional_eins_entries)
        .map(|entry| entry.additional_ein.as_str())
        .collect();
    additional_identifiers(
        "EIN",
        general.multiple_eins_covered,
        general.auditee_ein.trim(),
        &listed,
    )
}

pub fn secondary_auditors(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let Some(general) = &sections.general_information else {
        return Vec::new();
    };
    let listed = sections
        .secondary_auditors
        .as_ref()
        .is_some_and(|section| !section.secondary_auditors_entries.is_empty());
    match (general.secondary_auditors_exist, listed) {
        (true, false) => vec![
            "General Information says secondary auditors exist, but none were listed".to_string(),
        ],
        (false, true) => vec![
            "Secondary auditors were listed, but General Information says there are none"
                .to_string(),
        ],
        _ => Vec::new(),
    }
}

/// General Information, Federal Awards and Notes to SEFA are always needed;
/// the finding sections are needed once any award reports findings.
pub fn section_completeness(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let mut missing = Vec::new();
    if sections.general_information.is_none() {
        missing.push(SectionName::GeneralInformation);
    }
    if sections.federal_awards.is_none() {
        missing.push(SectionName::FederalAwards);
    }
    if sections.notes_to_sefa.is_none() {
        missing.push(SectionName::NotesToSefa);
    }
    let has_findings = sections.federal_awards.as_ref().is_some_and(|awards| {
        awards
            .federal_awards
            .iter()
            .any(|award| award.program.number_of_audit_findings > 0)
    });
    if has_findings {
        if sections.findings_uniform_guidance.is_none() {
            missing.push(SectionName::FindingsUniformGuidance);
        }
        if sections.findings_text.is_none() {
            missing.push(SectionName::FindingsText);
        }
        if sections.corrective_action_plan.is_none() {
            missing.push(SectionName::CorrectiveActionPlan);
        }
    }
    if missing.is_empty() {
        return Vec::new();
    }
    let names: Vec<&str> = missing.iter().map(SectionName::display_name).collect();
    let noun = if names.len() == 1 { "section is" } else { "sections are" };
    vec![format!("The {} {noun} required but missing", join_list(&names))]
}

pub fn general_information(ctx: &CrossContext<'_>) -> Vec<String> {
    let Some(general) = &ctx.submission.sections.general_information else {
        return Vec::new();
    };
    let mut messages = Vec::new();
    if !is_uei(general.auditee_uei.trim()) {
        messages.push(format!("Auditee UEI {} is not a valid UEI", general.auditee_uei));
    }
    if !is_ein(general.auditee_ein.trim()) {
        messages.push(format!("Auditee EIN {} must be nine digits", general.auditee_ein));
    }
    if general.fy_end_date <= general.fy_start_date {
        messages.push(format!(
            "Fiscal period end {} must be after its start {}",
            general.fy_end_date, general.fy_start_date
        ));
    }
    messages
}
