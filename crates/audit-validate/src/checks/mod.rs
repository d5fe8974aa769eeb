//! Accumulating check modules.
//!
//! Every check reads the transformed IR and returns the cell errors it finds.
//! The general group runs first, then the group for the workbook's section.

mod awards;
mod entities;
mod findings;
pub mod general;
mod general_info;

use audit_model::{CellError, SectionName};
use tracing::trace;

use crate::context::CheckContext;

/// An accumulating check.
pub type Check = fn(&CheckContext<'_>) -> Vec<CellError>;

static GENERAL: [(&str, Check); 6] = [
    ("migration_sentinel", general::migration_sentinel),
    ("auditee_uei_shape", general::auditee_uei_shape),
    ("required", general::required),
    ("yes_no", general::yes_no),
    ("whole_numbers", general::whole_numbers),
    ("dates", general::dates),
];

static GENERAL_INFORMATION: [(&str, Check); 3] = [
    ("auditee_ein", general_info::auditee_ein),
    ("audit_type_and_period", general_info::audit_type_and_period),
    ("fiscal_period", general_info::fiscal_period),
];

static FEDERAL_AWARDS: [(&str, Check); 11] = [
    ("award_references", awards::award_references),
    ("assistance_listings", awards::assistance_listings),
    ("audit_report_type", awards::audit_report_type),
    ("subrecipient_amount", awards::subrecipient_amount),
    ("loan_balance", awards::loan_balance),
    ("passthrough", awards::passthrough),
    ("cluster_names", awards::cluster_names),
    ("program_totals", awards::program_totals),
    ("cluster_totals", awards::cluster_totals),
    ("total_amount_expended", awards::total_amount_expended),
    ("findings_count", awards::findings_count),
];

static FINDINGS: [(&str, Check); 5] = [
    ("award_references", findings::award_references),
    ("reference_numbers", findings::reference_numbers),
    ("compliance_requirements", findings::compliance_requirements),
    ("finding_grid", findings::finding_grid),
    ("prior_references", findings::prior_references),
];

static FINDING_NARRATIVES: [(&str, Check); 2] = [
    ("reference_numbers", findings::reference_numbers),
    ("unique_reference_numbers", findings::unique_reference_numbers),
];

static ADDITIONAL_UEIS: [(&str, Check); 1] = [("additional_ueis", entities::additional_ueis)];
static ADDITIONAL_EINS: [(&str, Check); 1] = [("additional_eins", entities::additional_eins)];
static SECONDARY_AUDITORS: [(&str, Check); 1] =
    [("secondary_auditors", entities::secondary_auditors)];

static NOTES_TO_SEFA: [(&str, Check); 2] = [
    ("de_minimis_rate", general_info::de_minimis_rate),
    ("note_pairs", general_info::note_pairs),
];

fn section_checks(section: SectionName) -> &'static [(&'static str, Check)] {
    match section {
        SectionName::GeneralInformation => &GENERAL_INFORMATION,
        SectionName::FederalAwards => &FEDERAL_AWARDS,
        SectionName::FindingsUniformGuidance => &FINDINGS,
        SectionName::FindingsText | SectionName::CorrectiveActionPlan => &FINDING_NARRATIVES,
        SectionName::AdditionalUeis => &ADDITIONAL_UEIS,
        SectionName::AdditionalEins => &ADDITIONAL_EINS,
        SectionName::SecondaryAuditors => &SECONDARY_AUDITORS,
        SectionName::NotesToSefa => &NOTES_TO_SEFA,
    }
}

/// Names of the checks that run for a section, in order.
pub fn check_names(section: SectionName) -> impl Iterator<Item = &'static str> {
    GENERAL
        .iter()
        .chain(section_checks(section))
        .map(|(name, _)| *name)
}

/// Run every check for the context's section and concatenate the errors.
pub fn run_all(ctx: &CheckContext<'_>) -> Vec<CellError> {
    let mut errors = Vec::new();
    for (name, check) in GENERAL.iter().chain(section_checks(ctx.template.section)) {
        let found = check(ctx);
        trace!(check = name, errors = found.len(), "check finished");
        errors.extend(found);
    }
    errors
}
