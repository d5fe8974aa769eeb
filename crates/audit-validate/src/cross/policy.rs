//! Submission-level policy rules.

use audit_model::AuditPeriod;

use super::{CrossContext, join_list};

/// Only one disseminated report may exist per `(audit year, UEI)`. The report
/// being replaced by a resubmission does not count.
pub fn duplicate_submission(ctx: &CrossContext<'_>) -> Vec<String> {
    let submission = ctx.submission;
    let Some(general) = &submission.sections.general_information else {
        return Vec::new();
    };
    let audit_year = general.audit_year();
    let own = submission.metadata.report_id.as_str();
    let replaced = submission.metadata.resubmission_of.as_deref();
    let others: Vec<String> = ctx
        .history
        .disseminated_reports(general.auditee_uei.trim(), audit_year)
        .into_iter()
        .filter(|report| report != own && Some(report.as_str()) != replaced)
        .collect();
    if others.is_empty() {
        return Vec::new();
    }
    vec![format!(
        "A report for UEI {} and audit year {audit_year} has already been disseminated ({})",
        general.auditee_uei,
        join_list(&others)
    )]
}

/// Total expenditure, counting reimbursements and loan balances by their
/// absolute value, must reach the threshold of the fiscal period's bracket.
pub fn expenditure_threshold(ctx: &CrossContext<'_>) -> Vec<String> {
    let sections = &ctx.submission.sections;
    let (Some(general), Some(awards)) = (&sections.general_information, &sections.federal_awards)
    else {
        return Vec::new();
    };
    let Some(bracket) = ctx.thresholds.bracket_for(general.fy_start_date) else {
        return Vec::new();
    };
    let total: u128 = awards
        .federal_awards
        .iter()
        .map(|award| {
            u128::from(award.program.amount_expended.unsigned_abs())
                + u128::from(award.loan_or_loan_guarantee.balance().map_or(0, i64::unsigned_abs))
        })
        .sum();
    if total >= u128::try_from(bracket.minimum).unwrap_or(0) {
        return Vec::new();
    }
    vec![format!(
        "Total federal expenditure of ${total} is below the ${} threshold for fiscal periods starting {}",
        bracket.minimum, general.fy_start_date
    )]
}

pub fn certifying_contacts(ctx: &CrossContext<'_>) -> Vec<String> {
    let metadata = &ctx.submission.metadata;
    let (Some(auditee), Some(auditor)) = (
        metadata.auditee_certifying_email.as_deref().map(str::trim),
        metadata.auditor_certifying_email.as_deref().map(str::trim),
    ) else {
        return Vec::new();
    };
    if auditee.is_empty() || !auditee.eq_ignore_ascii_case(auditor) {
        return Vec::new();
    }
    vec![format!(
        "The auditee and auditor certifying contacts must be different people, both are {auditee}"
    )]
}

pub fn biennial_low_risk(ctx: &CrossContext<'_>) -> Vec<String> {
    match &ctx.submission.sections.general_information {
        Some(general)
            if general.audit_period_covered == AuditPeriod::Biennial
                && general.is_low_risk_auditee =>
        {
            vec!["A biennial audit cannot be submitted by a low-risk auditee".to_string()]
        }
        _ => Vec::new(),
    }
}
