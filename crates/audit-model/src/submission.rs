//! Whole-submission view consumed by cross-validation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::records::{
    AdditionalEins, AdditionalUeis, CorrectiveActionPlan, FederalAwards, FindingsText,
    FindingsUniformGuidance, GeneralInformation, NotesToSefa, SecondaryAuditors, SectionRecord,
};

/// Canonical records by section; absent sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSections {
    #[serde(default)]
    pub general_information: Option<GeneralInformation>,
    #[serde(default)]
    pub federal_awards: Option<FederalAwards>,
    #[serde(default)]
    pub findings_uniform_guidance: Option<FindingsUniformGuidance>,
    #[serde(default)]
    pub findings_text: Option<FindingsText>,
    #[serde(default)]
    pub corrective_action_plan: Option<CorrectiveActionPlan>,
    #[serde(default)]
    pub additional_ueis: Option<AdditionalUeis>,
    #[serde(default)]
    pub additional_eins: Option<AdditionalEins>,
    #[serde(default)]
    pub secondary_auditors: Option<SecondaryAuditors>,
    #[serde(default)]
    pub notes_to_sefa: Option<NotesToSefa>,
}

impl SubmissionSections {
    /// Place a record into its section slot, replacing any previous one.
    pub fn insert(&mut self, record: SectionRecord) {
        match record {
            SectionRecord::GeneralInformation(r) => self.general_information = Some(r),
            SectionRecord::FederalAwards(r) => self.federal_awards = Some(r),
            SectionRecord::FindingsUniformGuidance(r) => self.findings_uniform_guidance = Some(r),
            SectionRecord::FindingsText(r) => self.findings_text = Some(r),
            SectionRecord::CorrectiveActionPlan(r) => self.corrective_action_plan = Some(r),
            SectionRecord::AdditionalUeis(r) => self.additional_ueis = Some(r),
            SectionRecord::AdditionalEins(r) => self.additional_eins = Some(r),
            SectionRecord::SecondaryAuditors(r) => self.secondary_auditors = Some(r),
            SectionRecord::NotesToSefa(r) => self.notes_to_sefa = Some(r),
        }
    }

    /// `(section, declared UEI)` for every present section, in section order.
    pub fn declared_ueis(&self) -> Vec<(crate::SectionName, &str)> {
        use crate::SectionName as S;
        let mut out = Vec::new();
        if let Some(r) = &self.general_information {
            out.push((S::GeneralInformation, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.federal_awards {
            out.push((S::FederalAwards, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.findings_uniform_guidance {
            out.push((S::FindingsUniformGuidance, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.findings_text {
            out.push((S::FindingsText, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.corrective_action_plan {
            out.push((S::CorrectiveActionPlan, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.additional_ueis {
            out.push((S::AdditionalUeis, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.additional_eins {
            out.push((S::AdditionalEins, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.secondary_auditors {
            out.push((S::SecondaryAuditors, r.auditee_uei.as_str()));
        }
        if let Some(r) = &self.notes_to_sefa {
            out.push((S::NotesToSefa, r.auditee_uei.as_str()));
        }
        out
    }
}

/// Submission-level metadata that is not part of any workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub report_id: String,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub auditee_certifying_email: Option<String>,
    #[serde(default)]
    pub auditor_certifying_email: Option<String>,
    /// Report this submission replaces, if it is a resubmission.
    #[serde(default)]
    pub resubmission_of: Option<String>,
}

/// Stable identifier for each cross-validator; waivers name these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKey {
    UeiConsistency,
    AdditionalUeis,
    AdditionalEins,
    AwardReferenceDeclaration,
    FindingReferenceUniqueness,
    FindingsCountConsistency,
    PriorReferences,
    DuplicateSubmission,
    ExpenditureThreshold,
    CertifyingContacts,
    BiennialLowRisk,
    CorrectiveActionPlanReferences,
    FindingsTextReferences,
    SecondaryAuditors,
    SectionCompleteness,
    GeneralInformation,
}

impl ValidatorKey {
    pub const ALL: [ValidatorKey; 16] = [
        ValidatorKey::UeiConsistency,
        ValidatorKey::AdditionalUeis,
        ValidatorKey::AdditionalEins,
        ValidatorKey::AwardReferenceDeclaration,
        ValidatorKey::FindingReferenceUniqueness,
        ValidatorKey::FindingsCountConsistency,
        ValidatorKey::PriorReferences,
        ValidatorKey::DuplicateSubmission,
        ValidatorKey::ExpenditureThreshold,
        ValidatorKey::CertifyingContacts,
        ValidatorKey::BiennialLowRisk,
        ValidatorKey::CorrectiveActionPlanReferences,
        ValidatorKey::FindingsTextReferences,
        ValidatorKey::SecondaryAuditors,
        ValidatorKey::SectionCompleteness,
        ValidatorKey::GeneralInformation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorKey::UeiConsistency => "uei_consistency",
            ValidatorKey::AdditionalUeis => "additional_ueis",
            ValidatorKey::AdditionalEins => "additional_eins",
            ValidatorKey::AwardReferenceDeclaration => "award_reference_declaration",
            ValidatorKey::FindingReferenceUniqueness => "finding_reference_uniqueness",
            ValidatorKey::FindingsCountConsistency => "findings_count_consistency",
            ValidatorKey::PriorReferences => "prior_references",
            ValidatorKey::DuplicateSubmission => "duplicate_submission",
            ValidatorKey::ExpenditureThreshold => "expenditure_threshold",
            ValidatorKey::CertifyingContacts => "certifying_contacts",
            ValidatorKey::BiennialLowRisk => "biennial_low_risk",
            ValidatorKey::CorrectiveActionPlanReferences => "corrective_action_plan_references",
            ValidatorKey::FindingsTextReferences => "findings_text_references",
            ValidatorKey::SecondaryAuditors => "secondary_auditors",
            ValidatorKey::SectionCompleteness => "section_completeness",
            ValidatorKey::GeneralInformation => "general_information",
        }
    }
}

impl fmt::Display for ValidatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == trimmed)
            .ok_or_else(|| ModelError::UnknownValidator(s.to_string()))
    }
}

/// The full normalized submission: sections, metadata and waivers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub sections: SubmissionSections,
    pub metadata: SubmissionMetadata,
    /// Validators that must not surface errors for this submission.
    #[serde(default)]
    pub waivers: BTreeSet<ValidatorKey>,
}

impl Submission {
    pub fn is_waived(&self, key: ValidatorKey) -> bool {
        self.waivers.contains(&key)
    }
}
