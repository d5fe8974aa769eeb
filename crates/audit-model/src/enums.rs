//! Type-safe enumerations for submission metadata.
//!
//! Workbooks carry these as free text; parsing happens once at the mapping
//! boundary so downstream code never compares raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Sentinel accepted in place of Y/N (and other required values) for data
/// migrated from the historical clearinghouse.
pub const MIGRATION_SENTINEL: &str = "GSA_MIGRATION";

/// Submission sections. Each has its own workbook template and canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    GeneralInformation,
    FederalAwards,
    FindingsUniformGuidance,
    FindingsText,
    CorrectiveActionPlan,
    AdditionalUeis,
    AdditionalEins,
    SecondaryAuditors,
    NotesToSefa,
}

impl SectionName {
    pub const ALL: [SectionName; 9] = [
        SectionName::GeneralInformation,
        SectionName::FederalAwards,
        SectionName::FindingsUniformGuidance,
        SectionName::FindingsText,
        SectionName::CorrectiveActionPlan,
        SectionName::AdditionalUeis,
        SectionName::AdditionalEins,
        SectionName::SecondaryAuditors,
        SectionName::NotesToSefa,
    ];

    /// Stable key used in submission documents and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::GeneralInformation => "general_information",
            SectionName::FederalAwards => "federal_awards",
            SectionName::FindingsUniformGuidance => "findings_uniform_guidance",
            SectionName::FindingsText => "findings_text",
            SectionName::CorrectiveActionPlan => "corrective_action_plan",
            SectionName::AdditionalUeis => "additional_ueis",
            SectionName::AdditionalEins => "additional_eins",
            SectionName::SecondaryAuditors => "secondary_auditors",
            SectionName::NotesToSefa => "notes_to_sefa",
        }
    }

    /// Value of the workbook's reserved `section_name` cell.
    pub fn workbook_label(&self) -> &'static str {
        match self {
            SectionName::GeneralInformation => "GeneralInformation",
            SectionName::FederalAwards => "FederalAwardsExpended",
            SectionName::FindingsUniformGuidance => "FindingsUniformGuidance",
            SectionName::FindingsText => "FindingsText",
            SectionName::CorrectiveActionPlan => "CorrectiveActionPlan",
            SectionName::AdditionalUeis => "AdditionalUEIs",
            SectionName::AdditionalEins => "AdditionalEINs",
            SectionName::SecondaryAuditors => "SecondaryAuditors",
            SectionName::NotesToSefa => "NotesToSefa",
        }
    }

    /// Human-facing title used in cross-validation messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionName::GeneralInformation => "General Information",
            SectionName::FederalAwards => "Federal Awards",
            SectionName::FindingsUniformGuidance => "Findings (Uniform Guidance)",
            SectionName::FindingsText => "Findings Text",
            SectionName::CorrectiveActionPlan => "Corrective Action Plan",
            SectionName::AdditionalUeis => "Additional UEIs",
            SectionName::AdditionalEins => "Additional EINs",
            SectionName::SecondaryAuditors => "Secondary Auditors",
            SectionName::NotesToSefa => "Notes to SEFA",
        }
    }

    pub fn from_workbook_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.workbook_label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SectionName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == normalized)
            .or_else(|| Self::from_workbook_label(s))
            .ok_or_else(|| ModelError::UnknownSection(s.to_string()))
    }
}

/// Y/N answer, plus the historical migration sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
    #[serde(rename = "GSA_MIGRATION")]
    Migration,
}

impl YesNo {
    /// Parse an answer. The migration sentinel is only accepted when allowed.
    pub fn parse(raw: &str, allow_migration: bool) -> Option<Self> {
        match raw.trim() {
            "Y" => Some(YesNo::Yes),
            "N" => Some(YesNo::No),
            MIGRATION_SENTINEL if allow_migration => Some(YesNo::Migration),
            _ => None,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Y",
            YesNo::No => "N",
            YesNo::Migration => MIGRATION_SENTINEL,
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to "was the de minimis indirect cost rate used".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeMinimisRate {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
    Both,
    #[serde(rename = "GSA_MIGRATION")]
    Migration,
}

impl DeMinimisRate {
    pub fn parse(raw: &str, allow_migration: bool) -> Option<Self> {
        match raw.trim() {
            "Y" => Some(DeMinimisRate::Yes),
            "N" => Some(DeMinimisRate::No),
            "Both" => Some(DeMinimisRate::Both),
            MIGRATION_SENTINEL if allow_migration => Some(DeMinimisRate::Migration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditType {
    SingleAudit,
    ProgramSpecific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditPeriod {
    Annual,
    Biennial,
    Other,
}
