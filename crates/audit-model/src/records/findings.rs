use serde::{Deserialize, Serialize};

use crate::enums::YesNo;

/// Prior-references value used when a finding is not a repeat.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingsUniformGuidance {
    pub auditee_uei: String,
    #[serde(default)]
    pub findings_uniform_guidance_entries: Vec<FindingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingEntry {
    pub program: FindingProgram,
    pub findings: FindingDetail,
    pub modified_opinion: YesNo,
    pub other_matters: YesNo,
    pub material_weakness: YesNo,
    pub significant_deficiency: YesNo,
    pub other_findings: YesNo,
    pub questioned_costs: YesNo,
}

impl FindingEntry {
    pub fn award_reference(&self) -> &str {
        &self.program.award_reference
    }

    pub fn reference_number(&self) -> &str {
        &self.findings.reference_number
    }

    /// The five classification flags in grid order.
    pub fn grid(&self) -> [YesNo; 5] {
        [
            self.modified_opinion,
            self.other_matters,
            self.material_weakness,
            self.significant_deficiency,
            self.other_findings,
        ]
    }

    /// Cited prior finding references, empty for `N/A`.
    pub fn prior_references(&self) -> Vec<String> {
        let raw = self.findings.prior_references.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_APPLICABLE) {
            return Vec::new();
        }
        raw.split(',')
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingProgram {
    pub award_reference: String,
    pub compliance_requirement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingDetail {
    pub reference_number: String,
    pub repeat_prior_reference: YesNo,
    pub prior_references: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingsText {
    pub auditee_uei: String,
    #[serde(default)]
    pub findings_text_entries: Vec<FindingTextEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingTextEntry {
    pub reference_number: String,
    pub text_of_finding: String,
    pub contains_chart_or_table: YesNo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectiveActionPlan {
    pub auditee_uei: String,
    #[serde(default)]
    pub corrective_action_plan_entries: Vec<CorrectiveActionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectiveActionEntry {
    pub reference_number: String,
    pub planned_action: String,
    pub contains_chart_or_table: YesNo,
}
