use serde::{Deserialize, Serialize};

use crate::enums::YesNo;

/// Cluster names that need a companion name column.
pub const STATE_CLUSTER: &str = "STATE CLUSTER";
pub const OTHER_CLUSTER: &str = "OTHER CLUSTER NOT LISTED ABOVE";

/// Canonical Federal Awards section (the SEFA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalAwards {
    pub auditee_uei: String,
    pub total_amount_expended: i64,
    #[serde(default)]
    pub federal_awards: Vec<FederalAward>,
}

impl FederalAwards {
    pub fn award(&self, award_reference: &str) -> Option<&FederalAward> {
        self.federal_awards
            .iter()
            .find(|award| award.award_reference == award_reference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalAward {
    pub award_reference: String,
    pub program: Program,
    pub cluster: Cluster,
    pub direct_or_indirect_award: DirectOrIndirectAward,
    pub loan_or_loan_guarantee: LoanOrLoanGuarantee,
    pub subrecipients: Subrecipients,
}

impl FederalAward {
    /// Assistance Listing Number, `prefix.extension`.
    pub fn aln(&self) -> String {
        format!(
            "{}.{}",
            self.program.federal_agency_prefix, self.program.three_digit_extension
        )
    }

    pub fn is_direct(&self) -> bool {
        self.direct_or_indirect_award.is_direct.is_yes()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub federal_agency_prefix: String,
    pub three_digit_extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_award_identification: Option<String>,
    pub program_name: String,
    /// May be negative for reimbursements.
    pub amount_expended: i64,
    pub federal_program_total: i64,
    pub is_major: YesNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_report_type: Option<String>,
    pub number_of_audit_findings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_cluster_name: Option<String>,
    pub cluster_total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectOrIndirectAward {
    pub is_direct: YesNo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<PassthroughEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassthroughEntity {
    pub passthrough_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passthrough_identifying_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOrLoanGuarantee {
    pub is_guaranteed: YesNo,
    /// A whole-dollar amount, or `N/A` when the balance is not reportable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_balance_at_audit_period_end: Option<String>,
}

impl LoanOrLoanGuarantee {
    /// Numeric loan balance, if one was reported.
    pub fn balance(&self) -> Option<i64> {
        self.loan_balance_at_audit_period_end
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subrecipients {
    pub is_passed: YesNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subrecipient_amount: Option<i64>,
}
