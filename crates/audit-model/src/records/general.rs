use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::enums::{AuditPeriod, AuditType, DeMinimisRate, YesNo};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInformation {
    pub auditee_uei: String,
    pub auditee_ein: String,
    pub auditee_name: String,
    pub fy_start_date: NaiveDate,
    pub fy_end_date: NaiveDate,
    pub audit_type: AuditType,
    pub audit_period_covered: AuditPeriod,
    pub multiple_ueis_covered: bool,
    pub multiple_eins_covered: bool,
    pub secondary_auditors_exist: bool,
    pub is_low_risk_auditee: bool,
}

impl GeneralInformation {
    /// Audit year is the calendar year the fiscal period starts in.
    pub fn audit_year(&self) -> i32 {
        self.fy_start_date.year()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesToSefa {
    pub auditee_uei: String,
    pub accounting_policies: String,
    pub is_minimis_rate_used: DeMinimisRate,
    pub rate_explained: String,
    #[serde(default)]
    pub notes_to_sefa_entries: Vec<NoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub seq_number: i64,
    #[serde(default)]
    pub note_title: String,
    #[serde(default)]
    pub note_content: String,
    pub contains_chart_or_table: YesNo,
}
