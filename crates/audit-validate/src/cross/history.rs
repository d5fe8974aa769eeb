//! Earlier submissions, as seen by cross-validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Read access to previously accepted submissions.
///
/// Validators only see history through this trait so that cross-validation
/// never reaches for global state.
pub trait SubmissionHistory: Send + Sync {
    /// Finding reference numbers reported by the auditee in submissions for
    /// audit years before `before_year` (all years when `None`).
    fn prior_finding_references(&self, uei: &str, before_year: Option<i32>) -> BTreeSet<String>;

    /// Report ids of disseminated submissions for `(uei, audit_year)`.
    fn disseminated_reports(&self, uei: &str, audit_year: i32) -> Vec<String>;
}

/// One earlier submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSubmission {
    pub report_id: String,
    pub auditee_uei: String,
    pub audit_year: i32,
    #[serde(default)]
    pub disseminated: bool,
    #[serde(default)]
    pub finding_references: Vec<String>,
}

/// History held in memory, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryHistory {
    submissions: Vec<HistoricalSubmission>,
}

impl InMemoryHistory {
    pub fn new(submissions: Vec<HistoricalSubmission>) -> Self {
        Self { submissions }
    }

    pub fn push(&mut self, submission: HistoricalSubmission) {
        self.submissions.push(submission);
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    fn for_uei<'a>(&'a self, uei: &'a str) -> impl Iterator<Item = &'a HistoricalSubmission> {
        self.submissions
            .iter()
            .filter(move |submission| submission.auditee_uei.eq_ignore_ascii_case(uei))
    }
}

impl SubmissionHistory for InMemoryHistory {
    fn prior_finding_references(&self, uei: &str, before_year: Option<i32>) -> BTreeSet<String> {
        self.for_uei(uei)
            .filter(|submission| before_year.is_none_or(|year| submission.audit_year < year))
            .flat_map(|submission| submission.finding_references.iter().cloned())
            .collect()
    }

    fn disseminated_reports(&self, uei: &str, audit_year: i32) -> Vec<String> {
        self.for_uei(uei)
            .filter(|submission| submission.disseminated && submission.audit_year == audit_year)
            .map(|submission| submission.report_id.clone())
            .collect()
    }
}
