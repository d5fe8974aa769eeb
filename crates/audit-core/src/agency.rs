//! Cognizant and oversight agency assignment.
//!
//! Expenditure is aggregated per two-digit agency prefix, once over all awards
//! and once over direct awards only. When direct funding is concentrated
//! enough, the leading direct funder is the candidate; otherwise the leading
//! funder overall is. Small auditees get the candidate as oversight agency.
//! Large auditees get a cognizant agency, and an agency already on record in
//! the baseline year keeps the assignment.

use audit_model::records::FederalAwards;
use audit_standards::Thresholds;
use serde::Serialize;
use tracing::debug;

use crate::baseline::BaselineTable;
use crate::error::AgencyError;

/// Exactly one agency, either cognizant or oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "AgencyFields")]
pub enum AgencyAssignment {
    Cognizant(String),
    Oversight(String),
}

impl AgencyAssignment {
    pub fn cognizant_agency(&self) -> Option<&str> {
        match self {
            AgencyAssignment::Cognizant(agency) => Some(agency),
            AgencyAssignment::Oversight(_) => None,
        }
    }

    pub fn oversight_agency(&self) -> Option<&str> {
        match self {
            AgencyAssignment::Oversight(agency) => Some(agency),
            AgencyAssignment::Cognizant(_) => None,
        }
    }

    pub fn agency(&self) -> &str {
        match self {
            AgencyAssignment::Cognizant(agency) | AgencyAssignment::Oversight(agency) => agency,
        }
    }
}

/// Stored shape: two nullable fields, one of them set.
#[derive(Serialize)]
struct AgencyFields {
    cognizant_agency: Option<String>,
    oversight_agency: Option<String>,
}

impl From<AgencyAssignment> for AgencyFields {
    fn from(assignment: AgencyAssignment) -> Self {
        match assignment {
            AgencyAssignment::Cognizant(agency) => Self {
                cognizant_agency: Some(agency),
                oversight_agency: None,
            },
            AgencyAssignment::Oversight(agency) => Self {
                cognizant_agency: None,
                oversight_agency: Some(agency),
            },
        }
    }
}

/// Which aggregate produced the computed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateBasis {
    Direct,
    Total,
}

pub(crate) fn is_agency_prefix(prefix: &str) -> bool {
    prefix.len() == 2 && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Per-agency expenditure sums in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencyTotals {
    total: Vec<(String, i64)>,
    direct: Vec<(String, i64)>,
    direct_amount: i64,
    overflowed: bool,
}

/// Returns `false` when the agency's sum no longer fits in `i64`.
fn accumulate(sums: &mut Vec<(String, i64)>, agency: &str, amount: i64) -> bool {
    match sums.iter_mut().find(|(key, _)| key == agency) {
        Some((_, sum)) => match sum.checked_add(amount) {
            Some(next) => {
                *sum = next;
                true
            }
            None => false,
        },
        None => {
            sums.push((agency.to_string(), amount));
            true
        }
    }
}

/// Largest sum; ties go to the agency seen first.
fn leader(sums: &[(String, i64)]) -> Option<&str> {
    let mut best: Option<&(String, i64)> = None;
    for entry in sums {
        if best.is_none_or(|(_, amount)| entry.1 > *amount) {
            best = Some(entry);
        }
    }
    best.map(|(agency, _)| agency.as_str())
}

impl AgencyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one award. Awards without a two-digit prefix are ignored.
    pub fn add(&mut self, prefix: &str, amount: i64, is_direct: bool) {
        let prefix = prefix.trim();
        if !is_agency_prefix(prefix) {
            return;
        }
        let mut fits = accumulate(&mut self.total, prefix, amount);
        if is_direct {
            fits &= accumulate(&mut self.direct, prefix, amount);
            match self.direct_amount.checked_add(amount) {
                Some(next) => self.direct_amount = next,
                None => fits = false,
            }
        }
        self.overflowed |= !fits;
    }

    pub fn from_awards(awards: &FederalAwards) -> Self {
        let mut totals = Self::new();
        for award in &awards.federal_awards {
            totals.add(
                &award.program.federal_agency_prefix,
                award.program.amount_expended,
                award.is_direct(),
            );
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// Some sum left the `i64` range; the totals are then incomplete and no
    /// candidate is offered.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn total_by_agency(&self) -> &[(String, i64)] {
        &self.total
    }

    pub fn direct_by_agency(&self) -> &[(String, i64)] {
        &self.direct
    }

    /// Sum of direct award amounts across all agencies.
    pub fn direct_amount(&self) -> i64 {
        self.direct_amount
    }

    /// The computed candidate for an auditee expending `total_expended`.
    ///
    /// Without any direct award the direct candidate is absent and the
    /// overall leader is used.
    pub fn candidate(
        &self,
        total_expended: i64,
        concentration: f64,
    ) -> Option<(&str, CandidateBasis)> {
        if self.overflowed {
            return None;
        }
        let concentrated = self.direct_amount as f64 >= concentration * total_expended as f64;
        if concentrated && let Some(agency) = leader(&self.direct) {
            return Some((agency, CandidateBasis::Direct));
        }
        leader(&self.total).map(|agency| (agency, CandidateBasis::Total))
    }
}

/// Assign the cognizant or oversight agency for a Federal Awards record.
pub fn assign_agency(
    awards: &FederalAwards,
    ein: &str,
    baseline: &BaselineTable,
    thresholds: &Thresholds,
) -> Result<AgencyAssignment, AgencyError> {
    let total_expended = awards.total_amount_expended;
    let totals = AgencyTotals::from_awards(awards);
    if totals.overflowed() {
        return Err(AgencyError::Undetermined {
            reason: format!("per-agency amounts expended add up to more than {}", i64::MAX),
        });
    }
    let (candidate, basis) = totals
        .candidate(total_expended, thresholds.direct_concentration)
        .ok_or_else(|| AgencyError::Undetermined {
            reason: format!(
                "none of the {} award(s) carries a two-digit agency prefix",
                awards.federal_awards.len()
            ),
        })?;
    debug!(
        candidate,
        ?basis,
        total_expended,
        direct_amount = totals.direct_amount(),
        "computed agency candidate"
    );

    if total_expended <= thresholds.cognizant_ceiling {
        return Ok(AgencyAssignment::Oversight(candidate.to_string()));
    }
    match baseline.lookup(ein) {
        Some(prior) => {
            debug!(
                ein,
                prior,
                candidate,
                year = baseline.year(),
                "baseline keeps the cognizant agency"
            );
            Ok(AgencyAssignment::Cognizant(prior.to_string()))
        }
        None => Ok(AgencyAssignment::Cognizant(candidate.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_first_agency_seen() {
        let mut totals = AgencyTotals::new();
        totals.add("10", 500, false);
        totals.add("93", 500, false);
        assert_eq!(totals.candidate(1000, 0.25), Some(("10", CandidateBasis::Total)));
    }

    #[test]
    fn reimbursements_reduce_an_agency_total() {
        let mut totals = AgencyTotals::new();
        totals.add("10", 700, false);
        totals.add("10", -400, false);
        totals.add("93", 400, false);
        assert_eq!(totals.candidate(700, 0.25), Some(("93", CandidateBasis::Total)));
    }

    #[test]
    fn malformed_prefixes_are_ignored() {
        let mut totals = AgencyTotals::new();
        totals.add("9", 100, true);
        totals.add("", 100, true);
        assert!(totals.is_empty());
        assert_eq!(totals.candidate(200, 0.25), None);
    }

    #[test]
    fn assignment_serializes_as_two_fields() {
        let json = serde_json::to_value(AgencyAssignment::Oversight("93".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cognizant_agency": null, "oversight_agency": "93" })
        );
    }
}
