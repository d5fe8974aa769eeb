//! Numeric policy thresholds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fiscal-period bracket `[start, end)` and the minimum total expenditure
/// that requires a single audit within it. Open ends are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureBracket {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    pub minimum: i64,
}

impl ExpenditureBracket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date < end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Expenditure above which a cognizant (rather than oversight) agency is assigned.
    pub cognizant_ceiling: i64,
    /// Share of total expenditure that direct awards must reach for the
    /// direct-funding candidate to win.
    pub direct_concentration: f64,
    /// Audit year the cognizant baseline is built from.
    pub baseline_year: i32,
    /// Prior finding references numbered before this year are not checked for
    /// existence; audits of those years were filed before UEIs were assigned.
    ///
    /// The cutoff is 2021, not 2022: audits of 2021 were already filed under
    /// UEIs, so a prior reference `2021-005` must exist in an earlier
    /// submission for the same UEI while `2019-777` is exempt.
    pub prior_reference_exempt_before: i32,
    pub expenditure_brackets: Vec<ExpenditureBracket>,
}

impl Default for Thresholds {
    fn default() -> Self {
        let cutover = NaiveDate::from_ymd_opt(2024, 10, 1);
        Self {
            cognizant_ceiling: 50_000_000,
            direct_concentration: 0.25,
            baseline_year: 2019,
            prior_reference_exempt_before: 2021,
            expenditure_brackets: vec![
                ExpenditureBracket {
                    start: None,
                    end: cutover,
                    minimum: 750_000,
                },
                ExpenditureBracket {
                    start: cutover,
                    end: None,
                    minimum: 1_000_000,
                },
            ],
        }
    }
}

impl Thresholds {
    /// The bracket a fiscal period starting on `date` falls into.
    pub fn bracket_for(&self, date: NaiveDate) -> Option<&ExpenditureBracket> {
        self.expenditure_brackets
            .iter()
            .find(|bracket| bracket.contains(date))
    }
}
