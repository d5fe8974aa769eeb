//! Section intake orchestration and agency assignment.
//!
//! Intake runs one workbook through reading, transforms, checks and mapping.
//! Agency assignment works on the canonical Federal Awards record and a
//! versioned cognizant baseline.

pub mod agency;
pub mod baseline;
pub mod error;
pub mod intake;

pub use agency::{AgencyAssignment, AgencyTotals, CandidateBasis, assign_agency};
pub use baseline::{
    BaselineEntry, BaselineStore, BaselineTable, HistoricalAward, build_baseline, read_history,
};
pub use error::{AgencyError, BaselineError, IntakeError};
pub use intake::{IntakeOptions, extract_file, extract_ir};
