//! Check engine for section workbooks and cross-validation of submissions.
//!
//! Section checks come in two strengths. Fatal pre-checks stop at the first
//! problem and reject the workbook outright. Accumulating checks run in full
//! and report every cell error at once.

pub mod checks;
pub mod context;
pub mod cross;
pub mod error;
pub mod fatal;
pub mod patterns;

pub use checks::{check_names, run_all};
pub use context::CheckContext;
pub use cross::{
    CrossContext, CrossValidationError, CrossValidator, HistoricalSubmission, InMemoryHistory,
    SubmissionHistory, ValidatorRegistry, cross_validate, default_registry,
};
pub use error::FatalError;
pub use fatal::run_fatal;

use audit_model::{CellError, WorkbookIr};
use audit_standards::{IntakeConfig, SectionTemplate};
use tracing::debug;

/// Outcome of the accumulating checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Accepted(T),
    /// Every cell error found, in check order.
    Rejected(Vec<CellError>),
}

impl<T> Validated<T> {
    pub fn from_errors(value: T, errors: Vec<CellError>) -> Self {
        if errors.is_empty() {
            Validated::Accepted(value)
        } else {
            Validated::Rejected(errors)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Validated::Accepted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Validated::Accepted(value) => Validated::Accepted(f(value)),
            Validated::Rejected(errors) => Validated::Rejected(errors),
        }
    }
}

/// Run the fatal pre-checks, then every accumulating check, over a
/// transformed workbook.
pub fn check_workbook(
    ir: &WorkbookIr,
    template: &SectionTemplate,
    config: &IntakeConfig,
    expected_uei: Option<&str>,
    is_migration: bool,
) -> Result<Vec<CellError>, FatalError> {
    let ctx = CheckContext::new(ir, template, config).migration(is_migration);
    run_fatal(&ctx, expected_uei)?;
    let errors = run_all(&ctx);
    debug!(
        section = %template.section,
        rows = ctx.row_count(),
        errors = errors.len(),
        "workbook checks finished"
    );
    Ok(errors)
}
