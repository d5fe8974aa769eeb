use audit_standards::TemplateVersion;
use thiserror::Error;

/// Problems that stop a section before any field check runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("not a recognised audit workbook: no `{range}` range found")]
    UnknownWorkbook { range: &'static str },

    #[error("this workbook is for {found}, but {expected} was expected")]
    WrongSection { expected: String, found: String },

    #[error("workbook template version {found} is older than the minimum supported {minimum}")]
    OutdatedTemplate {
        found: String,
        minimum: TemplateVersion,
    },

    #[error("required field `{range}` is missing from the workbook")]
    MissingRequiredField { range: String },

    #[error("workbook UEI {found} does not match the submission's UEI {expected}")]
    UeiMismatch { expected: String, found: String },
}
