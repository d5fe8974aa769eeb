//! Error types for mapping operations.

use audit_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    /// A cell that passed the checks still could not be coerced.
    #[error("{range} row {row}: cannot read {value:?} as {expected}")]
    InvalidValue {
        range: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },
    /// Two mappings write to the same path with incompatible shapes.
    #[error("path {path} is already used by a scalar value")]
    PathConflict { path: String },
    #[error(transparent)]
    Schema(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MappingError>;
