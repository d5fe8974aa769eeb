use std::path::PathBuf;

use audit_ingest::IngestError;
use audit_map::MappingError;
use audit_validate::FatalError;
use thiserror::Error;

/// A section intake that could not produce a verdict on its cells.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgencyError {
    /// No award carries a usable agency prefix. Complete award data always
    /// yields an agency, so this points at an upstream defect.
    #[error("agency could not be determined: {reason}")]
    Undetermined { reason: String },
}

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed baseline CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("baseline row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}
