use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported workbook format: {path} (expected .xlsx or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("not a recognised audit workbook: no `{range}` range found")]
    UnknownWorkbook { range: &'static str },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open spreadsheet: {message}")]
    Spreadsheet { message: String },

    #[error("failed to read sheet {sheet}: {message}")]
    Sheet { sheet: String, message: String },

    #[error("malformed workbook JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("named range {name} has an unreadable destination: {destination}")]
    InvalidDestination { name: String, destination: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
