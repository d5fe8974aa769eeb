use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown validator key: {0}")]
    UnknownValidator(String),
    #[error("{section} record does not match its schema: {source}")]
    Schema {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
