use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read document {path}: {reason}")]
    Document { path: String, reason: String },

    #[error("{0} not set")]
    MissingApiKey(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
