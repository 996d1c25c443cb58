// src/error.rs
// Standardized error types for Therabot

use thiserror::Error;

/// Main error type for the Therabot library
#[derive(Error, Debug)]
pub enum TherabotError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using TherabotError
pub type Result<T> = std::result::Result<T, TherabotError>;

impl From<String> for TherabotError {
    fn from(s: String) -> Self {
        TherabotError::Other(s)
    }
}
