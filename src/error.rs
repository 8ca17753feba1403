use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PolicyError {
    /// A pattern, subject or policy was rejected at construction.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown predefined role: {0}")]
    UnknownRole(String),

    #[error("failed to parse policy document: {0}")]
    ParseError(String),
}

impl PolicyError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        PolicyError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::ParseError(err.to_string())
    }
}
