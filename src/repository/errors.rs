use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Platform error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RepositoryError::ConnectionError(format!("Request timed out: {err}"))
        } else if err.is_connect() || err.is_request() {
            RepositoryError::ConnectionError(err.to_string())
        } else if err.is_decode() {
            RepositoryError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Status {
                status,
                body: err.to_string(),
            }
        } else {
            RepositoryError::Unexpected(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InvalidResponse(format!("Failed to parse response: {err}"))
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}
