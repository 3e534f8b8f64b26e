//! Form definitions backing the report and remito routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod remito;
pub mod report;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid photo upload: {0}")]
    InvalidPhoto(String),
}
