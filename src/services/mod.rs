//! Workflow operations: saving reports, opening and finalizing remitos,
//! rendering the printable document, client prefetch and schedule checks.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::domain::workflow::TransitionError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::render::RenderError;

pub mod clients;
pub mod pdf;
pub mod remito;
pub mod render;
pub mod report;
pub mod schedule;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no report has been saved yet")]
    NoSavedReport,

    #[error("the report was already saved; confirmation required")]
    DuplicateSave,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("type constraint error: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
