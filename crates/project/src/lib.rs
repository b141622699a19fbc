mod store;
pub use store::*;
mod types;
pub use types::*;
mod validator;
pub use validator::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Image not found in project: {0}")]
    ImageNotFound(String),
    #[error("Validation errors: {0:?}")]
    Validation(Vec<ValidationError>),
}

pub type StoreResult<T> = Result<T, StoreError>;
