use async_trait::async_trait;
use thiserror::Error;

use crate::{ImageData, StyleOption};

/// Failure vocabulary the workflow understands. Every variant renders as the
/// user-facing message shown inline in the wizard.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Connection to the image service failed. Please check your network and try again.")]
    Connectivity { detail: String },
    /// The collaborator answered, but with no inline image payload. Distinct
    /// from transport failures: the instruction was not followed.
    #[error("The AI processed the request but returned text instead of an image. Please try again with slightly different guidelines.")]
    NoImageReturned,
    #[error("The staging service returned an error (status {status}). Please try again.")]
    Service { status: u16, detail: String },
    #[error("Failed to generate image. Please try again.")]
    Other(String),
}

/// Seam between the workflow state machine and the hosted generative-image
/// service. Implementations are single-shot: no internal retry or backoff.
#[async_trait]
pub trait StagingGenerator: Send + Sync {
    /// Stage a property photo from scratch.
    async fn stage(
        &self,
        image: &ImageData,
        style: &StyleOption,
        guidelines: &str,
    ) -> Result<ImageData, GenerationError>;

    /// Apply targeted edits to an already-generated image, preserving
    /// composition.
    async fn refine(
        &self,
        image: &ImageData,
        instructions: &str,
    ) -> Result<ImageData, GenerationError>;
}
