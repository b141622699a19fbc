/// Generation pipeline for virtual staging
///
/// Builds the instruction payload for the hosted generative-image service and
/// wraps its two remote operations (stage, refine) behind the workflow's
/// generator seam.
pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::{refine_request, stage_request, StagingRequest};
