use thiserror::Error;

mod catalog;
pub use catalog::*;
mod image_data;
pub use image_data::*;
mod generate;
pub use generate::*;
mod session;
pub use session::*;
mod compare;
pub use compare::*;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Please upload a valid JPG or PNG image.")]
    UnsupportedImageType { mime: String },
    #[error("Image is too large ({size} bytes, limit {limit})")]
    ImageTooLarge { size: usize, limit: usize },
    #[error("invalid image encoding: {0}")]
    InvalidEncoding(String),
    #[error("style '{style_id}' does not belong to the selected staging type")]
    StyleTypeMismatch { style_id: String },
}
