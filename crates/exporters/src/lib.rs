use thiserror::Error;

pub mod archive;
pub mod watermark;

pub use archive::{archive_file_name, bundle_project, ARCHIVE_FAILED_MESSAGE};
pub use watermark::{apply_watermark, WatermarkMode};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}

impl From<staging::StagingError> for ExportError {
    fn from(err: staging::StagingError) -> Self {
        ExportError::InvalidImage(err.to_string())
    }
}

/// File name offered for a single-result download.
pub fn download_file_name(watermarked: bool) -> &'static str {
    if watermarked {
        "OneRoof_Staging_Watermarked.png"
    } else {
        "OneRoof_Staging_Render.png"
    }
}

/// File name offered when downloading a staged photo out of a project.
pub fn project_download_name(image_name: &str) -> String {
    format!("OneRoof_{image_name}")
}
