use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::StagingError;

/// Mime type assumed when a data URI carries no recognizable header.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// Upload ceiling for source photos, applied to the decoded payload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_UPLOAD_MIMES: [&str; 2] = ["image/jpeg", "image/png"];

/// An encoded image payload: mime type plus raw base64 data (no URI header).
///
/// Uploads, generation results, project images, and export inputs all use
/// this representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    mime: String,
    data: String,
}

impl ImageData {
    pub fn new(mime: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Encode raw bytes into an `ImageData` of the given mime type.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:image/<fmt>;base64,...` URI.
    ///
    /// A missing or unrecognized header falls back to [`FALLBACK_MIME`]; the
    /// payload is whatever follows the last comma (or the whole string when
    /// no header is present).
    pub fn from_data_uri(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix("data:") {
            if let Some((header, payload)) = rest.split_once(";base64,") {
                let mime = if header.starts_with("image/") && header.len() > "image/".len() {
                    header.to_string()
                } else {
                    FALLBACK_MIME.to_string()
                };
                return Self {
                    mime,
                    data: payload.to_string(),
                };
            }
        }
        Self {
            mime: FALLBACK_MIME.to_string(),
            data: uri.to_string(),
        }
    }

    /// Re-encode as a self-describing data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw base64 payload without any header.
    pub fn payload(&self) -> &str {
        &self.data
    }

    /// Decode the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StagingError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| StagingError::InvalidEncoding(e.to_string()))
    }
}

/// Validate and accept a user upload.
///
/// Only JPEG and PNG enter the workflow; anything else is rejected before a
/// remote call can happen. The size ceiling applies to the raw bytes.
pub fn accept_upload(mime: &str, bytes: &[u8]) -> Result<ImageData, StagingError> {
    if !ACCEPTED_UPLOAD_MIMES.contains(&mime) {
        return Err(StagingError::UnsupportedImageType {
            mime: mime.to_string(),
        });
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(StagingError::ImageTooLarge {
            size: bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(ImageData::from_bytes(mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let img = ImageData::from_data_uri("data:image/png;base64,aGVsbG8=");
        assert_eq!(img.mime(), "image/png");
        assert_eq!(img.payload(), "aGVsbG8=");
        assert_eq!(img.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_missing_header_falls_back_to_jpeg() {
        let img = ImageData::from_data_uri("aGVsbG8=");
        assert_eq!(img.mime(), FALLBACK_MIME);
        assert_eq!(img.payload(), "aGVsbG8=");
    }

    #[test]
    fn test_unrecognized_header_falls_back_to_jpeg() {
        let img = ImageData::from_data_uri("data:application/pdf;base64,aGVsbG8=");
        assert_eq!(img.mime(), FALLBACK_MIME);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let img = ImageData::new("image/png", "not!!base64");
        assert!(img.decode().is_err());
    }

    #[test]
    fn test_accept_upload_rejects_other_types() {
        let err = accept_upload("image/webp", b"123").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a valid JPG or PNG image.");
    }

    #[test]
    fn test_accept_upload_enforces_size_limit() {
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(
            accept_upload("image/jpeg", &big),
            Err(StagingError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_accept_upload_encodes_payload() {
        let img = accept_upload("image/jpeg", b"hello").unwrap();
        assert_eq!(img.decode().unwrap(), b"hello");
    }
}
