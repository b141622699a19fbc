use std::io::{Cursor, Write};

use project::Project;
use staging::ImageData;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::ExportError;

/// Message shown when bundling fails; the editing session is untouched.
pub const ARCHIVE_FAILED_MESSAGE: &str = "Failed to create zip file.";

/// Bundle a project's photos into a single ZIP.
///
/// One entry per image, staged version preferred over the original, named
/// with a STAGED_/ORIGINAL_ prefix plus the image's stored name, inside a
/// folder derived from the street address.
pub fn bundle_project(project: &Project) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let folder = folder_name(project);

    for (idx, img) in project.images.iter().enumerate() {
        let (data_uri, prefix) = match &img.staged_url {
            Some(staged) => (staged.as_str(), "STAGED_"),
            None => (img.original_url.as_str(), "ORIGINAL_"),
        };
        let name = if img.name.is_empty() {
            format!("photo_{idx}.jpg")
        } else {
            img.name.clone()
        };
        let bytes = ImageData::from_data_uri(data_uri).decode()?;
        zip.start_file(format!("{folder}/{prefix}{name}"), options)?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish()?;
    debug!(project = %project.id, entries = project.images.len(), "bundled archive");
    Ok(cursor.into_inner())
}

/// Suggested file name for the bundled archive.
pub fn archive_file_name(project: &Project) -> String {
    let stem = sanitized_street(project);
    format!("{stem}_Staged_Photos.zip")
}

fn folder_name(project: &Project) -> String {
    sanitized_street(project)
}

fn sanitized_street(project: &Project) -> String {
    let joined = project
        .street
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if joined.is_empty() {
        "listing_photos".to_string()
    } else {
        joined
    }
}
