use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a project image as staging is invoked and completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Original,
    Processing,
    Staged,
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageStatus::Original => write!(f, "original"),
            ImageStatus::Processing => write!(f, "processing"),
            ImageStatus::Staged => write!(f, "staged"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStatus {
    Existing,
    NewConstruction,
}

impl Default for ConstructionStatus {
    fn default() -> Self {
        ConstructionStatus::Existing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Land,
}

impl Default for PropertyType {
    fn default() -> Self {
        PropertyType::Residential
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDetails {
    pub date: String,
    #[serde(rename = "type")]
    pub auction_type: String,
    pub premium: String,
}

/// One photo owned by a project. `original_url`/`staged_url` are encoded
/// data URIs; a staged image keeps its original alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub id: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged_url: Option<String>,
    pub status: ImageStatus,
    pub name: String,
}

/// A listing: one property's images and metadata, independent of any editing
/// session. The project is the sole owner of its images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub images: Vec<ProjectImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub construction_status: ConstructionStatus,
    pub property_type: PropertyType,
    pub is_age_restricted: bool,
    pub is_auction: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_details: Option<AuctionDetails>,
    /// Permanent features or rooms to highlight, free text.
    pub features: String,
    /// AI-generated listing description, when one has been produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    pub fn display_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.street, self.city, self.state, self.zip
        )
    }

    pub fn image(&self, image_id: &str) -> Option<&ProjectImage> {
        self.images.iter().find(|i| i.id == image_id)
    }

    pub fn staged_count(&self) -> usize {
        self.images
            .iter()
            .filter(|i| i.status == ImageStatus::Staged)
            .count()
    }

    pub fn processing_count(&self) -> usize {
        self.images
            .iter()
            .filter(|i| i.status == ImageStatus::Processing)
            .count()
    }
}

/// Fields for creating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub construction_status: ConstructionStatus,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub is_age_restricted: bool,
    #[serde(default)]
    pub is_auction: bool,
    #[serde(default)]
    pub auction_details: Option<AuctionDetails>,
    #[serde(default)]
    pub features: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub construction_status: Option<ConstructionStatus>,
    pub property_type: Option<PropertyType>,
    pub is_age_restricted: Option<bool>,
    pub is_auction: Option<bool>,
    pub auction_details: Option<Option<AuctionDetails>>,
    pub features: Option<String>,
    pub description: Option<Option<String>>,
}
