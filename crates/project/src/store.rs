use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    validate_new_project, ImageStatus, NewProject, Project, ProjectImage, ProjectUpdate,
    StoreError, StoreResult,
};

/// In-memory collection of listings, newest first. Owned by a single session
/// context; mutated only from the UI thread, so no interior locking.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Create a listing. Newest listings go to the front.
    pub fn create(&mut self, input: NewProject) -> StoreResult<Project> {
        let errors = validate_new_project(&input);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let project = Project {
            id: Uuid::new_v4().to_string(),
            street: input.street,
            city: input.city,
            state: input.state,
            zip: input.zip,
            created_at: Utc::now(),
            updated_at: None,
            images: Vec::new(),
            cover_image: None,
            construction_status: input.construction_status,
            property_type: input.property_type,
            is_age_restricted: input.is_age_restricted,
            is_auction: input.is_auction,
            auction_details: input.auction_details,
            features: input.features,
            description: None,
        };
        info!(project = %project.id, "created listing at {}", project.display_address());
        self.projects.insert(0, project.clone());
        Ok(project)
    }

    /// Apply a partial update. Absent fields are untouched.
    pub fn update(&mut self, id: &str, update: ProjectUpdate) -> StoreResult<()> {
        let project = self.project_mut(id)?;
        if let Some(street) = update.street {
            project.street = street;
        }
        if let Some(city) = update.city {
            project.city = city;
        }
        if let Some(state) = update.state {
            project.state = state;
        }
        if let Some(zip) = update.zip {
            project.zip = zip;
        }
        if let Some(status) = update.construction_status {
            project.construction_status = status;
        }
        if let Some(property_type) = update.property_type {
            project.property_type = property_type;
        }
        if let Some(age_restricted) = update.is_age_restricted {
            project.is_age_restricted = age_restricted;
        }
        if let Some(is_auction) = update.is_auction {
            project.is_auction = is_auction;
        }
        if let Some(details) = update.auction_details {
            project.auction_details = details;
        }
        if let Some(features) = update.features {
            project.features = features;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        project.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Remove a listing. Returns whether anything was removed; deleting an
    /// unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        let removed = self.projects.len() != before;
        if removed {
            info!(project = %id, "deleted listing");
        }
        removed
    }

    /// Attach an uploaded photo. The first image of a listing becomes its
    /// cover.
    pub fn add_image(
        &mut self,
        project_id: &str,
        data_uri: &str,
        name: &str,
    ) -> StoreResult<ProjectImage> {
        let project = self.project_mut(project_id)?;
        let image = ProjectImage {
            id: Uuid::new_v4().to_string(),
            original_url: data_uri.to_string(),
            staged_url: None,
            status: ImageStatus::Original,
            name: name.to_string(),
        };
        if project.cover_image.is_none() {
            project.cover_image = Some(data_uri.to_string());
        }
        project.images.push(image.clone());
        project.updated_at = Some(Utc::now());
        debug!(project = %project_id, image = %image.id, "added image");
        Ok(image)
    }

    /// Remove a photo from its owning listing only; no cascading external
    /// state. Unknown image ids are a no-op.
    pub fn delete_image(&mut self, project_id: &str, image_id: &str) -> StoreResult<()> {
        let project = self.project_mut(project_id)?;
        let before = project.images.len();
        project.images.retain(|i| i.id != image_id);
        if project.images.len() != before {
            project.updated_at = Some(Utc::now());
            debug!(project = %project_id, image = %image_id, "deleted image");
        }
        Ok(())
    }

    /// Mark a photo as being staged.
    pub fn begin_staging(&mut self, project_id: &str, image_id: &str) -> StoreResult<()> {
        let project = self.project_mut(project_id)?;
        let image = project
            .images
            .iter_mut()
            .find(|i| i.id == image_id)
            .ok_or_else(|| StoreError::ImageNotFound(image_id.to_string()))?;
        image.status = ImageStatus::Processing;
        Ok(())
    }

    /// Store a staging result on an existing photo.
    pub fn attach_staged(
        &mut self,
        project_id: &str,
        image_id: &str,
        staged_uri: &str,
    ) -> StoreResult<()> {
        let project = self.project_mut(project_id)?;
        let image = project
            .images
            .iter_mut()
            .find(|i| i.id == image_id)
            .ok_or_else(|| StoreError::ImageNotFound(image_id.to_string()))?;
        image.staged_url = Some(staged_uri.to_string());
        image.status = ImageStatus::Staged;
        project.updated_at = Some(Utc::now());
        info!(project = %project_id, image = %image_id, "staged result attached");
        Ok(())
    }

    /// Save a workflow result as a new staged photo on a listing. The first
    /// image of a listing becomes its cover.
    pub fn save_result(
        &mut self,
        project_id: &str,
        original_uri: &str,
        staged_uri: &str,
        name: Option<String>,
    ) -> StoreResult<ProjectImage> {
        let project = self.project_mut(project_id)?;
        let image = ProjectImage {
            id: Uuid::new_v4().to_string(),
            original_url: original_uri.to_string(),
            staged_url: Some(staged_uri.to_string()),
            status: ImageStatus::Staged,
            name: name
                .unwrap_or_else(|| format!("Staged Photo {}", Utc::now().format("%H:%M:%S"))),
        };
        if project.cover_image.is_none() {
            project.cover_image = Some(staged_uri.to_string());
        }
        project.images.push(image.clone());
        project.updated_at = Some(Utc::now());
        info!(project = %project_id, image = %image.id, "saved staging result");
        Ok(image)
    }

    fn project_mut(&mut self, id: &str) -> StoreResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))
    }
}
