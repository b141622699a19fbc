use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ImageData, StagingError, StagingGenerator, StagingType, StyleOption};

/// Fixed message stored when a refine call fails; the previous result is kept.
pub const REFINE_FAILED_MESSAGE: &str = "Failed to refine image.";

/// The five wizard steps, in order. Out-of-range steps are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Upload,
    Category,
    Style,
    Guidelines,
    Result,
}

impl WizardStep {
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Upload => Some(WizardStep::Category),
            WizardStep::Category => Some(WizardStep::Style),
            WizardStep::Style => Some(WizardStep::Guidelines),
            WizardStep::Guidelines => Some(WizardStep::Result),
            WizardStep::Result => None,
        }
    }

    pub fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Upload => None,
            WizardStep::Category => Some(WizardStep::Upload),
            WizardStep::Style => Some(WizardStep::Category),
            WizardStep::Guidelines => Some(WizardStep::Style),
            WizardStep::Result => Some(WizardStep::Guidelines),
        }
    }

    /// Zero-based ordinal for step indicators.
    pub fn index(self) -> usize {
        match self {
            WizardStep::Upload => 0,
            WizardStep::Category => 1,
            WizardStep::Style => 2,
            WizardStep::Guidelines => 3,
            WizardStep::Result => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload",
            WizardStep::Category => "Type",
            WizardStep::Style => "Style",
            WizardStep::Guidelines => "Details",
            WizardStep::Result => "Result",
        }
    }
}

/// How the editing session came to exist. Back-navigation for resumed
/// sessions is decided by the caller from this, not inferred from a nullable
/// image id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOrigin {
    FreshSession,
    ResumedFromProject { project_id: String, image_id: String },
}

/// One editing session's wizard state. All mutations are synchronous except
/// [`WorkflowSession::generate`] and [`WorkflowSession::refine`], which
/// perform one remote call each and only touch state at the call boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSession {
    step: WizardStep,
    uploaded_image: Option<ImageData>,
    staging_type: Option<StagingType>,
    selected_style: Option<StyleOption>,
    guidelines: String,
    generated_image: Option<ImageData>,
    is_generating: bool,
    error: Option<String>,
    origin: SessionOrigin,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    /// A fresh session at the upload step.
    pub fn new() -> Self {
        Self {
            step: WizardStep::Upload,
            uploaded_image: None,
            staging_type: None,
            selected_style: None,
            guidelines: String::new(),
            generated_image: None,
            is_generating: false,
            error: None,
            origin: SessionOrigin::FreshSession,
        }
    }

    /// Seed a session from an existing project image. The upload step is
    /// skipped; a previously staged result is carried over so the user can
    /// keep refining it. The link back to the project is one-shot.
    pub fn resume_from_project(
        project_id: impl Into<String>,
        image_id: impl Into<String>,
        original: ImageData,
        staged: Option<ImageData>,
    ) -> Self {
        Self {
            step: WizardStep::Category,
            uploaded_image: Some(original),
            staging_type: None,
            selected_style: None,
            guidelines: String::new(),
            generated_image: staged,
            is_generating: false,
            error: None,
            origin: SessionOrigin::ResumedFromProject {
                project_id: project_id.into(),
                image_id: image_id.into(),
            },
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn uploaded_image(&self) -> Option<&ImageData> {
        self.uploaded_image.as_ref()
    }

    pub fn staging_type(&self) -> Option<StagingType> {
        self.staging_type
    }

    pub fn selected_style(&self) -> Option<&StyleOption> {
        self.selected_style.as_ref()
    }

    pub fn guidelines(&self) -> &str {
        &self.guidelines
    }

    pub fn generated_image(&self) -> Option<&ImageData> {
        self.generated_image.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn origin(&self) -> &SessionOrigin {
        &self.origin
    }

    /// The earliest step this session can retreat to. Resumed sessions skip
    /// the upload step entirely.
    fn first_step(&self) -> WizardStep {
        match self.origin {
            SessionOrigin::FreshSession => WizardStep::Upload,
            SessionOrigin::ResumedFromProject { .. } => WizardStep::Category,
        }
    }

    /// Store the uploaded photo. Only meaningful at the upload step; does not
    /// auto-advance.
    pub fn select_image(&mut self, image: ImageData) {
        if self.step != WizardStep::Upload {
            return;
        }
        self.uploaded_image = Some(image);
    }

    /// Remove the current upload (the "Remove" control on the upload step).
    pub fn clear_image(&mut self) {
        if self.step != WizardStep::Upload {
            return;
        }
        self.uploaded_image = None;
    }

    /// Move one step forward. A defined no-op at the result step.
    pub fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
    }

    /// Move one step back. A defined no-op at the session's first step; for
    /// resumed sessions the caller inspects [`WorkflowSession::origin`] to
    /// route "back" to the owning project instead.
    pub fn retreat(&mut self) {
        if self.step == self.first_step() {
            return;
        }
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
    }

    /// Select the staging category. Always clears the selected style: a style
    /// is only valid for its own type.
    pub fn select_staging_type(&mut self, staging_type: StagingType) {
        self.staging_type = Some(staging_type);
        self.selected_style = None;
    }

    /// Select a style. Rejected without touching state unless the style
    /// belongs to the currently selected staging type.
    pub fn select_style(&mut self, style: StyleOption) -> Result<(), StagingError> {
        if self.staging_type != Some(style.staging_type) {
            return Err(StagingError::StyleTypeMismatch { style_id: style.id });
        }
        self.selected_style = Some(style);
        Ok(())
    }

    pub fn set_guidelines(&mut self, text: impl Into<String>) {
        self.guidelines = text.into();
    }

    /// Run a staging generation. No-op unless an upload and a style are both
    /// present and no generation is in flight. On success the result is
    /// stored and the wizard jumps to the result step; on failure the error
    /// message is stored and every input survives.
    pub async fn generate(&mut self, generator: &dyn StagingGenerator) {
        if self.is_generating {
            debug!("generation already in flight; ignoring");
            return;
        }
        let (Some(image), Some(style)) = (self.uploaded_image.clone(), self.selected_style.clone())
        else {
            return;
        };
        self.is_generating = true;
        self.error = None;
        let guidelines = self.guidelines.clone();
        match generator.stage(&image, &style, &guidelines).await {
            Ok(result) => {
                self.generated_image = Some(result);
                self.step = WizardStep::Result;
            }
            Err(err) => {
                warn!(style = %style.id, "staging generation failed: {err:?}");
                self.error = Some(err.to_string());
            }
        }
        self.is_generating = false;
    }

    /// Apply a refinement to the current result. No-op without a generated
    /// image or while a call is in flight. A failed refine keeps the previous
    /// result untouched.
    pub async fn refine(&mut self, generator: &dyn StagingGenerator, instructions: &str) {
        if self.is_generating {
            debug!("generation already in flight; ignoring");
            return;
        }
        let Some(current) = self.generated_image.clone() else {
            return;
        };
        self.is_generating = true;
        self.error = None;
        match generator.refine(&current, instructions).await {
            Ok(result) => {
                self.generated_image = Some(result);
            }
            Err(err) => {
                warn!("refinement failed: {err:?}");
                self.error = Some(REFINE_FAILED_MESSAGE.to_string());
            }
        }
        self.is_generating = false;
    }

    /// Re-run the generation with the same inputs. The remote service is
    /// non-deterministic, so the result may differ.
    pub async fn regenerate(&mut self, generator: &dyn StagingGenerator) {
        self.generate(generator).await;
    }

    /// Replace the whole session with the initial upload-step state,
    /// discarding all in-progress data unconditionally.
    pub fn reset(&mut self) {
        *self = WorkflowSession::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_step_bounds_are_unrepresentable() {
        assert_eq!(WizardStep::Upload.prev(), None);
        assert_eq!(WizardStep::Result.next(), None);
        assert_eq!(WizardStep::Upload.index(), 0);
        assert_eq!(WizardStep::Result.index(), 4);
    }

    #[test]
    fn test_advance_and_retreat_no_op_at_bounds() {
        let mut session = WorkflowSession::new();
        session.retreat();
        assert_eq!(session.step(), WizardStep::Upload);
        for _ in 0..10 {
            session.advance();
        }
        assert_eq!(session.step(), WizardStep::Result);
        session.advance();
        assert_eq!(session.step(), WizardStep::Result);
    }

    #[test]
    fn test_type_switch_clears_style() {
        let mut session = WorkflowSession::new();
        session.select_staging_type(StagingType::Interior);
        let style = catalog().by_id("interior-scandi-clean").unwrap().clone();
        session.select_style(style).unwrap();
        assert!(session.selected_style().is_some());

        session.select_staging_type(StagingType::Exterior);
        assert!(session.selected_style().is_none());

        // Re-selecting the same type still clears.
        session.select_staging_type(StagingType::Interior);
        let style = catalog().by_id("interior-mid-century").unwrap().clone();
        session.select_style(style).unwrap();
        session.select_staging_type(StagingType::Interior);
        assert!(session.selected_style().is_none());
    }

    #[test]
    fn test_mismatched_style_rejected_without_state_change() {
        let mut session = WorkflowSession::new();
        session.select_staging_type(StagingType::Exterior);
        let interior = catalog().by_id("interior-scandi-clean").unwrap().clone();
        let before = session.clone();
        assert!(session.select_style(interior).is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn test_style_rejected_when_no_type_selected() {
        let mut session = WorkflowSession::new();
        let style = catalog().by_id("exterior-sunny-day").unwrap().clone();
        assert!(session.select_style(style).is_err());
        assert!(session.selected_style().is_none());
    }

    #[test]
    fn test_select_image_only_at_upload_step() {
        let mut session = WorkflowSession::new();
        session.advance();
        session.select_image(ImageData::new("image/png", "YWJj"));
        assert!(session.uploaded_image().is_none());

        session.retreat();
        session.select_image(ImageData::new("image/png", "YWJj"));
        assert!(session.uploaded_image().is_some());
        assert_eq!(session.step(), WizardStep::Upload);
    }

    #[test]
    fn test_reset_yields_canonical_initial_state() {
        let mut session = WorkflowSession::resume_from_project(
            "p1",
            "i1",
            ImageData::new("image/jpeg", "YWJj"),
            None,
        );
        session.select_staging_type(StagingType::Interior);
        session.set_guidelines("cozy");
        session.reset();
        assert_eq!(session, WorkflowSession::new());
    }

    #[test]
    fn test_resumed_session_skips_upload_and_clamps_retreat() {
        let mut session = WorkflowSession::resume_from_project(
            "p1",
            "i1",
            ImageData::new("image/jpeg", "YWJj"),
            Some(ImageData::new("image/png", "ZGVm")),
        );
        assert_eq!(session.step(), WizardStep::Category);
        assert!(session.uploaded_image().is_some());
        assert!(session.generated_image().is_some());

        session.retreat();
        assert_eq!(session.step(), WizardStep::Category);
        assert!(matches!(
            session.origin(),
            SessionOrigin::ResumedFromProject { .. }
        ));
    }
}
