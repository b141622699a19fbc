/// Prompt construction for the image-generation collaborator
///
/// Pure and deterministic: identical (image, style, guidelines) inputs always
/// produce identical directive text. This is the only unit here that benefits
/// from deterministic testing, so keep it free of I/O and clocks.
use staging::{ImageData, StagingType, StyleOption};

/// System persona for staging calls. Forces the collaborator to return a
/// transformed image rather than a textual description.
pub const STAGING_PERSONA: &str = "You are an expert Real Estate Virtual Staging AI. Your goal is to GENERATE a modified version of the input image that matches the requested style. Do not describe the image. You must output a new image.";

/// System persona for refinement calls.
pub const REFINE_PERSONA: &str = "You are a professional photo editor. Your task is to apply specific adjustments to the provided image while maintaining photorealism.";

/// The composite payload sent to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRequest {
    pub image: ImageData,
    pub directive: String,
    pub persona: &'static str,
}

/// Build the staging payload for (image, style, guidelines).
///
/// A custom prompt whose trimmed text starts with `{` is treated as a
/// structured configuration block; any other custom prompt as a freeform
/// specification; styles without one fall back to a persona template keyed by
/// staging type.
pub fn stage_request(image: &ImageData, style: &StyleOption, guidelines: &str) -> StagingRequest {
    let directive = match &style.custom_prompt {
        Some(custom) if custom.trim_start().starts_with('{') => {
            configuration_directive(custom, guidelines)
        }
        Some(custom) => specification_directive(custom, guidelines),
        None => match style.staging_type {
            StagingType::Exterior => exterior_directive(style, guidelines),
            StagingType::Interior => interior_directive(style, guidelines),
        },
    };

    StagingRequest {
        image: image.clone(),
        directive,
        persona: STAGING_PERSONA,
    }
}

/// Build the refinement payload: minimal, targeted edits that preserve the
/// composition of the supplied image.
pub fn refine_request(image: &ImageData, instructions: &str) -> StagingRequest {
    let directive = format!(
        "[TASK]\n\
         Edit this image based strictly on the user's adjustment instructions.\n\
         \n\
         [INSTRUCTIONS]\n\
         {instructions}\n\
         \n\
         [CONSTRAINTS]\n\
         - Keep the overall style and composition identical to the input image.\n\
         - Only modify the specific elements mentioned in the instructions.\n\
         - Ensure seamless blending and photorealism.\n"
    );

    StagingRequest {
        image: image.clone(),
        directive,
        persona: REFINE_PERSONA,
    }
}

fn configuration_directive(custom: &str, guidelines: &str) -> String {
    let notes = if guidelines.is_empty() {
        String::new()
    } else {
        format!("[USER NOTES]\n{guidelines}\n")
    };
    format!(
        "[TASK]\n\
         Virtually stage the interior of this room based STRICTLY on the following JSON configuration.\n\
         \n\
         [CONFIGURATION]\n\
         {custom}\n\
         \n\
         [INSTRUCTIONS]\n\
         - Analyze the JSON \"staging_content\" for furniture, palette, and decor.\n\
         - Analyze the \"preservation_rules\" to understand constraints.\n\
         - Analyze \"technical_rendering\" for lighting mood.\n\
         - GENERATE a photorealistic image adhering to these rules.\n\
         {notes}"
    )
}

fn specification_directive(custom: &str, guidelines: &str) -> String {
    let notes = if guidelines.is_empty() {
        String::new()
    } else {
        format!("[USER GUIDELINES]\n{guidelines}\n\n")
    };
    format!(
        "[TASK]\n\
         Transform the input image based on the following specifications.\n\
         \n\
         [SPECIFICATION]\n\
         {custom}\n\
         \n\
         {notes}\
         [OUTPUT]\n\
         Photorealistic, high-resolution image.\n"
    )
}

fn exterior_directive(style: &StyleOption, guidelines: &str) -> String {
    let note = if guidelines.is_empty() {
        String::new()
    } else {
        format!("- User Note: {guidelines}\n")
    };
    format!(
        "[TASK]\n\
         Act as a professional architectural visualizer. Redesign this property exterior.\n\
         \n\
         [STYLE]\n\
         {}: {}\n\
         \n\
         [DIRECTIVES]\n\
         - Enhance lighting, landscaping, and materials to match the style.\n\
         - Keep the main structural geometry intact.\n\
         - Make it look like a high-end real estate photograph.\n\
         {note}",
        style.name, style.description
    )
}

fn interior_directive(style: &StyleOption, guidelines: &str) -> String {
    let note = if guidelines.is_empty() {
        String::new()
    } else {
        format!("- User Note: {guidelines}\n")
    };
    format!(
        "[TASK]\n\
         Act as a professional interior designer. Virtually stage this room.\n\
         \n\
         [STYLE]\n\
         {}: {}\n\
         \n\
         [DIRECTIVES]\n\
         - Furnish the room realistically.\n\
         - Keep the floor, walls, and windows in the same position.\n\
         - Ensure realistic lighting and shadows.\n\
         {note}",
        style.name, style.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use staging::catalog;

    fn image() -> ImageData {
        ImageData::new("image/jpeg", "aW1hZ2U=")
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let style = catalog().by_id("interior-scandi-clean").unwrap();
        let a = stage_request(&image(), style, "keep it light");
        let b = stage_request(&image(), style, "keep it light");
        assert_eq!(a.directive, b.directive);
        assert_eq!(a.persona, b.persona);
    }

    #[test]
    fn test_json_preset_uses_configuration_template() {
        let style = catalog().by_id("interior-scandi-clean").unwrap();
        let request = stage_request(&image(), style, "");
        assert!(request.directive.contains("[CONFIGURATION]"));
        assert!(!request.directive.contains("[SPECIFICATION]"));
        assert!(!request.directive.contains("[USER NOTES]"));
    }

    #[test]
    fn test_text_prompt_uses_specification_template() {
        let style = catalog().by_id("exterior-twilight-hero").unwrap();
        let request = stage_request(&image(), style, "");
        assert!(request.directive.contains("[SPECIFICATION]"));
        assert!(!request.directive.contains("[CONFIGURATION]"));
        assert!(request.directive.contains("Photorealistic, high-resolution image."));
    }

    #[test]
    fn test_guidelines_appended_as_annotated_section() {
        let style = catalog().by_id("interior-scandi-clean").unwrap();
        let request = stage_request(&image(), style, "no rugs please");
        assert!(request.directive.contains("[USER NOTES]\nno rugs please"));

        let style = catalog().by_id("exterior-twilight-hero").unwrap();
        let request = stage_request(&image(), style, "no rugs please");
        assert!(request.directive.contains("[USER GUIDELINES]\nno rugs please"));
    }

    #[test]
    fn test_exterior_fallback_template() {
        let style = catalog().by_id("exterior-sunny-day").unwrap();
        let request = stage_request(&image(), style, "");
        assert!(request
            .directive
            .contains("Act as a professional architectural visualizer"));
        assert!(request
            .directive
            .contains("Keep the main structural geometry intact."));
        assert!(request.directive.contains("Sunny Day:"));
        assert!(!request.directive.contains("- User Note:"));
    }

    #[test]
    fn test_interior_fallback_template_with_note() {
        let style = StyleOption {
            id: "interior-plain".to_string(),
            staging_type: StagingType::Interior,
            name: "Plain".to_string(),
            description: "A plain style.".to_string(),
            preview_color: "bg-stone-100".to_string(),
            custom_prompt: None,
        };
        let request = stage_request(&image(), &style, "warm lamps");
        assert!(request
            .directive
            .contains("Act as a professional interior designer"));
        assert!(request
            .directive
            .contains("Keep the floor, walls, and windows in the same position."));
        assert!(request.directive.contains("- User Note: warm lamps"));
    }

    #[test]
    fn test_json_detection_ignores_leading_whitespace() {
        let style = StyleOption {
            id: "interior-padded".to_string(),
            staging_type: StagingType::Interior,
            name: "Padded".to_string(),
            description: String::new(),
            preview_color: String::new(),
            custom_prompt: Some("   \n\t{\"task\": \"vacancy_fill_staging\"}".to_string()),
        };
        let request = stage_request(&image(), &style, "");
        assert!(request.directive.contains("[CONFIGURATION]"));
    }

    #[test]
    fn test_refine_template_constrains_edits() {
        let request = refine_request(&image(), "make the sofa blue");
        assert!(request.directive.contains("[INSTRUCTIONS]\nmake the sofa blue"));
        assert!(request
            .directive
            .contains("Keep the overall style and composition identical"));
        assert_eq!(request.persona, REFINE_PERSONA);
    }

    #[test]
    fn test_request_carries_the_input_image() {
        let style = catalog().by_id("exterior-sunny-day").unwrap();
        let request = stage_request(&image(), style, "");
        assert_eq!(request.image, image());
    }
}
