use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Staging category. Selecting a type invalidates any style picked for the
/// other type; styles are partitioned per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingType {
    Interior,
    Exterior,
}

impl fmt::Display for StagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingType::Interior => write!(f, "interior"),
            StagingType::Exterior => write!(f, "exterior"),
        }
    }
}

/// A catalog style definition. Immutable configuration data; never created
/// or mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOption {
    pub id: String,
    pub staging_type: StagingType,
    pub name: String,
    pub description: String,
    pub preview_color: String,
    /// Either a freeform directive or a serialized JSON configuration block
    /// (furniture palette, preservation rules, rendering ambiance).
    pub custom_prompt: Option<String>,
}

/// Read-only style registry, indexed by type and id at startup.
#[derive(Debug)]
pub struct StyleCatalog {
    styles: Vec<StyleOption>,
    by_type: HashMap<StagingType, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl StyleCatalog {
    fn build(styles: Vec<StyleOption>) -> Self {
        let mut by_type: HashMap<StagingType, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::new();
        for (idx, style) in styles.iter().enumerate() {
            by_type.entry(style.staging_type).or_default().push(idx);
            let previous = by_id.insert(style.id.clone(), idx);
            debug_assert!(previous.is_none(), "duplicate style id: {}", style.id);
        }
        Self {
            styles,
            by_type,
            by_id,
        }
    }

    pub fn all(&self) -> &[StyleOption] {
        &self.styles
    }

    /// Styles for one staging type, in catalog order.
    pub fn for_type(&self, staging_type: StagingType) -> Vec<&StyleOption> {
        self.by_type
            .get(&staging_type)
            .map(|indices| indices.iter().map(|&i| &self.styles[i]).collect())
            .unwrap_or_default()
    }

    pub fn by_id(&self, id: &str) -> Option<&StyleOption> {
        self.by_id.get(id).map(|&i| &self.styles[i])
    }
}

/// The production style catalog, built once on first access.
pub fn catalog() -> &'static StyleCatalog {
    static CATALOG: Lazy<StyleCatalog> = Lazy::new(|| StyleCatalog::build(production_styles()));
    &CATALOG
}

fn style(
    id: &str,
    staging_type: StagingType,
    name: &str,
    description: &str,
    preview_color: &str,
    custom_prompt: Option<&str>,
) -> StyleOption {
    StyleOption {
        id: id.to_string(),
        staging_type,
        name: name.to_string(),
        description: description.to_string(),
        preview_color: preview_color.to_string(),
        custom_prompt: custom_prompt.map(|p| p.to_string()),
    }
}

fn production_styles() -> Vec<StyleOption> {
    vec![
        // Exterior styles
        style(
            "exterior-twilight-hero",
            StagingType::Exterior,
            "Modern Twilight Hero",
            "Cinematic early twilight, warm lighting, ultra-realistic architectural photography.",
            "bg-blue-900",
            Some(TWILIGHT_HERO_PROMPT),
        ),
        style(
            "exterior-sunny-day",
            StagingType::Exterior,
            "Sunny Day",
            "Bright, inviting natural daylight with blue skies and enhanced landscaping.",
            "bg-sky-500",
            None,
        ),
        style(
            "exterior-modern-luxury",
            StagingType::Exterior,
            "Modern Luxury",
            "High-end aesthetic with manicured grounds and modern exterior finishes.",
            "bg-cyan-700",
            None,
        ),
        // Interior styles (JSON presets)
        style(
            "interior-scandi-clean",
            StagingType::Interior,
            "Scandi Clean",
            "Safe, Bright, Minimalist. Best for small spaces.",
            "bg-stone-200",
            Some(SCANDI_CLEAN_PRESET),
        ),
        style(
            "interior-modern-farmhouse",
            StagingType::Interior,
            "Modern Farmhouse",
            "Cozy, Family, Rustic. Best for suburban homes.",
            "bg-amber-100",
            Some(MODERN_FARMHOUSE_PRESET),
        ),
        style(
            "interior-mid-century",
            StagingType::Interior,
            "Mid-Century Modern",
            "Trendy, Cool, Retro. Best for lofts.",
            "bg-orange-300",
            Some(MID_CENTURY_PRESET),
        ),
        style(
            "interior-transitional-luxury",
            StagingType::Interior,
            "Transitional Luxury",
            "Expensive, Neutral, High-End. Best for luxury listings.",
            "bg-stone-300",
            Some(TRANSITIONAL_LUXURY_PRESET),
        ),
    ]
}

const TWILIGHT_HERO_PROMPT: &str = "Transform this photo of the house into a professional, cinematic architectural photograph during early twilight, just before sunset, keeping the house\u{2019}s structure, roofline, windows, doors, and key features recognizable. Maintain ample natural ambient light so colors, materials, and textures remain vibrant and visible, while interior and exterior lights gently glow, creating a warm, inviting contrast against the soft evening sky. Render in ultra-realistic, cinematic style with micro-contrast, texture fidelity, soft layered shadows, and smooth highlight roll-off. Include reflections on glass, wood, and stone surfaces, gradual depth-of-field with realistic bokeh, and clear foreground/midground/background separation. Add subtle atmospheric effects: soft haze. Include organic photographic imperfections like chromatic aberration and sensor grain. Render as if photographed by a high-end architectural photographer at early twilight, cinematic, immersive, bright yet dramatic, and dramatically more polished than the original, while keeping the house instantly identifiable. High-resolution, hyper-detailed, professional-grade result.";

const SCANDI_CLEAN_PRESET: &str = r#"{
  "task": "vacancy_fill_staging",
  "style_preset": "SCANDINAVIAN_MINIMALIST",
  "preservation_rules": {
    "hard_constraints": ["keep_original_walls", "keep_original_flooring", "keep_window_views", "no_structural_changes"],
    "lighting_logic": "match_natural_window_direction"
  },
  "staging_content": {
    "palette": ["Bright White", "Light Heather Grey", "Blonde Oak Wood", "Soft Sage Green"],
    "furniture_selection": [
      {
        "type": "Sofa",
        "desc": "Low-profile modern sofa in light grey premium fabric with light oak legs",
        "placement": "float_center_facing_focal_point"
      },
      {
        "type": "Coffee_Table",
        "desc": "Round nesting tables, white top with light wood legs",
        "placement": "center_of_rug"
      },
      {
        "type": "Accent_Chair",
        "desc": "Wishbone-style wooden chair or simple armchair in cream boucle",
        "placement": "angle_towards_sofa"
      }
    ],
    "decor_layer": {
      "textiles": "Textured white wool rug, linen throw pillows",
      "greenery": "Single Monstera plant in a woven basket",
      "art": "Large minimalist line-art frame on main wall"
    }
  },
  "technical_rendering": {
    "ambiance": "Soft, airy, high-key lighting",
    "shadow_quality": "diffuse_and_soft"
  }
}"#;

const MODERN_FARMHOUSE_PRESET: &str = r#"{
  "task": "vacancy_fill_staging",
  "style_preset": "MODERN_FARMHOUSE",
  "preservation_rules": {
    "hard_constraints": ["keep_original_walls", "keep_original_flooring", "keep_window_views", "no_structural_changes"],
    "lighting_logic": "match_natural_window_direction"
  },
  "staging_content": {
    "palette": ["Cream", "Charcoal/Matte Black", "Reclaimed Wood", "Navy Blue Accents"],
    "furniture_selection": [
      {
        "type": "Sofa",
        "desc": "Overstuffed white slipcovered sofa, very inviting and casual",
        "placement": "float_center_facing_focal_point"
      },
      {
        "type": "Coffee_Table",
        "desc": "Solid reclaimed rustic wood table with iron hardware",
        "placement": "center_of_rug"
      },
      {
        "type": "Accent_Chair",
        "desc": "Leather club chair in cognac or spindle-back wooden chair",
        "placement": "angle_towards_sofa"
      }
    ],
    "decor_layer": {
      "textiles": "Jute or sisal natural fiber rug, chunky knit throw blanket",
      "greenery": "Faux olive tree in terracotta pot",
      "art": "Pastel landscape or botanical prints with black frames"
    }
  },
  "technical_rendering": {
    "ambiance": "Warm, inviting, golden undertones",
    "shadow_quality": "warm_and_grounded"
  }
}"#;

const MID_CENTURY_PRESET: &str = r#"{
  "task": "vacancy_fill_staging",
  "style_preset": "MID_CENTURY_MODERN",
  "preservation_rules": {
    "hard_constraints": ["keep_original_walls", "keep_original_flooring", "keep_window_views", "no_structural_changes"],
    "lighting_logic": "match_natural_window_direction"
  },
  "staging_content": {
    "palette": ["Walnut Wood", "Burnt Orange", "Teal", "Mustard Yellow", "Slate Grey"],
    "furniture_selection": [
      {
        "type": "Sofa",
        "desc": "Tufted leather sofa in tan or sleek grey tweed with tapered wooden legs",
        "placement": "float_center_facing_focal_point"
      },
      {
        "type": "Coffee_Table",
        "desc": "Noguchi-style glass table or walnut amoeba shape table",
        "placement": "center_of_rug"
      },
      {
        "type": "Accent_Chair",
        "desc": "Eames-style lounge chair or sculptural velvet armchair",
        "placement": "angle_towards_sofa"
      }
    ],
    "decor_layer": {
      "textiles": "Geometric pattern rug, velvet cushions",
      "greenery": "Snake plant in ceramic planter on a stand",
      "art": "Large abstract color-block canvas"
    }
  },
  "technical_rendering": {
    "ambiance": "Cool, crisp, architectural magazine look",
    "shadow_quality": "sharp_and_defined"
  }
}"#;

const TRANSITIONAL_LUXURY_PRESET: &str = r#"{
  "task": "vacancy_fill_staging",
  "style_preset": "TRANSITIONAL_LUXURY",
  "preservation_rules": {
    "hard_constraints": ["keep_original_walls", "keep_original_flooring", "keep_window_views", "no_structural_changes"],
    "lighting_logic": "match_natural_window_direction"
  },
  "staging_content": {
    "palette": ["Taupe", "Champagne", "Ivory", "Dark Espresso Wood", "Metallic Gold/Silver"],
    "furniture_selection": [
      {
        "type": "Sofa",
        "desc": "Large tailored sectional in performance beige linen with nailhead trim",
        "placement": "float_center_facing_focal_point"
      },
      {
        "type": "Coffee_Table",
        "desc": "Large square glass table with brass or chrome metal frame",
        "placement": "center_of_rug"
      },
      {
        "type": "Accent_Chair",
        "desc": "Pair of high-back upholstered armchairs in neutral tone",
        "placement": "symmetrical_arrangement"
      }
    ],
    "decor_layer": {
      "textiles": "Plush silk-blend rug, high-end decorative pillows",
      "greenery": "White orchids in a silver vase",
      "art": "Subtle textured canvas or oversized mirror"
    }
  },
  "technical_rendering": {
    "ambiance": "Balanced, symmetrical, 'hotel lobby' lighting",
    "shadow_quality": "subtle_ambient_occlusion"
  }
}"#;
