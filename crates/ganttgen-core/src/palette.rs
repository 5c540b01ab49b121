//! Built-in palette presets.
//!
//! The registry is a fixed, read-only table. Lookups are case-insensitive and
//! ignore surrounding whitespace; unknown names resolve to the default preset.

use serde::Serialize;
use tracing::warn;

use crate::Color;

/// A named palette with optional accent overrides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PalettePreset {
    /// Lookup key
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub description: &'static str,
    pub colors: &'static [&'static str],
    /// Left-border accent on task labels
    pub accent_border: Option<&'static str>,
    /// Text accent on task names
    pub accent_color: Option<&'static str>,
}

const ALTERNATING: &[&str] = &["#F01840", "#402848", "#C01830", "#705E74", "#901226"];
const REDS: &[&str] = &["#F01840", "#C01830", "#901226", "#600C1C", "#300810"];
const PURPLES: &[&str] = &["#705E74", "#402848", "#2A1C30"];

/// Id of the preset used when none (or an unknown one) is requested
pub const DEFAULT_PRESET: &str = "alternating";

static PRESETS: [PalettePreset; 7] = [
    PalettePreset {
        id: "alternating",
        name: "Alternating (Default)",
        description: "Best task differentiation with red/purple mix",
        colors: ALTERNATING,
        accent_border: None,
        accent_color: None,
    },
    PalettePreset {
        id: "alternating_b",
        name: "Alternating + Border",
        description: "Alternating with red left border accent",
        colors: ALTERNATING,
        accent_border: Some("#C01830"),
        accent_color: None,
    },
    PalettePreset {
        id: "reds",
        name: "Reds",
        description: "Warm, energetic red gradient",
        colors: REDS,
        accent_border: None,
        accent_color: None,
    },
    PalettePreset {
        id: "reds_b",
        name: "Reds + Purple Border",
        description: "Red gradient with purple left border",
        colors: REDS,
        accent_border: Some("#402848"),
        accent_color: None,
    },
    PalettePreset {
        id: "purples_a",
        name: "Purples + Burgundy Text",
        description: "Purple gradient with burgundy task names",
        colors: PURPLES,
        accent_border: None,
        accent_color: Some("#901226"),
    },
    PalettePreset {
        id: "purples_b",
        name: "Purples + Red Border",
        description: "Purple gradient with red left border",
        colors: PURPLES,
        accent_border: Some("#C01830"),
        accent_color: None,
    },
    PalettePreset {
        id: "purples_c",
        name: "Purples + Both Accents",
        description: "Purple with burgundy text and red border",
        colors: PURPLES,
        accent_border: Some("#C01830"),
        accent_color: Some("#901226"),
    },
];

/// All presets in display order
pub fn presets() -> &'static [PalettePreset] {
    &PRESETS
}

/// Colors used when the input declares no palette
pub fn default_palette() -> Vec<Color> {
    ALTERNATING.iter().map(|c| (*c).to_string()).collect()
}

/// Look up a preset by id, ignoring case and surrounding whitespace
pub fn find_preset(name: &str) -> Option<&'static PalettePreset> {
    let key = name.trim();
    PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(key))
}

fn default_preset() -> &'static PalettePreset {
    &PRESETS[0]
}

/// The owned outcome of resolving a preset name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPalette {
    /// Id of the preset actually used
    pub id: &'static str,
    pub colors: Vec<Color>,
    pub accent_border: Option<Color>,
    pub accent_color: Option<Color>,
}

impl From<&PalettePreset> for ResolvedPalette {
    fn from(preset: &PalettePreset) -> Self {
        Self {
            id: preset.id,
            colors: preset.colors.iter().map(|c| (*c).to_string()).collect(),
            accent_border: preset.accent_border.map(str::to_string),
            accent_color: preset.accent_color.map(str::to_string),
        }
    }
}

/// Resolve a preset name to a palette.
///
/// Absent, blank or unknown names yield the default preset; unknown names
/// are logged.
pub fn resolve_preset(name: Option<&str>) -> ResolvedPalette {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return default_preset().into();
    };
    match find_preset(name) {
        Some(preset) => preset.into(),
        None => {
            warn!(preset = name, fallback = DEFAULT_PRESET, "Unknown palette preset");
            default_preset().into()
        }
    }
}
