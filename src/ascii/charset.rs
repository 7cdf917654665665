//! Character presets for density mapping.
//!
//! Each preset is an ordered glyph ramp from least dense (usually a space) to
//! most dense. The registry is built once on first use and shared read-only.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::config::DEFAULT_PRESET;
use crate::error::{ConvertError, Result};

/// Preset identifiers and their ramps, in display order.
const PRESET_TABLE: &[(&str, &str)] = &[
    ("block", " ░▒▓█▄▀"),
    ("dense", " .,:;+~=^*#%@$"),
    ("lineart", "║╗╝╔╩╦╠═╬╧╨╤╥╙╘╒╓╫╪┘┌┐└├┤┬┴┼"),
    ("classic", " .:-=+*#%@"),
    ("unicode", " ▁▂▃▄▅▆▇█▖▗▘▙▚▛▜▝▞▟"),
    (
        "detailed",
        " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$",
    ),
    ("binary", "01"),
    ("minimal", " .:-=+*#%@"),
    ("circles", " .°ᵒO@"),
    ("shading", " ░▒▓█"),
    ("geometric", " ▢▣▤▥▦▧▨▩■□◊○●◐◑◒◓◔◕◖◗"),
    ("dots", " ⠀⠁⠂⠃⠄⠅⠆⠇⠈⠉⠊⠋⠌⠍⠎⠏⠐⠑⠒⠓⠔⠕⠖⠗⠘⠙⠚⠛⠜⠝⠞⠟"),
    ("contrast", " █"),
    ("photo", " .,:;'\"^=+*#%&@$"),
    ("pixel", " ▖▗▘▙▚▛▜▝▞▟■"),
    ("ultra", " .'`^\",:;Il!i><~+_-?][}{1)(|\\/#%@&$"),
];

static PRESETS: Lazy<HashMap<&'static str, Vec<char>>> = Lazy::new(|| {
    PRESET_TABLE
        .iter()
        .map(|(name, glyphs)| (*name, glyphs.chars().collect()))
        .collect()
});

/// Names of every preset, in display order.
pub fn preset_names() -> Vec<&'static str> {
    PRESET_TABLE.iter().map(|(name, _)| *name).collect()
}

/// Glyph ramp of a named preset.
pub fn preset_glyphs(name: &str) -> Option<&'static [char]> {
    PRESETS.get(name).map(|v| v.as_slice())
}

/// (name, glyph string) pairs for display.
pub fn list_presets() -> Vec<(&'static str, &'static str)> {
    PRESET_TABLE.to_vec()
}

/// The glyph ramp one conversion maps intensities onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Resolve the ramp for a conversion.
    ///
    /// A non-empty custom charset wins over the named preset. An empty custom
    /// charset falls back to the default preset. A named preset that does not
    /// exist is an error.
    pub fn resolve(preset: &str, custom: Option<&str>) -> Result<Self> {
        if let Some(custom) = custom {
            if !custom.is_empty() {
                return Ok(Self {
                    glyphs: custom.chars().collect(),
                });
            }
            log::warn!("empty custom charset, using '{}' preset", DEFAULT_PRESET);
            return Self::named(DEFAULT_PRESET);
        }
        Self::named(preset)
    }

    /// Ramp of a named preset.
    pub fn named(name: &str) -> Result<Self> {
        preset_glyphs(name)
            .map(|glyphs| Self {
                glyphs: glyphs.to_vec(),
            })
            .ok_or_else(|| ConvertError::UnknownPreset {
                name: name.to_string(),
                available: preset_names().into_iter().map(String::from).collect(),
            })
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of density levels. Never zero.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// True when every glyph is plain ASCII.
    pub fn is_ascii(&self) -> bool {
        self.glyphs.iter().all(|c| c.is_ascii())
    }

    #[inline]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}
