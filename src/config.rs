//! Conversion settings and configuration file handling.
//!
//! [`ConversionConfig`] is the flat parameter set every conversion runs with.
//! Defaults can be supplied from `~/.config/textart/config.toml` (or a custom
//! path via `--config`); command-line flags override them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Output encoding. Selected once per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Plain glyphs, no escape codes.
    #[default]
    Grayscale,
    /// Nearest xterm 256-colour palette entry per run.
    #[serde(alias = "ansi")]
    Ansi256,
    /// 24-bit escape sequences.
    Truecolor,
    /// Inline-styled markup spans.
    Html,
    /// 2x4 dot Unicode Braille cells.
    Braille,
}

impl ColorMode {
    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Grayscale => "grayscale",
            ColorMode::Ansi256 => "ansi256",
            ColorMode::Truecolor => "truecolor",
            ColorMode::Html => "html",
            ColorMode::Braille => "braille",
        }
    }

    /// Modes that carry a per-cell colour through the pipeline.
    pub fn is_colored(&self) -> bool {
        matches!(self, ColorMode::Ansi256 | ColorMode::Truecolor | ColorMode::Html)
    }
}

pub const DEFAULT_OUTPUT_WIDTH: u32 = 100;
pub const MAX_OUTPUT_WIDTH: u32 = 4096;
pub const DEFAULT_ASPECT_RATIO_CORRECTION: f32 = 0.5;
pub const DEFAULT_EDGE_THRESHOLD: u8 = 75;
pub const DEFAULT_MAX_IMAGE_SIZE: u32 = 3000;
pub const DEFAULT_PRESET: &str = "classic";

/// Every parameter of a single conversion.
///
/// Photometric values use 1.0 as identity; `blur`/`sharpen` use 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub output_width: u32,
    pub color_mode: ColorMode,
    /// Named preset, used unless `custom_chars` is set.
    pub preset: String,
    /// Explicit glyph ramp, ordered low to high density.
    pub custom_chars: Option<String>,
    pub dithering: bool,
    pub edge_detect: bool,
    pub edge_threshold: u8,
    pub aspect_ratio_correction: f32,
    pub invert: bool,
    pub blur: f32,
    pub sharpen: f32,
    pub brightness: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub gamma: f32,
    pub detail_level: f32,
    pub enhance_contrast: bool,
    /// Colour braille cells with their average colour (truecolor runs).
    pub braille_color: bool,
    /// Downscale sources larger than `max_image_size` before filtering.
    pub optimize_memory: bool,
    pub max_image_size: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,
            color_mode: ColorMode::Grayscale,
            preset: DEFAULT_PRESET.to_string(),
            custom_chars: None,
            dithering: false,
            edge_detect: false,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            aspect_ratio_correction: DEFAULT_ASPECT_RATIO_CORRECTION,
            invert: false,
            blur: 0.0,
            sharpen: 0.0,
            brightness: 1.0,
            saturation: 1.0,
            contrast: 1.0,
            gamma: 1.0,
            detail_level: 1.0,
            enhance_contrast: false,
            braille_color: false,
            optimize_memory: false,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

fn clamp_param(name: &str, value: f32, min: f32, max: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(ConvertError::InvalidConfig(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{} {} out of range, clamped to {}", name, value, clamped);
    }
    Ok(clamped)
}

impl ConversionConfig {
    /// Validate and clamp every bounded parameter.
    ///
    /// Structural problems (zero width, non-finite numbers) are errors;
    /// bounded numeric parameters are clamped into range. Preset resolution
    /// happens later, in the density model.
    pub fn normalized(&self) -> Result<Self> {
        if self.output_width == 0 {
            return Err(ConvertError::InvalidConfig(
                "output_width must be at least 1".to_string(),
            ));
        }
        if self.custom_chars.is_none() && self.preset.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "a preset name or custom charset is required".to_string(),
            ));
        }

        let mut cfg = self.clone();
        if cfg.output_width > MAX_OUTPUT_WIDTH {
            log::warn!(
                "output_width {} out of range, clamped to {}",
                cfg.output_width,
                MAX_OUTPUT_WIDTH
            );
            cfg.output_width = MAX_OUTPUT_WIDTH;
        }
        cfg.preset = cfg.preset.trim().to_ascii_lowercase();
        match cfg.custom_chars.as_deref() {
            // custom glyphs replace the preset, so its name carries no meaning
            Some(chars) if !chars.is_empty() => cfg.preset = DEFAULT_PRESET.to_string(),
            Some(_) => {
                log::warn!("empty custom charset, using '{}' preset", DEFAULT_PRESET);
                cfg.custom_chars = None;
                cfg.preset = DEFAULT_PRESET.to_string();
            }
            None => {}
        }
        cfg.aspect_ratio_correction =
            clamp_param("aspect_ratio_correction", cfg.aspect_ratio_correction, 0.1, 4.0)?;
        cfg.blur = clamp_param("blur", cfg.blur, 0.0, 10.0)?;
        cfg.sharpen = clamp_param("sharpen", cfg.sharpen, 0.0, 10.0)?;
        cfg.brightness = clamp_param("brightness", cfg.brightness, 0.1, 3.0)?;
        cfg.saturation = clamp_param("saturation", cfg.saturation, 0.0, 3.0)?;
        cfg.contrast = clamp_param("contrast", cfg.contrast, 0.1, 3.0)?;
        cfg.gamma = clamp_param("gamma", cfg.gamma, 0.1, 5.0)?;
        cfg.detail_level = clamp_param("detail_level", cfg.detail_level, 0.1, 5.0)?;
        cfg.max_image_size = cfg.max_image_size.clamp(64, 16384);
        Ok(cfg)
    }
}

/// Engine-level settings that are not part of a single conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
        }
    }
}

/// Configuration file structure.
/// Loaded from ~/.config/textart/config.toml (or custom path via --config).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConversionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("textart").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/textart/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_identity() {
        let cfg = ConversionConfig::default();
        assert_eq!(cfg.brightness, 1.0);
        assert_eq!(cfg.contrast, 1.0);
        assert_eq!(cfg.saturation, 1.0);
        assert_eq!(cfg.gamma, 1.0);
        assert_eq!(cfg.detail_level, 1.0);
        assert_eq!(cfg.blur, 0.0);
        assert_eq!(cfg.sharpen, 0.0);
        assert!(!cfg.invert);
        assert!(!cfg.enhance_contrast);
    }

    #[test]
    fn test_zero_width_is_invalid() {
        let cfg = ConversionConfig {
            output_width: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.normalized(), Err(ConvertError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let cfg = ConversionConfig {
            output_width: 100_000,
            blur: 42.0,
            brightness: 0.0,
            gamma: 9.0,
            aspect_ratio_correction: 0.0,
            ..Default::default()
        };
        let n = cfg.normalized().unwrap();
        assert_eq!(n.output_width, MAX_OUTPUT_WIDTH);
        assert_eq!(n.blur, 10.0);
        assert_eq!(n.brightness, 0.1);
        assert_eq!(n.gamma, 5.0);
        assert_eq!(n.aspect_ratio_correction, 0.1);
    }

    #[test]
    fn test_nan_is_rejected() {
        let cfg = ConversionConfig {
            contrast: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(cfg.normalized(), Err(ConvertError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_preset_without_custom_is_invalid() {
        let cfg = ConversionConfig {
            preset: "  ".to_string(),
            ..Default::default()
        };
        assert!(cfg.normalized().is_err());
    }

    #[test]
    fn test_custom_chars_make_preset_irrelevant() {
        let a = ConversionConfig {
            preset: "block".into(),
            custom_chars: Some(" .oO".into()),
            ..ConversionConfig::default()
        };
        let b = ConversionConfig {
            preset: "no-such-preset".into(),
            ..a.clone()
        };
        assert_eq!(a.normalized().unwrap(), b.normalized().unwrap());
        assert_eq!(a.normalized().unwrap().preset, DEFAULT_PRESET);
    }

    #[test]
    fn test_empty_custom_chars_fall_back_to_default_preset() {
        let cfg = ConversionConfig {
            preset: "block".into(),
            custom_chars: Some(String::new()),
            ..ConversionConfig::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(cfg.custom_chars, None);
        assert_eq!(cfg.preset, DEFAULT_PRESET);
    }

    #[test]
    fn test_preset_name_is_lowercased() {
        let cfg = ConversionConfig {
            preset: " Block ".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.normalized().unwrap().preset, "block");
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[convert]
output_width = 60
color_mode = "ansi"
dithering = true

[engine]
cache_capacity = 3"#
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.convert.output_width, 60);
        assert_eq!(config.convert.color_mode, ColorMode::Ansi256);
        assert!(config.convert.dithering);
        assert_eq!(config.convert.preset, DEFAULT_PRESET);
        assert_eq!(config.engine.cache_capacity, 3);
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[convert]\noutput_width = \"wide\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("textart/config.toml"));
    }
}
