//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use textart::ConversionConfig;

use super::enums::ColorChoice;

/// Convert images into text art
#[derive(Parser, Debug)]
#[command(name = "textart")]
#[command(version, about = "Convert images into text art", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image
    Convert(ConvertArgs),
    /// List character presets
    ListPresets {
        /// Show each preset's glyphs
        #[arg(long)]
        glyphs: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest settings for an image (JSON)
    Suggest {
        image: PathBuf,
        /// Requested output width
        #[arg(long, short, default_value = "100")]
        width: u32,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Flags of the `convert` subcommand. Unset options keep the config file value.
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Image file to convert
    pub image: PathBuf,

    /// Output width in characters
    #[arg(long, short)]
    pub width: Option<u32>,

    /// Colour mode
    #[arg(long, short = 'm')]
    pub color: Option<ColorChoice>,

    /// Character preset (see list-presets)
    #[arg(long, short)]
    pub preset: Option<String>,

    /// Custom characters, least to most dense
    #[arg(long)]
    pub chars: Option<String>,

    /// Floyd-Steinberg dithering
    #[arg(long, overrides_with = "no_dither")]
    pub dither: bool,

    /// Turn dithering off
    #[arg(long, overrides_with = "dither")]
    pub no_dither: bool,

    /// Edge detection
    #[arg(long, overrides_with = "no_edges")]
    pub edges: bool,

    /// Turn edge detection off
    #[arg(long, overrides_with = "edges")]
    pub no_edges: bool,

    /// Edge threshold (0-255)
    #[arg(long)]
    pub edge_threshold: Option<u8>,

    /// Glyph aspect ratio correction
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Invert brightness (for light backgrounds)
    #[arg(long, overrides_with = "no_invert")]
    pub invert: bool,

    /// Do not invert brightness
    #[arg(long, overrides_with = "invert")]
    pub no_invert: bool,

    #[arg(long)]
    pub blur: Option<f32>,

    #[arg(long)]
    pub sharpen: Option<f32>,

    #[arg(long)]
    pub brightness: Option<f32>,

    #[arg(long)]
    pub saturation: Option<f32>,

    #[arg(long)]
    pub contrast: Option<f32>,

    #[arg(long)]
    pub gamma: Option<f32>,

    /// Tonal detail level (1.0 = unchanged)
    #[arg(long)]
    pub detail: Option<f32>,

    /// Auto-stretch the histogram
    #[arg(long, overrides_with = "no_enhance_contrast")]
    pub enhance_contrast: bool,

    /// Do not stretch the histogram
    #[arg(long, overrides_with = "enhance_contrast")]
    pub no_enhance_contrast: bool,

    /// Colour braille cells
    #[arg(long, overrides_with = "no_braille_color")]
    pub braille_color: bool,

    /// Monochrome braille cells
    #[arg(long, overrides_with = "braille_color")]
    pub no_braille_color: bool,

    /// Downscale large images before filtering
    #[arg(long, overrides_with = "no_optimize_memory")]
    pub optimize_memory: bool,

    /// Keep full resolution before filtering
    #[arg(long, overrides_with = "optimize_memory")]
    pub no_optimize_memory: bool,

    /// Longest side kept by --optimize-memory
    #[arg(long)]
    pub max_image_size: Option<u32>,

    /// Start from suggested settings for this image
    #[arg(long)]
    pub auto_settings: bool,

    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Wrap HTML output in a standalone page
    #[arg(long)]
    pub html_page: bool,

    /// HTML page font size in points
    #[arg(long, default_value = "8")]
    pub font_size: u32,

    /// HTML page font family
    #[arg(long, default_value = "monospace")]
    pub font_family: String,

    /// HTML page background colour
    #[arg(long, default_value = "#000000")]
    pub bg_color: String,
}

impl ConvertArgs {
    /// Overlay the flags that were given onto `cfg`.
    pub fn apply(&self, cfg: &mut ConversionConfig) {
        if let Some(w) = self.width {
            cfg.output_width = w;
        }
        if let Some(c) = self.color {
            cfg.color_mode = c.into();
        }
        if let Some(p) = &self.preset {
            cfg.preset = p.clone();
        }
        if let Some(chars) = &self.chars {
            cfg.custom_chars = Some(chars.clone());
        }
        if let Some(t) = self.edge_threshold {
            cfg.edge_threshold = t;
        }
        if let Some(a) = self.aspect {
            cfg.aspect_ratio_correction = a;
        }
        if let Some(v) = self.blur {
            cfg.blur = v;
        }
        if let Some(v) = self.sharpen {
            cfg.sharpen = v;
        }
        if let Some(v) = self.brightness {
            cfg.brightness = v;
        }
        if let Some(v) = self.saturation {
            cfg.saturation = v;
        }
        if let Some(v) = self.contrast {
            cfg.contrast = v;
        }
        if let Some(v) = self.gamma {
            cfg.gamma = v;
        }
        if let Some(v) = self.detail {
            cfg.detail_level = v;
        }
        if let Some(v) = self.max_image_size {
            cfg.max_image_size = v;
        }
        toggle(&mut cfg.dithering, self.dither, self.no_dither);
        toggle(&mut cfg.edge_detect, self.edges, self.no_edges);
        toggle(&mut cfg.invert, self.invert, self.no_invert);
        toggle(&mut cfg.enhance_contrast, self.enhance_contrast, self.no_enhance_contrast);
        toggle(&mut cfg.braille_color, self.braille_color, self.no_braille_color);
        toggle(&mut cfg.optimize_memory, self.optimize_memory, self.no_optimize_memory);
    }
}

/// `--flag` turns a setting on, `--no-flag` off; neither keeps the config value.
fn toggle(setting: &mut bool, on: bool, off: bool) {
    if on {
        *setting = true;
    } else if off {
        *setting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textart::ColorMode;

    fn convert_args(argv: &[&str]) -> ConvertArgs {
        match Args::parse_from(argv).command {
            Command::Convert(args) => args,
            other => panic!("Expected Convert subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_defaults() {
        let args = convert_args(&["textart", "convert", "cat.png"]);
        assert_eq!(args.image, PathBuf::from("cat.png"));
        assert!(args.width.is_none());
        assert!(args.color.is_none());
        assert!(args.preset.is_none());
        assert!(!args.dither);
        assert!(!args.edges);
        assert!(args.output.is_none());
        assert!(!args.html_page);
        assert_eq!(args.font_size, 8);
        assert_eq!(args.font_family, "monospace");
        assert_eq!(args.bg_color, "#000000");
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let args = convert_args(&["textart", "convert", "cat.png"]);
        let mut cfg = ConversionConfig {
            output_width: 42,
            dithering: true,
            ..ConversionConfig::default()
        };
        args.apply(&mut cfg);
        assert_eq!(cfg.output_width, 42);
        assert!(cfg.dithering);
    }

    #[test]
    fn test_flags_override_config() {
        let args = convert_args(&[
            "textart", "convert", "cat.png", "-w", "60", "-m", "ansi", "-p", "block", "--dither",
            "--edges", "--edge-threshold", "90", "--gamma", "1.5", "--invert",
        ]);
        let mut cfg = ConversionConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.output_width, 60);
        assert_eq!(cfg.color_mode, ColorMode::Ansi256);
        assert_eq!(cfg.preset, "block");
        assert!(cfg.dithering);
        assert!(cfg.edge_detect);
        assert_eq!(cfg.edge_threshold, 90);
        assert_eq!(cfg.gamma, 1.5);
        assert!(cfg.invert);
    }

    #[test]
    fn test_no_flags_switch_config_off() {
        let args = convert_args(&[
            "textart", "convert", "cat.png", "--no-dither", "--no-edges", "--no-invert",
        ]);
        let mut cfg = ConversionConfig {
            dithering: true,
            edge_detect: true,
            invert: true,
            optimize_memory: true,
            ..ConversionConfig::default()
        };
        args.apply(&mut cfg);
        assert!(!cfg.dithering);
        assert!(!cfg.edge_detect);
        assert!(!cfg.invert);
        assert!(cfg.optimize_memory);
    }

    #[test]
    fn test_last_of_flag_pair_wins() {
        let args = convert_args(&["textart", "convert", "cat.png", "--dither", "--no-dither"]);
        assert!(!args.dither);
        assert!(args.no_dither);
        let mut cfg = ConversionConfig {
            dithering: true,
            ..ConversionConfig::default()
        };
        args.apply(&mut cfg);
        assert!(!cfg.dithering);

        let args = convert_args(&["textart", "convert", "cat.png", "--no-edges", "--edges"]);
        let mut cfg = ConversionConfig::default();
        args.apply(&mut cfg);
        assert!(cfg.edge_detect);
    }

    #[test]
    fn test_chars_option() {
        let args = convert_args(&["textart", "convert", "cat.png", "--chars", " .oO"]);
        let mut cfg = ConversionConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.custom_chars.as_deref(), Some(" .oO"));
    }

    #[test]
    fn test_global_config_option() {
        let args = Args::parse_from(["textart", "--config", "/tmp/config.toml", "list-presets"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["textart", "list-presets", "-c", "/tmp/test.toml", "-v"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_list_presets_subcommand() {
        let args = Args::parse_from(["textart", "list-presets", "--glyphs", "--json"]);
        assert!(matches!(
            args.command,
            Command::ListPresets {
                glyphs: true,
                json: true
            }
        ));
    }

    #[test]
    fn test_suggest_subcommand() {
        let args = Args::parse_from(["textart", "suggest", "cat.png", "--width", "80"]);
        match args.command {
            Command::Suggest { image, width } => {
                assert_eq!(image, PathBuf::from("cat.png"));
                assert_eq!(width, 80);
            }
            _ => panic!("Expected Suggest subcommand"),
        }
    }

    #[test]
    fn test_config_show_subcommand() {
        let args = Args::parse_from(["textart", "config", "show"]);
        match args.command {
            Command::Config {
                action: ConfigAction::Show,
            } => (),
            _ => panic!("Expected Config Show subcommand"),
        }
    }

    #[test]
    fn test_config_init_subcommand() {
        let args = Args::parse_from(["textart", "config", "init"]);
        match args.command {
            Command::Config {
                action: ConfigAction::Init,
            } => (),
            _ => panic!("Expected Config Init subcommand"),
        }
    }

    #[test]
    fn test_missing_image_is_an_error() {
        assert!(Args::try_parse_from(["textart", "convert"]).is_err());
    }
}
