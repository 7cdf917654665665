//! Subcommand handlers for convert, list-presets, suggest and config actions.

use serde::Serialize;
use std::path::{Path, PathBuf};

use textart::config::{default_path, Config, ConfigError};
use textart::{list_presets, suggest_settings, ColorMode, ConvertError, Converter, SourceImage};

use super::args::{ConfigAction, ConvertArgs};

/// Errors surfaced to the user by the command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialise config: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type CliResult = Result<(), CliError>;

/// Convert one image and print or save the result.
pub fn run_convert(args: &ConvertArgs, config: &Config) -> CliResult {
    let source = SourceImage::open(&args.image)?;

    let mut cfg = if args.auto_settings {
        let width = args.width.unwrap_or(config.convert.output_width);
        let suggested = suggest_settings(&source.pixels, width)?;
        log::info!(
            "auto settings: width {}, {} mode, preset '{}', dithering {}, edges {}",
            suggested.output_width,
            suggested.color_mode.name(),
            suggested.preset,
            suggested.dithering,
            suggested.edge_detect
        );
        suggested
    } else {
        config.convert.clone()
    };
    args.apply(&mut cfg);

    let converter = Converter::new(config.engine.cache_capacity);
    let mut art = converter.convert(&source, &cfg)?;

    let page_requested = args.html_page
        || args
            .output
            .as_deref()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    if page_requested {
        if cfg.color_mode == ColorMode::Html {
            art = html_page(&art, args.font_size, &args.font_family, &args.bg_color);
        } else if args.html_page {
            log::warn!(
                "--html-page needs html colour mode, writing {} output as-is",
                cfg.color_mode.name()
            );
        }
    }

    match &args.output {
        Some(path) => {
            write_output(path, &art)?;
            println!("Saved to {}", path.display());
        }
        None => println!("{}", art),
    }
    Ok(())
}

fn write_output(path: &Path, content: &str) -> CliResult {
    let to_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(to_err)?;
        }
    }
    std::fs::write(path, content).map_err(to_err)
}

/// Wrap embeddable HTML art in a standalone page.
pub fn html_page(art: &str, font_size: u32, font_family: &str, bg_color: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>textart</title>\n\
         <style>\nbody {{ background: {bg}; margin: 0; padding: 1em; }}\n\
         body > div {{ font-family: {family} !important; font-size: {size}pt; }}\n</style>\n\
         </head>\n<body>\n{art}\n</body>\n</html>\n",
        bg = bg_color,
        family = font_family,
        size = font_size,
        art = art
    )
}

#[derive(Serialize)]
struct PresetEntry<'a> {
    name: &'a str,
    glyphs: &'a str,
}

/// Print preset names, optionally with glyphs, as text or JSON.
pub fn run_list_presets(glyphs: bool, json: bool) -> CliResult {
    let presets = list_presets();
    if json {
        let out = if glyphs {
            let entries: Vec<PresetEntry> = presets
                .iter()
                .map(|&(name, glyphs)| PresetEntry { name, glyphs })
                .collect();
            serde_json::to_string_pretty(&entries)?
        } else {
            let names: Vec<&str> = presets.iter().map(|(name, _)| *name).collect();
            serde_json::to_string(&names)?
        };
        println!("{}", out);
        return Ok(());
    }

    let width = presets.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, chars) in presets {
        if glyphs {
            println!("  {:<width$}  {}", name, chars, width = width);
        } else {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Print suggested settings for an image as JSON.
pub fn run_suggest(image: &Path, width: u32) -> CliResult {
    let source = SourceImage::open(image)?;
    let cfg = suggest_settings(&source.pixels, width)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    path: Option<&Path>,
    config: &Config,
) -> CliResult {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            println!();
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(CliError::ConfigExists(config_path));
            }
            let body = toml::to_string_pretty(&Config::default())?;
            let content = format!("# textart configuration\n\n{}", body);
            write_output(&config_path, &content)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
