//! Heuristic settings for a given image.
//!
//! Looks at tonal range, colourfulness, palette size and edge density of a
//! small preview and proposes a [`ConversionConfig`]. Pure: no caching, no
//! I/O.

use std::collections::HashSet;

use crate::ascii::{detect_edges, histogram, resample_exact};
use crate::config::{ColorMode, ConversionConfig, DEFAULT_EDGE_THRESHOLD};
use crate::error::Result;
use crate::pixels::PixelBuffer;

/// Longest side of the analysis preview, in cells.
const PREVIEW_SIZE: u32 = 64;

/// Colourfulness above which colour output is worth it.
const COLORFUL_THRESHOLD: f64 = 15.0;
/// Luminance standard deviation under which the image is considered flat.
const LOW_CONTRAST_STDDEV: f64 = 40.0;
const DARK_MEAN: f64 = 80.0;
const BRIGHT_MEAN: f64 = 180.0;
/// Fraction of edge cells above which the image is treated as line-heavy.
const HIGH_EDGE_DENSITY: f64 = 0.15;
const LOW_EDGE_DENSITY: f64 = 0.05;
/// Fewer distinct (5-bit) colours than this means flat graphics.
const FEW_COLORS: usize = 16;

/// Image statistics the suggestion is based on.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStats {
    pub mean_luma: f64,
    pub stddev_luma: f64,
    pub colorfulness: f64,
    pub distinct_colors: usize,
    pub edge_density: f64,
}

/// Measure `buffer`.
pub fn analyze(buffer: &PixelBuffer) -> Result<ImageStats> {
    let hist = histogram(buffer);
    let total: u64 = hist.iter().sum();
    let n = total.max(1) as f64;
    let mean = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum::<f64>()
        / n;
    let variance = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| (v as f64 - mean).powi(2) * c as f64)
        .sum::<f64>()
        / n;

    let preview = resample_exact(
        buffer,
        buffer.width.min(PREVIEW_SIZE) as usize,
        buffer.height.min(PREVIEW_SIZE) as usize,
    )?;

    // Hasler and Suesstrunk colourfulness metric
    let count = preview.colors.len().max(1) as f64;
    let (mut sum_rg, mut sum_yb, mut sq_rg, mut sq_yb) = (0.0, 0.0, 0.0, 0.0);
    for c in &preview.colors {
        let (r, g, b) = (c.r as f64, c.g as f64, c.b as f64);
        let rg = r - g;
        let yb = 0.5 * (r + g) - b;
        sum_rg += rg;
        sum_yb += yb;
        sq_rg += rg * rg;
        sq_yb += yb * yb;
    }
    let mean_rg = sum_rg / count;
    let mean_yb = sum_yb / count;
    let var_rg = (sq_rg / count - mean_rg * mean_rg).max(0.0);
    let var_yb = (sq_yb / count - mean_yb * mean_yb).max(0.0);
    let colorfulness =
        (var_rg + var_yb).sqrt() + 0.3 * (mean_rg * mean_rg + mean_yb * mean_yb).sqrt();

    let distinct_colors = preview
        .colors
        .iter()
        .map(|c| (c.r >> 3, c.g >> 3, c.b >> 3))
        .collect::<HashSet<_>>()
        .len();

    let edges = detect_edges(&preview);
    let edge_cells = edges
        .cells
        .iter()
        .filter(|c| c.strength >= DEFAULT_EDGE_THRESHOLD)
        .count();
    let edge_density = edge_cells as f64 / edges.cells.len().max(1) as f64;

    Ok(ImageStats {
        mean_luma: mean,
        stddev_luma: variance.sqrt(),
        colorfulness,
        distinct_colors,
        edge_density,
    })
}

/// Propose conversion settings for `buffer` at up to `requested_width` columns.
pub fn suggest_settings(buffer: &PixelBuffer, requested_width: u32) -> Result<ConversionConfig> {
    let stats = analyze(buffer)?;
    log::debug!("image stats: {:?}", stats);

    let mut cfg = ConversionConfig {
        output_width: requested_width.min(buffer.width).max(1),
        ..ConversionConfig::default()
    };

    if stats.colorfulness > COLORFUL_THRESHOLD {
        cfg.color_mode = ColorMode::Truecolor;
    }

    if stats.stddev_luma < LOW_CONTRAST_STDDEV {
        cfg.enhance_contrast = true;
    }
    if stats.mean_luma < DARK_MEAN {
        cfg.brightness = 1.2;
        cfg.gamma = 1.3;
    } else if stats.mean_luma > BRIGHT_MEAN {
        cfg.gamma = 0.8;
    }

    if stats.distinct_colors < FEW_COLORS {
        cfg.preset = "block".to_string();
        cfg.dithering = false;
    } else if stats.edge_density > HIGH_EDGE_DENSITY {
        cfg.preset = "detailed".to_string();
        cfg.edge_detect = true;
        cfg.edge_threshold = DEFAULT_EDGE_THRESHOLD;
    } else if stats.edge_density < LOW_EDGE_DENSITY {
        cfg.preset = "classic".to_string();
        cfg.dithering = true;
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let v = ((x + y) * 255 / (w + h - 2)) as u8;
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::from_rgba(w, h, data).unwrap()
    }

    #[test]
    fn test_width_never_exceeds_source() {
        let buf = PixelBuffer::solid(30, 10, [128, 128, 128]).unwrap();
        assert_eq!(suggest_settings(&buf, 100).unwrap().output_width, 30);
        assert_eq!(suggest_settings(&buf, 20).unwrap().output_width, 20);
    }

    #[test]
    fn test_gray_image_stays_grayscale() {
        let cfg = suggest_settings(&gradient(64, 64), 80).unwrap();
        assert_eq!(cfg.color_mode, ColorMode::Grayscale);
    }

    #[test]
    fn test_colorful_image_gets_color() {
        let mut data = Vec::new();
        for y in 0..32u32 {
            for x in 0..32u32 {
                let px = if (x / 8 + y / 8) % 2 == 0 {
                    [255, 0, 0, 255]
                } else {
                    [0, 0, 255, 255]
                };
                data.extend_from_slice(&px);
            }
        }
        let buf = PixelBuffer::from_rgba(32, 32, data).unwrap();
        let cfg = suggest_settings(&buf, 32).unwrap();
        assert_eq!(cfg.color_mode, ColorMode::Truecolor);
    }

    #[test]
    fn test_flat_dark_image() {
        let buf = PixelBuffer::solid(16, 16, [20, 20, 20]).unwrap();
        let stats = analyze(&buf).unwrap();
        assert!(stats.stddev_luma < 1.0);
        assert_eq!(stats.distinct_colors, 1);
        let cfg = suggest_settings(&buf, 16).unwrap();
        assert!(cfg.enhance_contrast);
        assert!(cfg.brightness > 1.0);
        assert_eq!(cfg.preset, "block");
        assert!(!cfg.dithering);
    }

    #[test]
    fn test_suggestion_normalizes() {
        let cfg = suggest_settings(&gradient(40, 20), 200).unwrap();
        assert_eq!(cfg.normalized().unwrap(), cfg);
    }
}
