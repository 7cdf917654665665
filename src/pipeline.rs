//! Conversion pipeline and orchestration.
//!
//! decode -> (memory downscale) -> filters -> resample -> edges -> dither ->
//! glyph + colour -> encode. A [`Converter`] wraps the pipeline with the
//! result cache; [`convert`] uses a process-wide converter.

use once_cell::sync::Lazy;
use std::path::Path;
use std::time::Instant;

use crate::ascii::{
    apply_filters, braille, detect_edges, dither_plane, dither_rgb, dither_rgb_to, encode,
    output_height, remap_detail, resample, resample_exact, select_glyph, Cell, CellColor,
    GlyphRamp, OutputGrid, CUBE_LEVELS,
};
use crate::cache::{cache_key, ResultCache, DEFAULT_CAPACITY};
use crate::config::{ColorMode, ConversionConfig};
use crate::error::Result;
use crate::pixels::{PixelBuffer, SourceImage};

/// Levels per channel when dithering truecolor and HTML output.
pub const COLOR_DITHER_LEVELS: usize = 6;

/// Run the stages up to (not including) encoding.
///
/// `cfg` must already be normalised.
pub fn render_grid(pixels: &PixelBuffer, cfg: &ConversionConfig) -> Result<OutputGrid> {
    let ramp = GlyphRamp::resolve(&cfg.preset, cfg.custom_chars.as_deref())?;

    let downscaled = if cfg.optimize_memory {
        pixels.downscaled(cfg.max_image_size)
    } else {
        None
    };
    let source = downscaled.as_ref().unwrap_or(pixels);

    let started = Instant::now();
    let filtered = apply_filters(source, cfg)?;
    log::debug!("filters: {:?}", started.elapsed());

    if cfg.color_mode == ColorMode::Braille {
        return render_braille(&filtered, cfg);
    }

    let started = Instant::now();
    let grid = resample(&filtered, cfg.output_width, cfg.aspect_ratio_correction)?;
    log::debug!(
        "resample {}x{} -> {}x{}: {:?}",
        filtered.width,
        filtered.height,
        grid.width,
        grid.height,
        started.elapsed()
    );

    let edges = cfg.edge_detect.then(|| detect_edges(&grid));

    let mut intensities: Vec<f32> = grid
        .luma
        .iter()
        .map(|&l| remap_detail(l as f32, cfg.detail_level))
        .collect();

    let colored = cfg.color_mode.is_colored();
    let mut colors = grid.colors.clone();

    if cfg.dithering {
        let started = Instant::now();
        dither_plane(&mut intensities, grid.width, grid.height, ramp.len());
        if colored {
            let planes: Vec<[f32; 3]> = colors
                .iter()
                .map(|c| [c.r as f32, c.g as f32, c.b as f32])
                .collect();
            let dithered = if cfg.color_mode == ColorMode::Ansi256 {
                // cube colours are their own nearest palette entry
                let cube = CUBE_LEVELS.map(f32::from);
                dither_rgb_to(&planes, grid.width, grid.height, &cube)
            } else {
                dither_rgb(&planes, grid.width, grid.height, COLOR_DITHER_LEVELS)
            };
            colors = dithered
                .into_iter()
                .map(|[r, g, b]| CellColor::new(to_channel(r), to_channel(g), to_channel(b)))
                .collect();
        }
        log::debug!("dither: {:?}", started.elapsed());
    }

    let cells = intensities
        .iter()
        .enumerate()
        .map(|(idx, &intensity)| {
            let edge = edges
                .as_ref()
                .and_then(|map| map.edge_at(idx, cfg.edge_threshold));
            Cell {
                glyph: select_glyph(intensity, edge, &ramp),
                color: colored.then_some(colors[idx]),
                intensity: to_channel(intensity),
                edge: edges.as_ref().map_or(0, |map| map.cells[idx].strength),
            }
        })
        .collect();

    Ok(OutputGrid {
        width: grid.width,
        height: grid.height,
        cells,
    })
}

fn render_braille(filtered: &PixelBuffer, cfg: &ConversionConfig) -> Result<OutputGrid> {
    let width = cfg.output_width as usize;
    let height = output_height(
        filtered.width,
        filtered.height,
        cfg.output_width,
        cfg.aspect_ratio_correction,
    ) as usize;

    let sub = resample_exact(filtered, width * braille::DOTS_X, height * braille::DOTS_Y)?;
    let mut values: Vec<f32> = sub
        .luma
        .iter()
        .map(|&l| remap_detail(l as f32, cfg.detail_level))
        .collect();
    if cfg.dithering {
        dither_plane(&mut values, sub.width, sub.height, 2);
    }
    Ok(braille::render(&sub, &values, width, height, cfg.braille_color))
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Normalise, render and encode, without caching.
pub fn run(pixels: &PixelBuffer, cfg: &ConversionConfig) -> Result<String> {
    let cfg = cfg.normalized()?;
    let grid = render_grid(pixels, &cfg)?;
    Ok(encode(&grid, cfg.color_mode))
}

/// Pipeline plus result cache.
///
/// Safe to share between threads; each call owns its buffers and only the
/// cache is shared.
pub struct Converter {
    cache: ResultCache,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Converter {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: ResultCache::new(cache_capacity),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Convert a decoded source, returning the cached result when the same
    /// image was already converted with an equivalent config.
    pub fn convert(&self, source: &SourceImage, cfg: &ConversionConfig) -> Result<String> {
        let cfg = cfg.normalized()?;
        let key = cache_key(&source.id, &cfg)?;
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("cache hit {}", key);
            return Ok(hit);
        }

        let started = Instant::now();
        let grid = render_grid(&source.pixels, &cfg)?;
        let out = encode(&grid, cfg.color_mode);
        log::debug!(
            "converted {}x{} to {}x{} {} in {:?}",
            source.pixels.width,
            source.pixels.height,
            grid.width,
            grid.height,
            cfg.color_mode.name(),
            started.elapsed()
        );

        self.cache.insert(key, out.clone());
        Ok(out)
    }

    /// Decode encoded image bytes and convert them.
    pub fn convert_bytes(&self, bytes: &[u8], cfg: &ConversionConfig) -> Result<String> {
        let cfg = cfg.normalized()?;
        let source = SourceImage::from_bytes(bytes)?;
        self.convert(&source, &cfg)
    }

    /// Read, decode and convert an image file.
    pub fn convert_path(&self, path: &Path, cfg: &ConversionConfig) -> Result<String> {
        let cfg = cfg.normalized()?;
        let source = SourceImage::open(path)?;
        self.convert(&source, &cfg)
    }
}

static ENGINE: Lazy<Converter> = Lazy::new(Converter::default);

/// Convert with the process-wide converter and its shared cache.
pub fn convert(source: &SourceImage, cfg: &ConversionConfig) -> Result<String> {
    ENGINE.convert(source, cfg)
}

/// Decode and convert encoded image bytes with the process-wide converter.
pub fn convert_bytes(bytes: &[u8], cfg: &ConversionConfig) -> Result<String> {
    ENGINE.convert_bytes(bytes, cfg)
}
