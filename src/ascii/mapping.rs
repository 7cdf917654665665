//! Intensity to glyph mapping.

use super::charset::GlyphRamp;
use super::edges::{EdgeCell, STRUCTURE_CHARSET, STRUCTURE_CHARSET_ASCII};

/// Remap intensity through `255 * (i/255)^(1/detail_level)`.
///
/// Values above 1.0 lift shadows and spread them over more glyphs; values
/// below 1.0 compress them. 1.0 returns the input unchanged.
#[inline]
pub fn remap_detail(intensity: f32, detail_level: f32) -> f32 {
    if detail_level == 1.0 {
        return intensity;
    }
    255.0 * (intensity.clamp(0.0, 255.0) / 255.0).powf(1.0 / detail_level)
}

/// Ramp index for an intensity: `round(i/255 * (levels-1))`, clamped.
#[inline]
pub fn glyph_index(intensity: f32, levels: usize) -> usize {
    if levels <= 1 {
        return 0;
    }
    let max = (levels - 1) as f32;
    ((intensity / 255.0 * max).round().clamp(0.0, max)) as usize
}

/// Intensity a ramp level stands for (inverse of [`glyph_index`]).
#[inline]
pub fn level_intensity(level: usize, levels: usize) -> f32 {
    if levels <= 1 {
        return 0.0;
    }
    level as f32 * 255.0 / (levels - 1) as f32
}

/// Pick the glyph for one cell.
///
/// Cells on an edge get a directional outline glyph regardless of the ramp,
/// so line structure survives in flat regions. Everything else indexes the
/// ramp by intensity.
pub fn select_glyph(intensity: f32, edge: Option<EdgeCell>, ramp: &GlyphRamp) -> char {
    if let Some(edge) = edge {
        let outline = if ramp.is_ascii() {
            &STRUCTURE_CHARSET_ASCII
        } else {
            &STRUCTURE_CHARSET
        };
        let level = intensity.round().clamp(0.0, 255.0) as u8;
        if let Some(ch) = outline.glyph(edge.direction, level) {
            return ch;
        }
    }
    ramp.glyph(glyph_index(intensity, ramp.len()))
}
