//! Floyd-Steinberg error diffusion.
//!
//! Works on continuous planes (one value per cell) and snaps every value to
//! one of `levels` evenly spaced intensities. Traversal is strictly raster
//! order, so the same input always yields the same output.

use super::mapping::{glyph_index, level_intensity};

/// Dither a single plane in place.
///
/// Error diffusion pattern:
/// ```text
///        [*]  7/16
/// 3/16  5/16  1/16
/// ```
/// The four shares sum to the full quantisation error. Neighbours outside the
/// grid simply do not receive their share.
pub fn dither_plane(values: &mut [f32], width: usize, height: usize, levels: usize) {
    if levels < 2 || width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(values.len(), width * height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = values[idx].clamp(0.0, 255.0);
            let new = level_intensity(glyph_index(old, levels), levels);
            values[idx] = new;
            diffuse(values, width, height, x, y, old - new);
        }
    }
}

/// Dither a single plane onto an explicit ascending list of levels.
///
/// Unlike [`dither_plane`] the carried error is not clamped, so the mean of
/// the plane is kept up to what leaks out of the right and bottom borders.
pub fn dither_plane_to(values: &mut [f32], width: usize, height: usize, levels: &[f32]) {
    if levels.is_empty() || width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(values.len(), width * height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = values[idx];
            let new = nearest_level(old, levels);
            values[idx] = new;
            diffuse(values, width, height, x, y, old - new);
        }
    }
}

#[inline]
fn diffuse(values: &mut [f32], width: usize, height: usize, x: usize, y: usize, error: f32) {
    let idx = y * width + x;
    if x + 1 < width {
        values[idx + 1] += error * 7.0 / 16.0;
    }
    if y + 1 < height {
        if x > 0 {
            values[idx + width - 1] += error * 3.0 / 16.0;
        }
        values[idx + width] += error * 5.0 / 16.0;
        if x + 1 < width {
            values[idx + width + 1] += error / 16.0;
        }
    }
}

/// Closest level; ties go to the lower one.
fn nearest_level(value: f32, levels: &[f32]) -> f32 {
    let mut best = levels[0];
    for &level in &levels[1..] {
        if (value - level).abs() < (value - best).abs() {
            best = level;
        }
    }
    best
}

/// Dither a copy of `values`, leaving the input untouched.
pub fn dither(values: &[f32], width: usize, height: usize, levels: usize) -> Vec<f32> {
    let mut out = values.to_vec();
    dither_plane(&mut out, width, height, levels);
    out
}

fn per_channel<F>(colors: &[[f32; 3]], mut dither_one: F) -> Vec<[f32; 3]>
where
    F: FnMut(&mut [f32]),
{
    let mut planes: [Vec<f32>; 3] = [
        colors.iter().map(|c| c[0]).collect(),
        colors.iter().map(|c| c[1]).collect(),
        colors.iter().map(|c| c[2]).collect(),
    ];
    for plane in planes.iter_mut() {
        dither_one(plane);
    }
    (0..colors.len())
        .map(|i| [planes[0][i], planes[1][i], planes[2][i]])
        .collect()
}

/// Dither each RGB channel independently to `levels` evenly spaced values.
pub fn dither_rgb(
    colors: &[[f32; 3]],
    width: usize,
    height: usize,
    levels: usize,
) -> Vec<[f32; 3]> {
    per_channel(colors, |plane| dither_plane(plane, width, height, levels))
}

/// Dither each RGB channel independently onto the given channel levels.
pub fn dither_rgb_to(
    colors: &[[f32; 3]],
    width: usize,
    height: usize,
    levels: &[f32],
) -> Vec<[f32; 3]> {
    per_channel(colors, |plane| dither_plane_to(plane, width, height, levels))
}
