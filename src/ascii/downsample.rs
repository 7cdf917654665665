//! Block-average resampling from source pixels to the cell grid.

use super::dimensions::output_height;
use super::grayscale::luminance;
use super::grid::{CellColor, SampleGrid};
use crate::error::{checked_area, try_alloc, ConvertError, Result};
use crate::pixels::PixelBuffer;

/// Source pixel range `[start, end)` covered by output index `i`.
///
/// Blocks tile the source without overlap. When the output is larger than
/// the source a block would be empty, so it is widened to one pixel; blocks
/// at the far edge are clipped to the source.
#[inline]
fn block_bounds(i: usize, src: usize, out: usize) -> (usize, usize) {
    let start = (i as u64 * src as u64 / out as u64) as usize;
    let end = ((i as u64 + 1) * src as u64 / out as u64) as usize;
    let end = end.max(start + 1).min(src);
    (start, end)
}

/// Resample to `output_width` columns and the aspect-corrected row count.
pub fn resample(
    buffer: &PixelBuffer,
    output_width: u32,
    aspect_correction: f32,
) -> Result<SampleGrid> {
    let rows = output_height(buffer.width, buffer.height, output_width, aspect_correction);
    resample_exact(buffer, output_width as usize, rows as usize)
}

/// Resample to exactly `width x height` cells.
///
/// Each cell holds the average colour and the average luminance of every
/// source pixel in its block (not a nearest-neighbour pick), which avoids
/// aliasing at small output sizes.
pub fn resample_exact(buffer: &PixelBuffer, width: usize, height: usize) -> Result<SampleGrid> {
    if width == 0 || height == 0 {
        return Err(ConvertError::InvalidConfig(format!(
            "output grid must be non-empty, got {}x{}",
            width, height
        )));
    }
    if buffer.pixel_count() == 0 {
        return Err(ConvertError::ImageDecode("image has no pixels".to_string()));
    }

    let cells = checked_area(width, height, "output grid")?;
    let mut colors: Vec<CellColor> = try_alloc(cells, "sample colours")?;
    let mut luma: Vec<u8> = try_alloc(cells, "sample luminance")?;

    let src_w = buffer.width as usize;
    let src_h = buffer.height as usize;

    for cy in 0..height {
        let (y0, y1) = block_bounds(cy, src_h, height);
        for cx in 0..width {
            let (x0, x1) = block_bounds(cx, src_w, width);

            let mut sum_r = 0u64;
            let mut sum_g = 0u64;
            let mut sum_b = 0u64;
            let mut sum_y = 0u64;

            for py in y0..y1 {
                let row = py * src_w;
                for px in x0..x1 {
                    let i = (row + px) * 4;
                    let (r, g, b) = (buffer.data[i], buffer.data[i + 1], buffer.data[i + 2]);
                    sum_r += r as u64;
                    sum_g += g as u64;
                    sum_b += b as u64;
                    sum_y += luminance(r, g, b) as u64;
                }
            }

            // Blocks are never empty (see block_bounds).
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            let idx = cy * width + cx;
            colors[idx] = CellColor {
                r: (sum_r / count) as u8,
                g: (sum_g / count) as u8,
                b: (sum_b / count) as u8,
            };
            luma[idx] = (sum_y / count) as u8;
        }
    }

    Ok(SampleGrid {
        width,
        height,
        colors,
        luma,
    })
}
