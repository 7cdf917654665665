//! Braille character rendering for high-resolution text art.
//!
//! Each braille character represents a 2x4 dot matrix, providing 8 subpixels
//! per output cell. This is the highest detail mode.

use super::grid::{Cell, CellColor, OutputGrid, SampleGrid};

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Dots per cell horizontally.
pub const DOTS_X: usize = 2;
/// Dots per cell vertically.
pub const DOTS_Y: usize = 4;

/// Convert a 2x4 boolean grid to a braille character.
///
/// Each braille character represents a 2x4 dot matrix where each dot can be on or off.
/// The bit positions are:
/// ```text
/// [0,0]=1   [1,0]=8
/// [0,1]=2   [1,1]=16
/// [0,2]=4   [1,2]=32
/// [0,3]=64  [1,3]=128
/// ```
///
/// # Arguments
/// * `grid` - A 2x4 boolean array where grid[x][y] indicates if dot at (x,y) is on
///
/// # Returns
/// The corresponding braille character (U+2800 to U+28FF)
pub fn grid_to_braille(grid: [[bool; 4]; 2]) -> char {
    let mut code = 0u8;
    if grid[0][0] {
        code |= 0x01;
    }
    if grid[0][1] {
        code |= 0x02;
    }
    if grid[0][2] {
        code |= 0x04;
    }
    if grid[0][3] {
        code |= 0x40;
    }
    if grid[1][0] {
        code |= 0x08;
    }
    if grid[1][1] {
        code |= 0x10;
    }
    if grid[1][2] {
        code |= 0x20;
    }
    if grid[1][3] {
        code |= 0x80;
    }
    char::from_u32(BRAILLE_BASE as u32 + code as u32).unwrap_or(BRAILLE_BASE)
}

/// Threshold for one cell, halfway between its own mean and mid-gray.
///
/// Local detail still shows inside bright or dark regions, while a uniformly
/// white block lights every dot and a black one lights none.
#[inline]
fn adaptive_threshold(mean: f32) -> f32 {
    (mean + 128.0) / 2.0
}

/// Render a sub-sampled grid as braille cells.
///
/// `sub` must be `out_width * 2` by `out_height * 4` samples, and `values`
/// holds one (possibly dithered) intensity per sample. With `with_color` each
/// cell carries the average colour of its eight samples.
pub fn render(
    sub: &SampleGrid,
    values: &[f32],
    out_width: usize,
    out_height: usize,
    with_color: bool,
) -> OutputGrid {
    debug_assert_eq!(sub.width, out_width * DOTS_X);
    debug_assert_eq!(sub.height, out_height * DOTS_Y);
    debug_assert_eq!(values.len(), sub.width * sub.height);

    let mut cells = Vec::with_capacity(out_width * out_height);

    for cy in 0..out_height {
        for cx in 0..out_width {
            let mut block = [[0.0f32; 4]; 2];
            let mut sum = 0.0f32;
            let mut rgb = [0u32; 3];

            for dy in 0..DOTS_Y {
                for dx in 0..DOTS_X {
                    let idx = sub.index(cx * DOTS_X + dx, cy * DOTS_Y + dy);
                    let v = values[idx].clamp(0.0, 255.0);
                    block[dx][dy] = v;
                    sum += v;
                    let c = sub.colors[idx];
                    rgb[0] += c.r as u32;
                    rgb[1] += c.g as u32;
                    rgb[2] += c.b as u32;
                }
            }

            let mean = sum / (DOTS_X * DOTS_Y) as f32;
            let threshold = adaptive_threshold(mean);
            let mut dots = [[false; 4]; 2];
            for dx in 0..DOTS_X {
                for dy in 0..DOTS_Y {
                    dots[dx][dy] = block[dx][dy] > threshold;
                }
            }

            let n = (DOTS_X * DOTS_Y) as u32;
            let color = with_color.then(|| {
                CellColor::new(
                    ((rgb[0] + n / 2) / n) as u8,
                    ((rgb[1] + n / 2) / n) as u8,
                    ((rgb[2] + n / 2) / n) as u8,
                )
            });

            cells.push(Cell {
                glyph: grid_to_braille(dots),
                color,
                intensity: mean.round() as u8,
                edge: 0,
            });
        }
    }

    OutputGrid {
        width: out_width,
        height: out_height,
        cells,
    }
}
