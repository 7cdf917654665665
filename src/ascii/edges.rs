//! Sobel edge detection over the cell grid.

use super::grid::SampleGrid;

/// Edge direction detected by gradient analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeDirection {
    /// No gradient at all
    #[default]
    None,
    /// Horizontal edge (use `-`, `=`)
    Horizontal,
    /// Vertical edge (use `|`, `:`)
    Vertical,
    /// Diagonal from top-left to bottom-right (use `\`)
    DiagonalDown,
    /// Diagonal from bottom-left to top-right (use `/`)
    DiagonalUp,
}

/// Edge signal of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeCell {
    /// Gradient magnitude, 0-255.
    pub strength: u8,
    pub direction: EdgeDirection,
}

/// Per-cell edge signal, same shape as the sampled grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<EdgeCell>,
}

impl EdgeMap {
    /// Edge at `idx` if its strength reaches `threshold`.
    #[inline]
    pub fn edge_at(&self, idx: usize, threshold: u8) -> Option<EdgeCell> {
        let cell = self.cells[idx];
        (cell.strength >= threshold && cell.direction != EdgeDirection::None).then_some(cell)
    }
}

/// Outline glyphs grouped by edge direction, five density levels each.
pub struct StructureCharset {
    pub horizontal: [char; 5],
    pub vertical: [char; 5],
    pub diagonal_down: [char; 5],
    pub diagonal_up: [char; 5],
}

/// Box-drawing outline glyphs.
pub const STRUCTURE_CHARSET: StructureCharset = StructureCharset {
    horizontal: [' ', '─', '─', '═', '▬'],
    vertical: [' ', '│', '│', '║', '█'],
    diagonal_down: [' ', '.', '\\', '╲', '▓'],
    diagonal_up: [' ', '.', '/', '╱', '▓'],
};

/// ASCII-only outline glyphs (no Unicode).
pub const STRUCTURE_CHARSET_ASCII: StructureCharset = StructureCharset {
    horizontal: [' ', '-', '-', '=', '#'],
    vertical: [' ', ':', '|', '|', '#'],
    diagonal_down: [' ', '.', '\\', '\\', '#'],
    diagonal_up: [' ', '.', '/', '/', '#'],
};

/// Lowest level an outline glyph is drawn at, so lines stay visible in dark
/// regions.
const MIN_OUTLINE_LEVEL: usize = 2;

impl StructureCharset {
    /// Outline glyph for `direction` at a brightness of `intensity`.
    pub fn glyph(&self, direction: EdgeDirection, intensity: u8) -> Option<char> {
        let level = ((intensity as usize * 4 + 127) / 255).clamp(MIN_OUTLINE_LEVEL, 4);
        match direction {
            EdgeDirection::None => None,
            EdgeDirection::Horizontal => Some(self.horizontal[level]),
            EdgeDirection::Vertical => Some(self.vertical[level]),
            EdgeDirection::DiagonalDown => Some(self.diagonal_down[level]),
            EdgeDirection::DiagonalUp => Some(self.diagonal_up[level]),
        }
    }
}

/// Magnitude and dominant orientation of a gradient.
///
/// `|gx| + |gy|` is divided by 4 so that a full black-to-white step lands at
/// 255 while gentle ramps stay well below typical thresholds.
fn analyze_gradient(gx: i32, gy: i32) -> EdgeCell {
    let abs_gx = gx.abs();
    let abs_gy = gy.abs();
    let strength = ((abs_gx + abs_gy) / 4).min(255) as u8;

    let direction = if abs_gx == 0 && abs_gy == 0 {
        EdgeDirection::None
    } else if abs_gx > abs_gy * 2 {
        // Mostly horizontal gradient = vertical edge
        EdgeDirection::Vertical
    } else if abs_gy > abs_gx * 2 {
        // Mostly vertical gradient = horizontal edge
        EdgeDirection::Horizontal
    } else if (gx > 0) == (gy > 0) {
        EdgeDirection::DiagonalUp
    } else {
        EdgeDirection::DiagonalDown
    };

    EdgeCell {
        strength,
        direction,
    }
}

/// Apply the Sobel operator to the luminance of every cell.
///
/// ```text
/// Gx:          Gy:
/// [-1  0  1]   [-1 -2 -1]
/// [-2  0  2]   [ 0  0  0]
/// [-1  0  1]   [ 1  2  1]
/// ```
///
/// Neighbours outside the grid replicate the nearest border cell, so there is
/// no wrap-around and border cells get a real gradient.
pub fn detect_edges(grid: &SampleGrid) -> EdgeMap {
    const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
    const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

    let mut cells = Vec::with_capacity(grid.width * grid.height);
    for y in 0..grid.height as isize {
        for x in 0..grid.width as isize {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let v = grid.luma_clamped(x + kx as isize - 1, y + ky as isize - 1) as i32;
                    gx += v * SOBEL_X[ky][kx];
                    gy += v * SOBEL_Y[ky][kx];
                }
            }
            cells.push(analyze_gradient(gx, gy));
        }
    }

    EdgeMap {
        width: grid.width,
        height: grid.height,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::grid::CellColor;

    fn grid_from(width: usize, luma: Vec<u8>) -> SampleGrid {
        let height = luma.len() / width;
        SampleGrid {
            width,
            height,
            colors: vec![CellColor::BLACK; luma.len()],
            luma,
        }
    }

    #[test]
    fn test_flat_grid_has_no_edges() {
        let map = detect_edges(&grid_from(4, vec![128; 16]));
        assert!(map.cells.iter().all(|c| c.strength == 0));
        assert!(map.cells.iter().all(|c| c.direction == EdgeDirection::None));
    }

    #[test]
    fn test_vertical_step_is_vertical_edge() {
        // Left half black, right half white
        let luma = (0..16).map(|i| if i % 4 < 2 { 0 } else { 255 }).collect();
        let map = detect_edges(&grid_from(4, luma));
        let cell = map.cells[1 * 4 + 1];
        assert_eq!(cell.direction, EdgeDirection::Vertical);
        assert_eq!(cell.strength, 255);
        // Far columns see replicated borders and a flat neighbourhood
        assert_eq!(map.cells[0].strength, 0);
    }

    #[test]
    fn test_horizontal_step_is_horizontal_edge() {
        let luma = (0..16).map(|i| if i / 4 < 2 { 0 } else { 255 }).collect();
        let map = detect_edges(&grid_from(4, luma));
        assert_eq!(map.cells[4 + 2].direction, EdgeDirection::Horizontal);
    }

    #[test]
    fn test_edge_at_respects_threshold() {
        let luma = (0..9).map(|i| if i % 3 == 0 { 0 } else { 40 }).collect();
        let map = detect_edges(&grid_from(3, luma));
        let idx = 4;
        let strength = map.cells[idx].strength;
        assert!(strength > 0);
        assert!(map.edge_at(idx, strength).is_some());
        assert!(map.edge_at(idx, strength.saturating_add(1)).is_none());
    }

    #[test]
    fn test_gentle_ramp_below_default_threshold() {
        let luma = (0..25).map(|i| ((i % 5) * 10) as u8).collect();
        let map = detect_edges(&grid_from(5, luma));
        assert!(map.cells.iter().all(|c| c.strength < 75));
    }

    #[test]
    fn test_structure_glyph_minimum_level() {
        assert_eq!(
            STRUCTURE_CHARSET_ASCII.glyph(EdgeDirection::Vertical, 0),
            Some('|')
        );
        assert_eq!(
            STRUCTURE_CHARSET_ASCII.glyph(EdgeDirection::Horizontal, 255),
            Some('#')
        );
        assert_eq!(STRUCTURE_CHARSET.glyph(EdgeDirection::None, 200), None);
    }
}
