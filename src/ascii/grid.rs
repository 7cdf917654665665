//! Grids shared between the pipeline stages.

/// RGB colour of a sampled or output cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellColor {
    pub const BLACK: CellColor = CellColor { r: 0, g: 0, b: 0 };
    pub const WHITE: CellColor = CellColor {
        r: 255,
        g: 255,
        b: 255,
    };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One averaged sample per output cell, produced by the resampler.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    pub width: usize,
    pub height: usize,
    /// Average colour of each cell's source block, row-major.
    pub colors: Vec<CellColor>,
    /// Average luminance of each cell's source block, row-major.
    pub luma: Vec<u8>,
}

impl SampleGrid {
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Luminance at (x, y) with coordinates clamped to the grid, so border
    /// cells see replicated edge values.
    #[inline]
    pub fn luma_clamped(&self, x: isize, y: isize) -> u8 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.luma[self.index(cx, cy)]
    }
}

/// One cell of the final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    /// Foreground colour, present only for coloured output.
    pub color: Option<CellColor>,
    /// Intensity the glyph was chosen from (after tone remapping/dithering).
    pub intensity: u8,
    /// Edge strength at this cell (0 when edge detection is off).
    pub edge: u8,
}

/// `height x width` matrix of cells, built once per conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

impl OutputGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Glyphs only, one string per row.
    pub fn glyph_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|c| c.glyph).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(CellColor::new(255, 0, 16).hex(), "#ff0010");
    }

    #[test]
    fn test_luma_clamped_replicates_border() {
        let grid = SampleGrid {
            width: 2,
            height: 2,
            colors: vec![CellColor::BLACK; 4],
            luma: vec![1, 2, 3, 4],
        };
        assert_eq!(grid.luma_clamped(-1, -1), 1);
        assert_eq!(grid.luma_clamped(5, 0), 2);
        assert_eq!(grid.luma_clamped(0, 9), 3);
        assert_eq!(grid.luma_clamped(1, 1), 4);
    }
}
