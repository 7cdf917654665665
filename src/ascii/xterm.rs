//! The standard xterm 256-colour palette.
//!
//! 16 system colours (xterm defaults), a 6x6x6 colour cube and a 24-step
//! gray ramp. Nearest-colour lookup uses squared Euclidean distance in RGB;
//! ties go to the lowest index, so pure white is 15 rather than 231 and pure
//! black is 0 rather than 16.

use once_cell::sync::Lazy;

use super::grid::CellColor;

#[rustfmt::skip]
const SYSTEM_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),       (205, 0, 0),     (0, 205, 0),     (205, 205, 0),
    (0, 0, 238),     (205, 0, 205),   (0, 205, 205),   (229, 229, 229),
    (127, 127, 127), (255, 0, 0),     (0, 255, 0),     (255, 255, 0),
    (92, 92, 255),   (255, 0, 255),   (0, 255, 255),   (255, 255, 255),
];

/// Channel values of the 6x6x6 cube.
pub const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

static PALETTE: Lazy<[CellColor; 256]> = Lazy::new(|| {
    let mut palette = [CellColor::BLACK; 256];
    for (i, &(r, g, b)) in SYSTEM_COLORS.iter().enumerate() {
        palette[i] = CellColor::new(r, g, b);
    }
    for i in 0..216 {
        let r = CUBE_LEVELS[i / 36];
        let g = CUBE_LEVELS[(i / 6) % 6];
        let b = CUBE_LEVELS[i % 6];
        palette[16 + i] = CellColor::new(r, g, b);
    }
    for i in 0..24 {
        let v = (8 + 10 * i) as u8;
        palette[232 + i] = CellColor::new(v, v, v);
    }
    palette
});

/// RGB value of a palette index.
pub fn xterm_color(index: u8) -> CellColor {
    PALETTE[index as usize]
}

#[inline]
fn distance_sq(a: CellColor, b: CellColor) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the closest palette entry.
pub fn nearest_ansi256(color: CellColor) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &entry) in PALETTE.iter().enumerate() {
        let d = distance_sq(color, entry);
        if d < best_dist {
            best = i;
            best_dist = d;
            if d == 0 {
                break;
            }
        }
    }
    best as u8
}
