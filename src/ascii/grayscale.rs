//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use crate::pixels::PixelBuffer;

/// Luminance of one RGB triple: Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Integer math with coefficients scaled by 1000 (299 + 587 + 114 = 1000),
/// so white maps to exactly 255.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Convert an RGBA buffer to one luminance byte per pixel.
pub fn to_grayscale(buffer: &PixelBuffer) -> Vec<u8> {
    buffer
        .data
        .chunks_exact(4)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect()
}

/// 256-bin luminance histogram.
pub fn histogram(buffer: &PixelBuffer) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for l in to_grayscale(buffer) {
        hist[l as usize] += 1;
    }
    hist
}
