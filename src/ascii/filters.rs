//! Photometric and spatial filters applied before sampling.
//!
//! Order is fixed: enhance-contrast, brightness, contrast, saturation, gamma,
//! blur, sharpen, invert. Every step whose parameter is at its identity value
//! is skipped entirely, so default settings leave the buffer bit-for-bit
//! unchanged.

use palette::{FromColor, Hsl, Srgb};

use super::grayscale::histogram;
use crate::config::ConversionConfig;
use crate::error::{try_alloc, Result};
use crate::pixels::PixelBuffer;

/// Percentile cut-offs for the automatic contrast stretch.
const STRETCH_LOW_PERCENTILE: f64 = 0.01;
const STRETCH_HIGH_PERCENTILE: f64 = 0.99;

/// Sigma of the blur that unsharp masking subtracts.
const UNSHARP_SIGMA: f32 = 1.0;

/// Apply every enabled filter, returning a new buffer of the same size.
pub fn apply_filters(buffer: &PixelBuffer, cfg: &ConversionConfig) -> Result<PixelBuffer> {
    let mut out = buffer.clone();

    if cfg.enhance_contrast {
        stretch_contrast(&mut out);
    }
    if cfg.brightness != 1.0 {
        let b = cfg.brightness;
        apply_lut(&mut out, &build_lut(|v| v * b));
    }
    if cfg.contrast != 1.0 {
        let c = cfg.contrast;
        apply_lut(&mut out, &build_lut(|v| 128.0 + (v - 128.0) * c));
    }
    if cfg.saturation != 1.0 {
        saturate(&mut out, cfg.saturation);
    }
    if cfg.gamma != 1.0 {
        let inv = 1.0 / cfg.gamma;
        apply_lut(&mut out, &build_lut(|v| 255.0 * (v / 255.0).powf(inv)));
    }
    if cfg.blur > 0.0 {
        out = gaussian_blur(&out, cfg.blur)?;
    }
    if cfg.sharpen > 0.0 {
        out = unsharp_mask(&out, cfg.sharpen)?;
    }
    if cfg.invert {
        apply_lut(&mut out, &build_lut(|v| 255.0 - v));
    }

    Ok(out)
}

/// Tabulate a per-channel transform, rounding and clamping to [0, 255].
fn build_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = f(i as f32).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Map the RGB channels through `lut`; alpha is untouched.
fn apply_lut(buffer: &mut PixelBuffer, lut: &[u8; 256]) {
    for px in buffer.data.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
}

/// Luminance values at the low/high percentiles of the histogram.
fn percentile_bounds(hist: &[u64; 256]) -> (u8, u8) {
    let total: u64 = hist.iter().sum();
    let low_target = (total as f64 * STRETCH_LOW_PERCENTILE).ceil() as u64;
    let high_target = (total as f64 * STRETCH_HIGH_PERCENTILE).ceil() as u64;

    let mut low = 0u8;
    let mut high = 255u8;
    let mut seen_low = false;
    let mut cumulative = 0u64;
    for (value, &count) in hist.iter().enumerate() {
        cumulative += count;
        if !seen_low && cumulative >= low_target.max(1) {
            low = value as u8;
            seen_low = true;
        }
        if cumulative >= high_target.max(1) {
            high = value as u8;
            break;
        }
    }
    (low, high)
}

/// Linear stretch so the 1st/99th luminance percentiles land on 0/255.
fn stretch_contrast(buffer: &mut PixelBuffer) {
    let (low, high) = percentile_bounds(&histogram(buffer));
    if high <= low {
        log::debug!("contrast stretch skipped: flat histogram at {}", low);
        return;
    }
    let lo = low as f32;
    let scale = 255.0 / (high - low) as f32;
    apply_lut(buffer, &build_lut(|v| (v - lo) * scale));
}

fn saturate(buffer: &mut PixelBuffer, factor: f32) {
    for px in buffer.data.chunks_exact_mut(4) {
        let rgb: Srgb<f32> = Srgb::new(px[0], px[1], px[2]).into_format();
        let mut hsl: Hsl = Hsl::from_color(rgb);
        hsl.saturation = (hsl.saturation * factor).clamp(0.0, 1.0);
        let back: Srgb<f32> = Srgb::from_color(hsl);
        let out: Srgb<u8> = back.into_format();
        px[0] = out.red;
        px[1] = out.green;
        px[2] = out.blue;
    }
}

/// Normalised 1-D Gaussian weights for `sigma`, radius `ceil(3 * sigma)`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as isize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian blur with replicated borders. Alpha is copied.
pub fn gaussian_blur(buffer: &PixelBuffer, sigma: f32) -> Result<PixelBuffer> {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let w = buffer.width as usize;
    let h = buffer.height as usize;

    // Horizontal pass into a float buffer, three channels per pixel.
    let mut tmp: Vec<f32> = try_alloc(w * h * 3, "blur buffer")?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                let i = (y * w + sx) * 4;
                acc[0] += buffer.data[i] as f32 * weight;
                acc[1] += buffer.data[i + 1] as f32 * weight;
                acc[2] += buffer.data[i + 2] as f32 * weight;
            }
            let o = (y * w + x) * 3;
            tmp[o..o + 3].copy_from_slice(&acc);
        }
    }

    // Vertical pass back to bytes.
    let mut out = buffer.clone();
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
                let i = (sy * w + x) * 3;
                acc[0] += tmp[i] * weight;
                acc[1] += tmp[i + 1] * weight;
                acc[2] += tmp[i + 2] * weight;
            }
            let o = (y * w + x) * 4;
            for c in 0..3 {
                out.data[o + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(out)
}

/// Unsharp mask: `v + amount * (v - blurred(v))`, clamped.
pub fn unsharp_mask(buffer: &PixelBuffer, amount: f32) -> Result<PixelBuffer> {
    let blurred = gaussian_blur(buffer, UNSHARP_SIGMA)?;
    let mut out = buffer.clone();
    for (o, (src, bl)) in out
        .data
        .chunks_exact_mut(4)
        .zip(buffer.data.chunks_exact(4).zip(blurred.data.chunks_exact(4)))
    {
        for c in 0..3 {
            let v = src[c] as f32;
            let sharpened = v + amount * (v - bl[c] as f32);
            o[c] = sharpened.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut rgb = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y * width) * 255 / (width * height - 1)) as u8;
                rgb.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        PixelBuffer::from_rgb(width, height, &rgb).unwrap()
    }

    #[test]
    fn test_identity_settings_are_bit_exact() {
        let buf = gradient(7, 5);
        let out = apply_filters(&buf, &ConversionConfig::default()).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_brightness_clamps() {
        let buf = PixelBuffer::solid(1, 1, [200, 100, 0]).unwrap();
        let cfg = ConversionConfig {
            brightness: 2.0,
            ..Default::default()
        };
        let out = apply_filters(&buf, &cfg).unwrap();
        assert_eq!(out.rgb(0, 0), [255, 200, 0]);
    }

    #[test]
    fn test_contrast_pivots_on_128() {
        let buf =
            PixelBuffer::from_rgb(3, 1, &[128, 128, 128, 100, 100, 100, 200, 200, 200]).unwrap();
        let cfg = ConversionConfig {
            contrast: 2.0,
            ..Default::default()
        };
        let out = apply_filters(&buf, &cfg).unwrap();
        assert_eq!(out.rgb(0, 0), [128, 128, 128]);
        assert_eq!(out.rgb(1, 0), [72, 72, 72]);
        assert_eq!(out.rgb(2, 0), [255, 255, 255]);
    }

    #[test]
    fn test_zero_saturation_makes_gray() {
        let buf = PixelBuffer::solid(1, 1, [200, 40, 40]).unwrap();
        let cfg = ConversionConfig {
            saturation: 0.0,
            ..Default::default()
        };
        let [r, g, b] = apply_filters(&buf, &cfg).unwrap().rgb(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let buf = PixelBuffer::solid(1, 1, [64, 64, 64]).unwrap();
        let cfg = ConversionConfig {
            gamma: 2.0,
            ..Default::default()
        };
        let out = apply_filters(&buf, &cfg).unwrap();
        // 255 * (64/255)^0.5 = 127.75
        assert_eq!(out.rgb(0, 0), [128, 128, 128]);
    }

    #[test]
    fn test_invert_runs_last() {
        let buf = PixelBuffer::solid(1, 1, [10, 20, 30]).unwrap();
        let cfg = ConversionConfig {
            invert: true,
            brightness: 2.0,
            ..Default::default()
        };
        let out = apply_filters(&buf, &cfg).unwrap();
        assert_eq!(out.rgb(0, 0), [235, 215, 195]);
    }

    #[test]
    fn test_enhance_contrast_stretches_range() {
        // Values between 100 and 150 should end up spanning 0..255
        let mut rgb = Vec::new();
        for i in 0..100u32 {
            let v = (100 + i / 2) as u8;
            rgb.extend_from_slice(&[v, v, v]);
        }
        let buf = PixelBuffer::from_rgb(10, 10, &rgb).unwrap();
        let cfg = ConversionConfig {
            enhance_contrast: true,
            ..Default::default()
        };
        let out = apply_filters(&buf, &cfg).unwrap();
        let lumas = super::super::grayscale::to_grayscale(&out);
        assert_eq!(*lumas.iter().min().unwrap(), 0);
        assert_eq!(*lumas.iter().max().unwrap(), 255);
    }

    #[test]
    fn test_enhance_contrast_flat_image_unchanged() {
        let buf = PixelBuffer::solid(4, 4, [90, 90, 90]).unwrap();
        let cfg = ConversionConfig {
            enhance_contrast: true,
            ..Default::default()
        };
        assert_eq!(apply_filters(&buf, &cfg).unwrap(), buf);
    }

    #[test]
    fn test_blur_preserves_flat_regions() {
        let buf = PixelBuffer::solid(6, 6, [77, 88, 99]).unwrap();
        let out = gaussian_blur(&buf, 2.0).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_blur_softens_step() {
        let mut rgb = Vec::new();
        for _y in 0..3 {
            for x in 0..6 {
                let v = if x < 3 { 0 } else { 255 };
                rgb.extend_from_slice(&[v, v, v]);
            }
        }
        let buf = PixelBuffer::from_rgb(6, 3, &rgb).unwrap();
        let out = gaussian_blur(&buf, 1.0).unwrap();
        let left = out.rgb(2, 1)[0];
        let right = out.rgb(3, 1)[0];
        assert!(left > 0 && left < 128, "left edge {}", left);
        assert!(right > 128 && right < 255, "right edge {}", right);
    }

    #[test]
    fn test_sharpen_increases_step_contrast() {
        let mut rgb = Vec::new();
        for _y in 0..3 {
            for x in 0..6 {
                let v = if x < 3 { 100 } else { 150 };
                rgb.extend_from_slice(&[v, v, v]);
            }
        }
        let buf = PixelBuffer::from_rgb(6, 3, &rgb).unwrap();
        let out = unsharp_mask(&buf, 1.0).unwrap();
        assert!(out.rgb(2, 1)[0] < 100);
        assert!(out.rgb(3, 1)[0] > 150);
    }

    #[test]
    fn test_kernel_is_normalised() {
        let k = gaussian_kernel(1.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k.len() % 2, 1);
    }

    #[test]
    fn test_source_buffer_untouched() {
        let buf = gradient(4, 4);
        let copy = buf.clone();
        let cfg = ConversionConfig {
            brightness: 1.5,
            blur: 1.0,
            invert: true,
            ..Default::default()
        };
        let _ = apply_filters(&buf, &cfg).unwrap();
        assert_eq!(buf, copy);
    }
}
