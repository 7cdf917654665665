//! Decoded source images.

use image::imageops::FilterType;
use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// An owned RGBA image at source resolution.
///
/// Filters never mutate a buffer in place; they return a new one, so the
/// decoded original can be reused across runs with different settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConvertError::ImageDecode(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                ConvertError::Processing(format!("image {}x{} is too large", width, height))
            })?;
        if data.len() != expected {
            return Err(ConvertError::ImageDecode(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from packed RGB triplets (alpha set to opaque).
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        let data = rgb
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect();
        Self::from_rgba(width, height, data)
    }

    /// A buffer filled with one colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self> {
        let count = (width as usize) * (height as usize);
        let data = std::iter::repeat([rgb[0], rgb[1], rgb[2], 255])
            .take(count)
            .flatten()
            .collect();
        Self::from_rgba(width, height, data)
    }

    /// Decode an encoded image (PNG, JPEG, ...) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(img)
    }

    /// Read and decode an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConvertError::ImageDecode(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::decode(&bytes)
    }

    fn from_image(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// RGB of the pixel at (x, y). Caller keeps coordinates in bounds.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Shrink so the longest side is at most `max_dim`, keeping aspect ratio.
    /// Returns `None` when the image already fits.
    pub fn downscaled(&self, max_dim: u32) -> Option<Self> {
        let longest = self.width.max(self.height);
        if max_dim == 0 || longest <= max_dim {
            return None;
        }
        let scale = max_dim as f64 / longest as f64;
        let new_w = ((self.width as f64 * scale).round() as u32).max(1);
        let new_h = ((self.height as f64 * scale).round() as u32).max(1);

        let img = RgbaImage::from_raw(self.width, self.height, self.data.clone())?;
        let resized = image::imageops::resize(&img, new_w, new_h, FilterType::Triangle);
        log::debug!(
            "downscaled {}x{} -> {}x{} (max dimension {})",
            self.width,
            self.height,
            new_w,
            new_h,
            max_dim
        );
        Some(Self {
            width: new_w,
            height: new_h,
            data: resized.into_raw(),
        })
    }
}

/// Stable content identity for encoded image bytes.
/// Returns a 64-character hex SHA-256 digest.
pub fn content_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Encoded image bytes plus their decoded pixels.
///
/// Keeps the content identity next to the buffer so repeated conversions of
/// the same bytes hit the result cache without re-hashing.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub id: String,
    pub pixels: PixelBuffer,
}

impl SourceImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let pixels = PixelBuffer::decode(bytes)?;
        Ok(Self {
            id: content_id(bytes),
            pixels,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConvertError::ImageDecode(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-decoded buffer; identity is derived from its pixels.
    pub fn from_pixels(pixels: PixelBuffer) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(pixels.width.to_le_bytes());
        hasher.update(pixels.height.to_le_bytes());
        hasher.update(&pixels.data);
        Self {
            id: hex::encode(hasher.finalize()),
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_from_rgba_length_mismatch() {
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, ConvertError::ImageDecode(_)));
    }

    #[test]
    fn test_from_rgba_zero_size() {
        assert!(PixelBuffer::from_rgba(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn test_from_rgb_sets_opaque_alpha() {
        let buf = PixelBuffer::from_rgb(1, 1, &[1, 2, 3]).unwrap();
        assert_eq!(buf.data, vec![1, 2, 3, 255]);
    }

    #[test]
    fn test_decode_png() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let buf = PixelBuffer::decode(&png_bytes(&img)).unwrap();
        assert_eq!((buf.width, buf.height), (3, 2));
        assert_eq!(buf.rgb(2, 1), [10, 20, 30]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = PixelBuffer::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ConvertError::ImageDecode(_)));
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let err = PixelBuffer::open(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, ConvertError::ImageDecode(_)));
    }

    #[test]
    fn test_downscaled_keeps_aspect() {
        let buf = PixelBuffer::solid(400, 200, [50, 50, 50]).unwrap();
        let small = buf.downscaled(100).unwrap();
        assert_eq!((small.width, small.height), (100, 50));
        assert_eq!(small.rgb(10, 10), [50, 50, 50]);
    }

    #[test]
    fn test_downscaled_noop_when_small() {
        let buf = PixelBuffer::solid(10, 10, [0, 0, 0]).unwrap();
        assert!(buf.downscaled(100).is_none());
    }

    #[test]
    fn test_content_id_deterministic() {
        assert_eq!(content_id(b"abc"), content_id(b"abc"));
        assert_ne!(content_id(b"abc"), content_id(b"abd"));
        assert_eq!(content_id(b"abc").len(), 64);
    }
}
