//! Error types for the conversion engine.

/// Everything a conversion can fail with.
///
/// Each variant is reported as-is to the caller; a failed conversion never
/// produces partial output.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The source could not be read, or is not a decodable image.
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    /// A required field is missing or a value is unusable even after clamping.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The named preset does not exist and no custom charset was given.
    #[error("unknown preset '{name}'. Available presets: {}", .available.join(", "))]
    UnknownPreset { name: String, available: Vec<String> },

    /// Internal failure, e.g. a buffer too large to allocate.
    #[error("processing failed: {0}")]
    Processing(String),
}

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        ConvertError::ImageDecode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Allocate a zeroed buffer of `len` elements, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_alloc<T: Clone + Default>(len: usize, what: &str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        ConvertError::Processing(format!("cannot allocate {} ({} elements): {}", what, len, e))
    })?;
    buf.resize(len, T::default());
    Ok(buf)
}

/// Multiply grid dimensions, failing on overflow.
pub(crate) fn checked_area(width: usize, height: usize, what: &str) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| {
        ConvertError::Processing(format!("{} of {}x{} overflows", what, width, height))
    })
}
