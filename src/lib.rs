//! textart library crate.
//!
//! Converts raster images into text art: plain glyphs, ANSI-256 or truecolor
//! escape sequences, embeddable HTML, or Unicode Braille.
//!
//! ```no_run
//! use textart::{convert, ConversionConfig, SourceImage};
//!
//! let source = SourceImage::open("photo.png".as_ref())?;
//! let art = convert(&source, &ConversionConfig::default())?;
//! println!("{}", art);
//! # Ok::<(), textart::ConvertError>(())
//! ```

pub mod ascii;
pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pixels;
pub mod suggest;

pub use ascii::list_presets;
pub use cache::ResultCache;
pub use config::{ColorMode, ConversionConfig};
pub use error::{ConvertError, Result};
pub use pipeline::{convert, convert_bytes, Converter};
pub use pixels::{PixelBuffer, SourceImage};
pub use suggest::suggest_settings;
