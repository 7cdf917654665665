//! Text-art rendering stages.
//!
//! The pipeline in [`crate::pipeline`] strings these together:
//!
//! 1. **Filters** - photometric and spatial adjustments on the source pixels
//! 2. **Resampling** - average source blocks down to the cell grid
//! 3. **Edge detection** - optional Sobel pass over cell luminance
//! 4. **Dithering** - optional Floyd-Steinberg error diffusion
//! 5. **Glyph mapping** - intensity (and edges) to a character from a preset
//! 6. **Encoding** - plain text, ANSI-256, truecolor, HTML or Braille
//!
//! # Character Sets
//!
//! Named presets live in [`charset`]; a custom glyph string overrides them.
//! Braille mode bypasses the presets and draws 2x4 dot cells instead.

pub mod braille;
mod charset;
mod dimensions;
mod dither;
mod downsample;
mod edges;
mod encode;
mod filters;
mod grayscale;
mod grid;
mod mapping;
mod xterm;

pub use charset::{list_presets, preset_glyphs, preset_names, GlyphRamp};
pub use dimensions::output_height;
pub use dither::{dither, dither_plane, dither_plane_to, dither_rgb, dither_rgb_to};
pub use downsample::{resample, resample_exact};
pub use edges::{
    detect_edges, EdgeCell, EdgeDirection, EdgeMap, StructureCharset, STRUCTURE_CHARSET,
    STRUCTURE_CHARSET_ASCII,
};
pub use encode::{encode, encode_ansi256, encode_html, encode_plain, encode_truecolor, RESET};
pub use filters::{apply_filters, gaussian_blur, unsharp_mask};
pub use grayscale::{histogram, luminance, to_grayscale};
pub use grid::{Cell, CellColor, OutputGrid, SampleGrid};
pub use mapping::{glyph_index, level_intensity, remap_detail, select_glyph};
pub use xterm::{nearest_ansi256, xterm_color, CUBE_LEVELS};

pub use braille::{grid_to_braille, BRAILLE_BASE};
