//! Output grid dimensions.

/// Number of output rows for a given width.
///
/// Glyph cells are taller than they are wide, so the source aspect ratio is
/// scaled by `aspect_correction` (about 0.5 for common terminal fonts):
/// `rows = round(width * (src_h / src_w) * aspect_correction)`, at least 1.
pub fn output_height(
    img_width: u32,
    img_height: u32,
    output_width: u32,
    aspect_correction: f32,
) -> u32 {
    if img_width == 0 || img_height == 0 || output_width == 0 {
        return 1;
    }
    let ratio = img_height as f64 / img_width as f64;
    let rows = (output_width as f64 * ratio * aspect_correction as f64).round();
    if rows < 1.0 {
        1
    } else {
        rows as u32
    }
}
