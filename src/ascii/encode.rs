//! Output encoders, one per colour mode.
//!
//! Every encoder walks the same [`OutputGrid`] row by row. Coloured encoders
//! coalesce adjacent cells of identical (quantised) colour into one run, so a
//! row of a single colour costs one escape sequence or one span.

use std::fmt::Write;

use super::grid::{Cell, CellColor, OutputGrid};
use super::xterm::nearest_ansi256;
use crate::config::ColorMode;

/// Resets all SGR attributes. Emitted once at the end of escape-coded output.
pub const RESET: &str = "\x1b[0m";

const HTML_OPEN: &str = "<div style=\"font-family:monospace;white-space:pre;line-height:1\">";
const HTML_CLOSE: &str = "</div>";

/// Serialise a grid in the given mode.
pub fn encode(grid: &OutputGrid, mode: ColorMode) -> String {
    match mode {
        ColorMode::Grayscale => encode_plain(grid),
        ColorMode::Ansi256 => encode_ansi256(grid),
        ColorMode::Truecolor => encode_truecolor(grid),
        ColorMode::Html => encode_html(grid),
        ColorMode::Braille => {
            if grid.cells.iter().any(|c| c.color.is_some()) {
                encode_truecolor(grid)
            } else {
                encode_plain(grid)
            }
        }
    }
}

/// Glyphs only, rows joined by `\n`, no trailing newline.
pub fn encode_plain(grid: &OutputGrid) -> String {
    grid.glyph_rows().join("\n")
}

#[inline]
fn color_of(cell: &Cell) -> CellColor {
    cell.color.unwrap_or(CellColor::WHITE)
}

/// Split a row into maximal runs sharing the same key.
fn runs<K, F>(row: &[Cell], key: F) -> Vec<(K, String)>
where
    K: PartialEq + Copy,
    F: Fn(&Cell) -> K,
{
    let mut out: Vec<(K, String)> = Vec::new();
    for cell in row {
        let k = key(cell);
        match out.last_mut() {
            Some((last, text)) if *last == k => text.push(cell.glyph),
            _ => out.push((k, cell.glyph.to_string())),
        }
    }
    out
}

/// Escape-coded output shared by the ansi256 and truecolor encoders.
fn encode_escaped<K, F, S>(grid: &OutputGrid, key: F, start: S) -> String
where
    K: PartialEq + Copy,
    F: Fn(&Cell) -> K,
    S: Fn(&mut String, K),
{
    let mut out = String::with_capacity(grid.cells.len() * 4);
    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        for (k, text) in runs(row, &key) {
            start(&mut out, k);
            out.push_str(&text);
        }
    }
    out.push_str(RESET);
    out
}

/// `ESC[38;5;Nm` before each run of cells with the same palette index.
pub fn encode_ansi256(grid: &OutputGrid) -> String {
    encode_escaped(
        grid,
        |cell| nearest_ansi256(color_of(cell)),
        |out, index| {
            let _ = write!(out, "\x1b[38;5;{}m", index);
        },
    )
}

/// `ESC[38;2;R;G;Bm` before each run of cells with the same colour.
pub fn encode_truecolor(grid: &OutputGrid) -> String {
    encode_escaped(grid, color_of, |out, c| {
        let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
    })
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Embeddable markup: one styled span per colour run, `<br>` between rows.
pub fn encode_html(grid: &OutputGrid) -> String {
    let mut out = String::with_capacity(HTML_OPEN.len() + grid.cells.len() * 8);
    out.push_str(HTML_OPEN);
    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            out.push_str("<br>");
        }
        for (color, text) in runs(row, color_of) {
            let _ = write!(out, "<span style=\"color:{}\">", color.hex());
            push_escaped(&mut out, &text);
            out.push_str("</span>");
        }
    }
    out.push_str(HTML_CLOSE);
    out
}
