//! CLI enum types for output mode options.

use clap::ValueEnum;

use textart::ColorMode;

/// Output colour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Grayscale,
    #[value(alias = "ansi")]
    Ansi256,
    Truecolor,
    Html,
    Braille,
}

impl From<ColorChoice> for ColorMode {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Grayscale => ColorMode::Grayscale,
            ColorChoice::Ansi256 => ColorMode::Ansi256,
            ColorChoice::Truecolor => ColorMode::Truecolor,
            ColorChoice::Html => ColorMode::Html,
            ColorChoice::Braille => ColorMode::Braille,
        }
    }
}
