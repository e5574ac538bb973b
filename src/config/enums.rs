//! Configuration enum types.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::draw::{Color, color};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// background = "white"
///
/// # Custom RGB color (0-255 per component)
/// background = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names fall back to white with a warning, which keeps a
    /// typo in the config from blanking the canvas. RGB arrays are converted
    /// from 0-255 range to 0.0-1.0 range with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => color::named(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using white", name);
                color::WHITE
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }
}

/// Export size specification - the display size or fixed dimensions.
///
/// # Examples
/// ```toml
/// # Export at whatever size the canvas is displayed
/// size = "display"
///
/// # Export at a fixed size regardless of the display
/// size = [1920, 1080]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ExportSize {
    /// The keyword "display"
    Keyword(String),
    /// Fixed [width, height] in pixels
    Fixed([u32; 2]),
}

impl ExportSize {
    /// Resolves to fixed dimensions, or `None` to follow the display.
    ///
    /// Anything other than the keyword `display` or a positive fixed size
    /// falls back to the display size with a warning.
    pub fn resolve(&self) -> Option<(u32, u32)> {
        match self {
            ExportSize::Keyword(word) => {
                if !word.eq_ignore_ascii_case("display") {
                    warn!("Unknown export size '{}', using the display size", word);
                }
                None
            }
            ExportSize::Fixed([width, height]) => {
                if *width == 0 || *height == 0 {
                    warn!("Export size {width}x{height} is empty, using the display size");
                    None
                } else {
                    Some((*width, *height))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_color_resolves() {
        let spec = ColorSpec::Name("blue".to_string());
        assert_eq!(spec.to_color(), color::BLUE);
    }

    #[test]
    fn unknown_color_name_falls_back_to_white() {
        let spec = ColorSpec::Name("blurple".to_string());
        assert_eq!(spec.to_color(), color::WHITE);
    }

    #[test]
    fn rgb_array_converts_components() {
        let spec = ColorSpec::Rgb([255, 0, 0]);
        assert_eq!(spec.to_color(), color::RED);
    }

    #[test]
    fn display_keyword_resolves_to_none() {
        assert_eq!(ExportSize::Keyword("display".to_string()).resolve(), None);
        assert_eq!(ExportSize::Keyword("Display".to_string()).resolve(), None);
    }

    #[test]
    fn fixed_size_resolves_unless_empty() {
        assert_eq!(ExportSize::Fixed([1920, 1080]).resolve(), Some((1920, 1080)));
        assert_eq!(ExportSize::Fixed([0, 1080]).resolve(), None);
    }
}
