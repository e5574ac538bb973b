//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use super::enums::{ColorSpec, ExportSize};

/// Canvas geometry and frame settings.
///
/// Controls the drawing surface a program gets before it issues any
/// commands of its own.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Display width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Display height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Background color - either a named color (red, green, blue, yellow,
    /// orange, pink, white, black) or an RGB array like `[255, 255, 224]`
    #[serde(default = "default_background")]
    pub background: ColorSpec,

    /// Smooth shape edges. Off by default: hard pixel edges keep thin
    /// lines and single pixels crisp, which suits teaching material
    #[serde(default = "default_antialiasing")]
    pub antialiasing: bool,

    /// Present a frame after every mutation burst. Programs animating many
    /// shapes per frame turn this off and present explicitly
    #[serde(default = "default_autoupdate")]
    pub autoupdate: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            antialiasing: default_antialiasing(),
            autoupdate: default_autoupdate(),
        }
    }
}

/// Text rendering settings shared by every text shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextConfig {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    /// Falls back to "Sans" if the specified font is not available
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    /// Can be a named weight or a numeric value (100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,

    /// Preferred font size for text, in points (valid range: 1.0 - 512.0)
    /// Programs read this off the loaded config; shapes that pick their own
    /// size are unaffected
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
            default_font_size: default_font_size(),
        }
    }
}

/// Image export settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export dimensions: the keyword "display" or a fixed [width, height]
    #[serde(default = "default_export_size")]
    pub size: ExportSize,

    /// Directory for timestamped exports. Defaults to the platform picture
    /// directory under "easel"; supports a leading ~
    #[serde(default)]
    pub directory: Option<String>,

    /// Filename for timestamped exports (supports chrono format specifiers)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Image format extension: png, jpg, jpeg, bmp, gif
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            size: default_export_size(),
            directory: None,
            filename_template: default_filename_template(),
            format: default_format(),
        }
    }
}

// Default value functions for serde

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_antialiasing() -> bool {
    false
}

fn default_autoupdate() -> bool {
    true
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_font_size() -> f64 {
    12.0
}

fn default_export_size() -> ExportSize {
    ExportSize::Keyword("display".to_string())
}

fn default_filename_template() -> String {
    "canvas_%Y-%m-%d_%H%M%S".to_string()
}

fn default_format() -> String {
    "png".to_string()
}
