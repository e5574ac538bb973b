//! Configuration file support for easel.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/easel/config.toml`. Settings
//! include canvas geometry, the default background, text rendering, and
//! image export preferences.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, ExportSize};
pub use types::{CanvasConfig, ExportConfig, TextConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::canvas::CanvasOptions;
use crate::draw::{FontDescriptor, RenderOptions};
use crate::export::{ExportTarget, expand_tilde};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML
/// file. All fields have sensible defaults and will use those if not
/// specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 600
/// background = "white"
/// antialiasing = false
///
/// [text]
/// font_family = "Sans"
/// default_font_size = 12.0
///
/// [export]
/// size = "display"
/// format = "png"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Canvas geometry and frame settings
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Text rendering settings
    #[serde(default)]
    pub text: TextConfig,

    /// Image export preferences
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values won't cause
    /// rendering issues. Invalid values are clamped to the nearest valid
    /// value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width` / `canvas.height`: 1 - 16384
    /// - `text.default_font_size`: 1.0 - 512.0
    fn validate_and_clamp(&mut self) {
        // Canvas dimensions: 1 - 16384
        if !(1..=16384).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 1-16384 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(1, 16384);
        }
        if !(1..=16384).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 1-16384 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(1, 16384);
        }

        // Font size: 1.0 - 512.0
        if !(1.0..=512.0).contains(&self.text.default_font_size) {
            log::warn!(
                "Invalid default_font_size {:.1}, clamping to 1.0-512.0 range",
                self.text.default_font_size
            );
            self.text.default_font_size = self.text.default_font_size.clamp(1.0, 512.0);
        }

        // Validate font weight is reasonable
        let valid_weight = matches!(
            self.text.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .text
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.text.font_weight
            );
            self.text.font_weight = "normal".to_string();
        }

        // Validate font style
        if !matches!(
            self.text.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.text.font_style
            );
            self.text.font_style = "normal".to_string();
        }

        // Validate export format
        if !matches!(
            self.export.format.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "bmp" | "gif"
        ) {
            log::warn!(
                "Invalid export format '{}', falling back to 'png'",
                self.export.format
            );
            self.export.format = "png".to_string();
        }

        // An empty template would produce filenames like ".png"
        if self.export.filename_template.is_empty() {
            log::warn!("Empty export filename_template, using the default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/easel/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("easel");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Display surface dimensions from the `[canvas]` section.
    pub fn display_size(&self) -> (u32, u32) {
        (self.canvas.width, self.canvas.height)
    }

    /// Builds canvas construction options from this configuration.
    pub fn canvas_options(&self) -> CanvasOptions {
        CanvasOptions {
            render: RenderOptions {
                antialias: self.canvas.antialiasing,
                background: self.canvas.background.to_color(),
                font: self.font_descriptor(),
            },
            autoupdate: self.canvas.autoupdate,
            export_size: self.export.size.resolve(),
        }
    }

    /// Font settings from the `[text]` section as a descriptor.
    pub fn font_descriptor(&self) -> FontDescriptor {
        FontDescriptor {
            family: self.text.font_family.clone(),
            weight: self.text.font_weight.clone(),
            style: self.text.font_style.clone(),
        }
    }

    /// Resolves the `[export]` section into a concrete target for
    /// timestamped exports.
    pub fn export_target(&self) -> ExportTarget {
        let defaults = ExportTarget::default();
        ExportTarget {
            directory: self
                .export
                .directory
                .as_deref()
                .map(expand_tilde)
                .unwrap_or(defaults.directory),
            filename_template: self.export.filename_template.clone(),
            format: self.export.format.clone(),
        }
    }
}
