//! Encoding rendered frames to image files.

use std::ffi::OsStr;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{ImageFormat, RgbImage};
use log::{debug, info, warn};
use thiserror::Error;

use crate::draw::Raster;

/// Errors that can occur while writing a canvas image to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Image encoding failed: {0}")]
    EncodeError(#[from] image::ImageError),

    #[error("Failed to write image file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A {width}x{height} frame cannot be encoded")]
    EmptyFrame { width: u32, height: u32 },
}

/// Where exports land when the caller gives no explicit path.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    /// Directory to save canvas images to.
    pub directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
    /// Image format extension.
    pub format: String,
}

impl Default for ExportTarget {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("easel"),
            filename_template: "canvas_%Y-%m-%d_%H%M%S".to_string(),
            format: "png".to_string(),
        }
    }
}

impl ExportTarget {
    /// Expands the template into a concrete path for the current time.
    pub fn resolve_path(&self) -> PathBuf {
        self.directory
            .join(generate_filename(&self.filename_template, &self.format))
    }
}

/// Generate a filename from a chrono template and an extension.
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), format)
}

/// Picks the encoding for a path by its extension.
///
/// The extension is matched case-insensitively. Anything outside the
/// supported set, including a missing extension, falls back to PNG; the
/// file keeps the name it was given either way.
fn format_for_path(path: &Path) -> ImageFormat {
    let ext = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => ImageFormat::Png,
        Some("jpg") | Some("jpeg") => ImageFormat::Jpeg,
        Some("bmp") => ImageFormat::Bmp,
        Some("gif") => ImageFormat::Gif,
        other => {
            if let Some(other) = other {
                warn!("Unsupported image extension {other:?}, encoding as png");
            }
            ImageFormat::Png
        }
    }
}

/// Encodes a frame and writes it to `path`, creating parent directories
/// as needed.
///
/// The frame is flattened to RGB before encoding. Alpha never reaches the
/// file: frames are composited over an opaque background, and formats like
/// JPEG could not carry it anyway.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<PathBuf, ExportError> {
    let format = format_for_path(path);
    let (width, height) = (raster.width(), raster.height());

    let Some(flat) = RgbImage::from_raw(width, height, raster.rgb_bytes()) else {
        return Err(ExportError::EmptyFrame { width, height });
    };

    let mut encoded = Vec::new();
    flat.write_to(&mut Cursor::new(&mut encoded), format)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        info!("Creating image directory: {}", parent.display());
        fs::create_dir_all(parent)?;
    }

    if let Err(err) = fs::write(path, &encoded) {
        // Do not leave a truncated file behind
        fs::remove_file(path).ok();
        return Err(err.into());
    }

    debug!(
        "Canvas image saved: {} ({} bytes, {format:?})",
        path.display(),
        encoded.len()
    );
    Ok(path.to_path_buf())
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
