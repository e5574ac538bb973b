//! Drawing primitives and the shape registry (Cairo-based).
//!
//! This module defines the core canvas state and how it becomes pixels:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Shape`]: styled geometry variants (rectangles, ovals, lines, polygons, text)
//! - [`Scene`]: id-keyed shape registry with stable paint order
//! - [`PixelBuffer`]: growable layer of directly-set pixels beneath all shapes
//! - Rendering functions compositing everything into live frames or [`Raster`]s

pub mod color;
pub mod font;
pub mod pixels;
pub mod raster;
pub mod render;
pub mod scene;
pub mod shape;

// Re-export commonly used types at module level
pub use color::Color;
pub use font::FontDescriptor;
pub use pixels::PixelBuffer;
pub use raster::Raster;
pub use render::{RenderError, RenderOptions, render_scene, render_shape, render_to_raster};
pub use scene::{Scene, ShapeId, UnknownShapeId};
pub use shape::{DEFAULT_FONT_SIZE, Shape, ShapeKind, Style};

// Re-export color constants for public API (unused internally but part of public interface)
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
