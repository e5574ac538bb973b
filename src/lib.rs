//! A drawing canvas for learning to program.
//!
//! easel puts a shape registry, a pixel layer, and raster export behind a
//! thread-owned [`Canvas`]: programs add shapes, get ids back immediately,
//! and keep mutating them by id while a worker thread turns the state into
//! frames. The [`facade`] module wraps one shared canvas in free functions
//! for the smallest programs; everything it does is available on [`Canvas`]
//! directly.

pub mod canvas;
pub mod config;
pub mod display;
pub mod draw;
pub mod export;
pub mod facade;
pub mod input;

pub use canvas::{Canvas, CanvasError, CanvasOptions, ShapeEdit};
pub use config::Config;
pub use draw::{Color, Shape, ShapeId};
