//! Process-global canvas behind free functions.
//!
//! Lets a first drawing program stay tiny:
//!
//! ```no_run
//! use easel::facade;
//!
//! facade::init().unwrap();
//! let square = facade::draw_rectangle(100, 100, 200, 200);
//! facade::set_fill_color(square, easel::draw::color::RED);
//! facade::save_to_image("square.png").unwrap();
//! ```
//!
//! Everything here delegates to one shared [`Canvas`]. Drawing functions
//! called before [`init`] are dropped with a warning and hand back the
//! sentinel id 0 (which never names a shape); blocking functions return
//! [`CanvasError::NotInitialized`]. Programs needing several canvases or
//! scoped lifetimes use [`Canvas`] directly - nothing in the crate
//! requires this module.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::warn;

use crate::canvas::{Canvas, CanvasError, ShapeEdit};
use crate::draw::{Color, FontDescriptor, Raster, Shape, ShapeId};
use crate::input::{InputTracker, Key, MouseButton};

static CANVAS: OnceLock<Canvas> = OnceLock::new();

/// Size used by [`init`].
pub const DEFAULT_WIDTH: u32 = 800;
/// Size used by [`init`].
pub const DEFAULT_HEIGHT: u32 = 600;

/// Starts the shared canvas at 800x600.
pub fn init() -> Result<(), CanvasError> {
    init_sized(DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Starts the shared canvas at the given size.
pub fn init_sized(width: u32, height: u32) -> Result<(), CanvasError> {
    let (canvas, _frames) = Canvas::headless(width, height)?;
    init_with(canvas)
}

/// Installs an already-built canvas as the shared one.
///
/// If the shared canvas already exists it is kept and the new one is shut
/// down; a library cannot steal the canvas out from under a running
/// program.
pub fn init_with(canvas: Canvas) -> Result<(), CanvasError> {
    if CANVAS.set(canvas).is_err() {
        warn!("Shared canvas is already initialized; keeping the existing one");
    }
    Ok(())
}

/// The shared canvas, if it has been initialized.
pub fn canvas() -> Option<&'static Canvas> {
    CANVAS.get()
}

fn shared() -> Option<&'static Canvas> {
    let canvas = CANVAS.get();
    if canvas.is_none() {
        warn!("Shared canvas used before init; call easel::facade::init() first");
    }
    canvas
}

fn require() -> Result<&'static Canvas, CanvasError> {
    CANVAS.get().ok_or(CanvasError::NotInitialized)
}

fn add(shape: Shape) -> ShapeId {
    match shared() {
        Some(canvas) => canvas.add(shape),
        None => ShapeId::from_raw(0),
    }
}

fn edit(id: ShapeId, edit: ShapeEdit) {
    if let Some(canvas) = shared() {
        canvas.edit(id, edit);
    }
}

// ---- drawing ----

/// Draws a rectangle and returns its id.
pub fn draw_rectangle(left: i32, top: i32, width: i32, height: i32) -> ShapeId {
    add(Shape::rect(left, top, width, height))
}

/// Draws an ellipse inscribed in the given box and returns its id.
pub fn draw_oval(left: i32, top: i32, width: i32, height: i32) -> ShapeId {
    add(Shape::oval(left, top, width, height))
}

/// Draws a line segment and returns its id.
pub fn draw_line(x1: i32, y1: i32, x2: i32, y2: i32) -> ShapeId {
    add(Shape::line(x1, y1, x2, y2))
}

/// Draws a closed polygon through the given vertices and returns its id.
pub fn draw_polygon(points: Vec<(i32, i32)>) -> ShapeId {
    add(Shape::polygon(points))
}

/// Draws text anchored at its first baseline and returns its id.
pub fn draw_text(content: impl Into<String>, left: i32, baseline: i32) -> ShapeId {
    add(Shape::text(content, left, baseline))
}

/// Sets one pixel in the layer beneath all shapes.
pub fn set_pixel(x: i32, y: i32, color: Color) {
    if let Some(canvas) = shared() {
        canvas.set_pixel(x, y, color);
    }
}

/// Pre-grows the pixel layer for a batch of writes.
pub fn ensure_pixel_capacity(max_x: i32, max_y: i32) {
    if let Some(canvas) = shared() {
        canvas.ensure_pixel_capacity(max_x, max_y);
    }
}

// ---- shape edits ----

/// Replaces the interior color of a shape.
pub fn set_fill_color(id: ShapeId, color: Color) {
    edit(id, ShapeEdit::Fill(color));
}

/// Replaces the outline color of a shape.
pub fn set_stroke_color(id: ShapeId, color: Color) {
    edit(id, ShapeEdit::Stroke(color));
}

/// Replaces the outline thickness of a shape, in pixels.
pub fn set_stroke_width(id: ShapeId, width: f64) {
    edit(id, ShapeEdit::StrokeWidth(width));
}

/// Replaces the rotation of a shape, in degrees around its pivot.
pub fn set_rotation(id: ShapeId, degrees: f64) {
    edit(id, ShapeEdit::Rotation(degrees));
}

/// Moves a shape to a new position.
pub fn move_shape(id: ShapeId, x: i32, y: i32) {
    edit(id, ShapeEdit::MoveTo { x, y });
}

/// Replaces the font size of a text shape.
pub fn set_font_size(id: ShapeId, points: f64) {
    edit(id, ShapeEdit::FontSize(points));
}

/// Replaces the content of a text shape.
pub fn set_text(id: ShapeId, content: impl Into<String>) {
    edit(id, ShapeEdit::Text(content.into()));
}

/// Removes a shape from the canvas.
pub fn remove_shape(id: ShapeId) {
    if let Some(canvas) = shared() {
        canvas.remove(id);
    }
}

// ---- canvas-wide settings ----

/// Removes every shape, keeping the pixel layer.
pub fn clear() {
    if let Some(canvas) = shared() {
        canvas.clear();
    }
}

/// Returns the canvas to its just-created state.
pub fn reset() {
    if let Some(canvas) = shared() {
        canvas.reset();
    }
}

/// Replaces the background color.
pub fn set_background_color(color: Color) {
    if let Some(canvas) = shared() {
        canvas.set_background(color);
    }
}

/// Toggles antialiasing.
pub fn set_antialiasing(enabled: bool) {
    if let Some(canvas) = shared() {
        canvas.set_antialias(enabled);
    }
}

/// Replaces the font used by all text shapes.
pub fn set_font(font: FontDescriptor) {
    if let Some(canvas) = shared() {
        canvas.set_font(font);
    }
}

/// Toggles presenting a frame after every mutation burst.
pub fn set_autoupdate(enabled: bool) {
    if let Some(canvas) = shared() {
        canvas.set_autoupdate(enabled);
    }
}

/// Requests one presented frame regardless of the autoupdate setting.
pub fn update() {
    if let Some(canvas) = shared() {
        canvas.update();
    }
}

// ---- blocking operations ----

/// Waits until everything drawn so far is applied and presented.
pub fn flush() -> Result<(), CanvasError> {
    require()?.flush()
}

/// Renders the current state offscreen at the display size.
pub fn snapshot() -> Result<Raster, CanvasError> {
    require()?.snapshot()
}

/// Renders the current state and writes it to `path`.
pub fn save_to_image(path: impl AsRef<Path>) -> Result<PathBuf, CanvasError> {
    require()?.save_to_image(path)
}

/// Current canvas dimensions.
pub fn canvas_size() -> Result<(u32, u32), CanvasError> {
    require()?.size()
}

// ---- input queries ----

/// True while the key is held down. False before [`init`].
pub fn is_key_down(key: Key) -> bool {
    CANVAS.get().is_some_and(|canvas| canvas.input().is_key_down(key))
}

/// True while the mouse button is held down. False before [`init`].
pub fn is_button_down(button: MouseButton) -> bool {
    CANVAS
        .get()
        .is_some_and(|canvas| canvas.input().is_button_down(button))
}

/// True if the key was pressed within the given window before now.
pub fn was_key_pressed(key: Key, window: Duration) -> bool {
    CANVAS
        .get()
        .is_some_and(|canvas| canvas.input().was_key_pressed(key, window))
}

/// Presses of the key since this function last asked about it.
pub fn key_presses_since_last_asked(key: Key) -> u64 {
    CANVAS
        .get()
        .map_or(0, |canvas| canvas.input().key_presses_since_last_asked(key))
}

/// Last reported mouse position, (0, 0) before any report.
pub fn mouse_position() -> (i32, i32) {
    CANVAS
        .get()
        .map_or((0, 0), |canvas| canvas.input().last_mouse_position())
}

/// The shared input tracker, for the thread delivering input events.
pub fn input_tracker() -> Option<Arc<InputTracker>> {
    CANVAS.get().map(Canvas::input_handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    // The shared canvas is process-global, so one test walks the whole
    // lifecycle in order instead of racing several tests against it.
    #[test]
    fn lifecycle_from_uninitialized_to_drawing() {
        // before init: sentinels and NotInitialized, never panics
        assert_eq!(draw_rectangle(0, 0, 4, 4).raw(), 0);
        set_fill_color(ShapeId::from_raw(0), RED);
        assert!(!is_key_down(Key::Space));
        assert_eq!(mouse_position(), (0, 0));
        assert!(matches!(flush(), Err(CanvasError::NotInitialized)));
        assert!(matches!(canvas_size(), Err(CanvasError::NotInitialized)));

        init_sized(32, 24).unwrap();
        // a second init keeps the first canvas
        init_sized(999, 999).unwrap();
        assert_eq!(canvas_size().unwrap(), (32, 24));

        let id = draw_rectangle(2, 2, 8, 8);
        assert_eq!(id.raw(), 1);
        set_fill_color(id, RED);
        set_stroke_width(id, 0.0);
        flush().unwrap();

        let frame = snapshot().unwrap();
        assert_eq!(frame.pixel(5, 5), Some(RED));

        reset();
        assert_eq!(draw_rectangle(0, 0, 1, 1).raw(), 1);
    }
}
