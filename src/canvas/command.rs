//! Marshaled operations applied by the canvas worker.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crate::draw::{Color, FontDescriptor, Raster, RenderError, Shape, ShapeId};

use super::CanvasError;

/// An in-place change to one shape, addressed by id.
///
/// These mirror the setter operations a program performs after creating a
/// shape. Font size and text content apply to text shapes only and are
/// silently ignored for every other kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEdit {
    /// Replace the interior color
    Fill(Color),
    /// Replace the outline color
    Stroke(Color),
    /// Replace the outline thickness in pixels
    StrokeWidth(f64),
    /// Replace the rotation in degrees
    Rotation(f64),
    /// Move the shape; anchor semantics depend on the shape kind
    MoveTo { x: i32, y: i32 },
    /// Replace the font size (text shapes only)
    FontSize(f64),
    /// Replace the text content (text shapes only)
    Text(String),
}

impl ShapeEdit {
    /// Applies this edit to a shape.
    pub fn apply(self, shape: &mut Shape) {
        match self {
            ShapeEdit::Fill(color) => shape.set_fill(color),
            ShapeEdit::Stroke(color) => shape.set_stroke(color),
            ShapeEdit::StrokeWidth(width) => shape.set_stroke_width(width),
            ShapeEdit::Rotation(degrees) => shape.set_rotation(degrees),
            ShapeEdit::MoveTo { x, y } => shape.move_to(x, y),
            ShapeEdit::FontSize(points) => shape.set_font_size(points),
            ShapeEdit::Text(content) => shape.set_text(content),
        }
    }
}

/// One queue entry for the worker thread.
///
/// Mutations are fire-and-forget; queries and barriers carry a reply
/// channel the worker answers exactly once.
pub(crate) enum Command {
    /// Insert a shape under a pre-assigned id
    Add { id: ShapeId, shape: Shape },
    /// Apply an edit to the shape with the given id
    Edit { id: ShapeId, edit: ShapeEdit },
    /// Remove a shape; absent ids are ignored
    Remove(ShapeId),
    /// Remove every shape, keeping ids and the pixel layer
    Clear,
    /// Remove every shape, rewind ids, drop the pixel layer
    Reset,
    /// Write one pixel into the pixel layer
    SetPixel { x: i32, y: i32, color: Color },
    /// Pre-grow the pixel layer
    EnsurePixelCapacity { max_x: i32, max_y: i32 },
    /// Toggle canvas-wide antialiasing
    SetAntialias(bool),
    /// Replace the opaque background color
    SetBackground(Color),
    /// Replace the font used by text shapes
    SetFont(FontDescriptor),
    /// Toggle present-after-every-mutation
    SetAutoupdate(bool),
    /// Present a frame at the next queue idle, regardless of autoupdate
    Update,
    /// Barrier: apply everything queued before, present, then reply
    Flush(Sender<()>),
    /// Render offscreen at the given size (`None` means display size)
    Snapshot {
        size: Option<(u32, u32)>,
        reply: Sender<Result<Raster, RenderError>>,
    },
    /// Render offscreen and encode to a file
    Export {
        path: PathBuf,
        size: Option<(u32, u32)>,
        reply: Sender<Result<PathBuf, CanvasError>>,
    },
    /// Current display surface dimensions
    QuerySize(Sender<(u32, u32)>),
    /// Copy of the shape with the given id, if it exists
    QueryShape {
        id: ShapeId,
        reply: Sender<Option<Shape>>,
    },
    /// Number of live shapes
    QueryShapeCount(Sender<usize>),
    /// Stop the worker thread
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ShapeKind;
    use crate::draw::color::RED;

    #[test]
    fn edits_apply_to_matching_shapes() {
        let mut shape = Shape::rect(0, 0, 10, 10);
        ShapeEdit::Fill(RED).apply(&mut shape);
        ShapeEdit::StrokeWidth(4.0).apply(&mut shape);
        ShapeEdit::MoveTo { x: 3, y: 9 }.apply(&mut shape);

        assert_eq!(shape.style.fill, RED);
        assert_eq!(shape.style.stroke_width, 4.0);
        assert!(matches!(
            shape.kind,
            ShapeKind::Rect { left: 3, top: 9, .. }
        ));
    }

    #[test]
    fn text_only_edits_ignore_other_kinds() {
        let mut shape = Shape::line(0, 0, 5, 5);
        let before = shape.clone();
        ShapeEdit::FontSize(30.0).apply(&mut shape);
        ShapeEdit::Text("hi".into()).apply(&mut shape);
        assert_eq!(shape, before);
    }
}
