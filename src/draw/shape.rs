//! Shape definitions for the drawing canvas.

use super::color::{self, Color};

/// Visual attributes shared by every shape kind.
///
/// New shapes start with an invisible fill and a thin opaque black stroke,
/// so beginners see an outline immediately and opt into fills explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Interior color; alpha 0 leaves the interior unpainted
    pub fill: Color,
    /// Outline color
    pub stroke: Color,
    /// Outline thickness in pixels
    pub stroke_width: f64,
    /// Clockwise rotation in degrees around the shape's pivot
    pub rotation: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: color::DEFAULT_FILL,
            stroke: color::DEFAULT_STROKE,
            stroke_width: 1.0,
            rotation: 0.0,
        }
    }
}

/// Geometry of a drawable shape.
///
/// Each variant carries only its geometric parameters; colors, stroke width,
/// and rotation live in [`Style`]. The renderer dispatches over this enum
/// exhaustively, so adding a kind is a compile-checked change.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    Rect {
        /// Top-left X coordinate
        left: i32,
        /// Top-left Y coordinate
        top: i32,
        /// Width in pixels
        width: i32,
        /// Height in pixels
        height: i32,
    },
    /// Ellipse described by its bounding box
    Oval {
        /// Bounding box top-left X coordinate
        left: i32,
        /// Bounding box top-left Y coordinate
        top: i32,
        /// Bounding box width in pixels
        width: i32,
        /// Bounding box height in pixels
        height: i32,
    },
    /// Straight line between two points
    Line {
        /// Starting X coordinate
        x1: i32,
        /// Starting Y coordinate
        y1: i32,
        /// Ending X coordinate
        x2: i32,
        /// Ending Y coordinate
        y2: i32,
    },
    /// Closed polygon over an ordered vertex list (may be empty)
    Polygon {
        /// Sequence of (x, y) vertices
        points: Vec<(i32, i32)>,
    },
    /// Single line of text anchored at its baseline
    Text {
        /// Text content to display
        content: String,
        /// Baseline X coordinate
        left: i32,
        /// Baseline Y coordinate
        baseline: i32,
        /// Font size in points
        font_size: f64,
    },
}

/// Default font size for new text shapes, in points.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// A drawable canvas object: shared style plus kind-specific geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub style: Style,
    pub kind: ShapeKind,
}

impl Shape {
    /// Creates a rectangle with the default style.
    pub fn rect(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::from_kind(ShapeKind::Rect {
            left,
            top,
            width,
            height,
        })
    }

    /// Creates an oval inscribed in the given bounding box.
    pub fn oval(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::from_kind(ShapeKind::Oval {
            left,
            top,
            width,
            height,
        })
    }

    /// Creates a line from (x1, y1) to (x2, y2).
    pub fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::from_kind(ShapeKind::Line { x1, y1, x2, y2 })
    }

    /// Creates a polygon over the given vertices.
    pub fn polygon(points: Vec<(i32, i32)>) -> Self {
        Self::from_kind(ShapeKind::Polygon { points })
    }

    /// Creates a text shape at the given baseline anchor with the default
    /// font size.
    pub fn text(content: impl Into<String>, left: i32, baseline: i32) -> Self {
        Self::from_kind(ShapeKind::Text {
            content: content.into(),
            left,
            baseline,
            font_size: DEFAULT_FONT_SIZE,
        })
    }

    fn from_kind(kind: ShapeKind) -> Self {
        Self {
            style: Style::default(),
            kind,
        }
    }

    /// Sets the interior color.
    pub fn set_fill(&mut self, fill: Color) {
        self.style.fill = fill;
    }

    /// Sets the outline color.
    pub fn set_stroke(&mut self, stroke: Color) {
        self.style.stroke = stroke;
    }

    /// Sets the outline thickness in pixels.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.stroke_width = width;
    }

    /// Sets the rotation in degrees around the shape's pivot.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.style.rotation = degrees;
    }

    /// Moves the shape to (x, y).
    ///
    /// Rectangles, ovals, and text interpret (x, y) as their new anchor
    /// (top-left corner, or left/baseline for text). Lines and polygons
    /// move their first point to (x, y) and translate every other point by
    /// the same delta, so relative geometry is preserved. Moving an empty
    /// polygon does nothing.
    pub fn move_to(&mut self, x: i32, y: i32) {
        match &mut self.kind {
            ShapeKind::Rect { left, top, .. } | ShapeKind::Oval { left, top, .. } => {
                *left = x;
                *top = y;
            }
            ShapeKind::Line { x1, y1, x2, y2 } => {
                let dx = x - *x1;
                let dy = y - *y1;
                *x1 = x;
                *y1 = y;
                *x2 += dx;
                *y2 += dy;
            }
            ShapeKind::Polygon { points } => {
                let Some(&(first_x, first_y)) = points.first() else {
                    return;
                };
                let dx = x - first_x;
                let dy = y - first_y;
                for (px, py) in points.iter_mut() {
                    *px += dx;
                    *py += dy;
                }
            }
            ShapeKind::Text { left, baseline, .. } => {
                *left = x;
                *baseline = y;
            }
        }
    }

    /// Sets the font size in points. Silently ignored for non-text shapes.
    pub fn set_font_size(&mut self, points: f64) {
        if let ShapeKind::Text { font_size, .. } = &mut self.kind {
            *font_size = points;
        }
    }

    /// Replaces the text content. Silently ignored for non-text shapes.
    pub fn set_text(&mut self, new_content: impl Into<String>) {
        if let ShapeKind::Text { content, .. } = &mut self.kind {
            *content = new_content.into();
        }
    }

    /// Returns the rotation pivot for this shape.
    ///
    /// Rectangles and ovals rotate around the center of their bounding box,
    /// lines around their midpoint, polygons around their centroid, and text
    /// around its (left, baseline) anchor.
    pub fn pivot(&self) -> (f64, f64) {
        match &self.kind {
            ShapeKind::Rect {
                left,
                top,
                width,
                height,
            }
            | ShapeKind::Oval {
                left,
                top,
                width,
                height,
            } => (
                f64::from(*left) + f64::from(*width) / 2.0,
                f64::from(*top) + f64::from(*height) / 2.0,
            ),
            ShapeKind::Line { x1, y1, x2, y2 } => (
                f64::from(*x1) + f64::from(x2 - x1) / 2.0,
                f64::from(*y1) + f64::from(y2 - y1) / 2.0,
            ),
            ShapeKind::Polygon { points } => polygon_centroid(points),
            ShapeKind::Text { left, baseline, .. } => (f64::from(*left), f64::from(*baseline)),
        }
    }
}

/// Arithmetic mean of the vertex coordinates. An empty polygon has no
/// meaningful centroid; it reports the origin so transforms stay finite.
pub(crate) fn polygon_centroid(points: &[(i32, i32)]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sum_x, sum_y) = points.iter().fold((0.0, 0.0), |(sx, sy), &(x, y)| {
        (sx + f64::from(x), sy + f64::from(y))
    });
    (sum_x / n, sum_y / n)
}
