//! Cairo-based compositing of the canvas: background, pixel layer, shapes.

use thiserror::Error;

use super::font::FontDescriptor;
use super::pixels::PixelBuffer;
use super::raster::Raster;
use super::scene::Scene;
use super::shape::{Shape, ShapeKind};
use super::{Color, color};

/// A frame could not be produced.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cairo rendering failed: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("frame readback failed: {0}")]
    Readback(#[from] cairo::BorrowError),
}

/// Canvas-wide rendering settings.
///
/// Shapes carry their own colors and stroke widths; everything that applies
/// to the whole frame lives here.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Smooth edges when true; hard pixel edges when false
    pub antialias: bool,
    /// Opaque background color painted first (alpha is ignored)
    pub background: Color,
    /// Font family/weight/style shared by all text shapes
    pub font: FontDescriptor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            antialias: false,
            background: color::WHITE,
            font: FontDescriptor::default(),
        }
    }
}

/// Paints one complete frame onto a Cairo context.
///
/// Order: opaque background, then the pixel layer blitted at the origin,
/// then every shape in paint order. Each shape gets its own save/restore,
/// so rotation never leaks into the next shape.
pub fn render_scene(ctx: &cairo::Context, scene: &Scene, pixels: &PixelBuffer, opts: &RenderOptions) {
    let antialias = if opts.antialias {
        cairo::Antialias::Default
    } else {
        cairo::Antialias::None
    };
    ctx.set_antialias(antialias);

    let bg = opts.background;
    ctx.set_source_rgb(bg.r, bg.g, bg.b);
    let _ = ctx.paint();

    let _ = ctx.set_source_surface(pixels.surface(), 0.0, 0.0);
    let _ = ctx.paint();

    for (_, shape) in scene.iter() {
        render_shape(ctx, shape, &opts.font);
    }
}

/// Renders a single shape with its own rotation transform.
pub fn render_shape(ctx: &cairo::Context, shape: &Shape, font: &FontDescriptor) {
    let style = &shape.style;

    ctx.save().ok();

    // Rotate around the shape's own pivot; restore() undoes this before the
    // next shape is painted.
    let (px, py) = shape.pivot();
    ctx.translate(px, py);
    ctx.rotate(style.rotation.to_radians());
    ctx.translate(-px, -py);

    // Square caps and miter joins, matching classic AWT strokes.
    ctx.set_line_width(style.stroke_width);
    ctx.set_line_cap(cairo::LineCap::Square);
    ctx.set_line_join(cairo::LineJoin::Miter);

    match &shape.kind {
        ShapeKind::Rect {
            left,
            top,
            width,
            height,
        } => {
            if *width >= 0 && *height >= 0 {
                ctx.rectangle(
                    f64::from(*left),
                    f64::from(*top),
                    f64::from(*width),
                    f64::from(*height),
                );
                fill_then_stroke(ctx, style);
            }
        }
        ShapeKind::Oval {
            left,
            top,
            width,
            height,
        } => {
            render_oval_path(ctx, *left, *top, *width, *height);
            fill_then_stroke(ctx, style);
        }
        ShapeKind::Line { x1, y1, x2, y2 } => {
            ctx.set_source_rgba(style.stroke.r, style.stroke.g, style.stroke.b, style.stroke.a);
            ctx.move_to(f64::from(*x1), f64::from(*y1));
            ctx.line_to(f64::from(*x2), f64::from(*y2));
            let _ = ctx.stroke();
        }
        ShapeKind::Polygon { points } => {
            if let Some(&(x0, y0)) = points.first() {
                ctx.move_to(f64::from(x0), f64::from(y0));
                for &(x, y) in &points[1..] {
                    ctx.line_to(f64::from(x), f64::from(y));
                }
                ctx.close_path();
                fill_then_stroke(ctx, style);
            }
        }
        ShapeKind::Text {
            content,
            left,
            baseline,
            font_size,
        } => {
            render_text(ctx, content, *left, *baseline, *font_size, style.stroke, font);
        }
    }

    ctx.restore().ok();
}

/// Builds an elliptical path inscribed in the given bounding box.
///
/// The unit circle is traced under a scaled transform which is restored
/// before stroking, so the stroke width stays uniform. Degenerate boxes are
/// skipped entirely; a zero scale would poison the context matrix.
fn render_oval_path(ctx: &cairo::Context, left: i32, top: i32, width: i32, height: i32) {
    if width <= 0 || height <= 0 {
        return;
    }
    let rx = f64::from(width) / 2.0;
    let ry = f64::from(height) / 2.0;

    ctx.save().ok();
    ctx.translate(f64::from(left) + rx, f64::from(top) + ry);
    ctx.scale(rx, ry);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();
}

/// Paints the current path: interior first, outline on top of it.
fn fill_then_stroke(ctx: &cairo::Context, style: &crate::draw::Style) {
    let fill = style.fill;
    ctx.set_source_rgba(fill.r, fill.g, fill.b, fill.a);
    let _ = ctx.fill_preserve();

    let stroke = style.stroke;
    ctx.set_source_rgba(stroke.r, stroke.g, stroke.b, stroke.a);
    let _ = ctx.stroke();
}

/// Renders a single text run with Pango, anchored at its baseline.
///
/// Text is "ink", so it uses the stroke color. The requested y names the
/// first line's baseline; Pango positions layouts by their top-left corner,
/// hence the baseline adjustment.
fn render_text(
    ctx: &cairo::Context,
    content: &str,
    left: i32,
    baseline: i32,
    font_size: f64,
    color: Color,
    font: &FontDescriptor,
) {
    if content.is_empty() {
        return;
    }

    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(font_size));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(content);

    let layout_baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
    let adjusted_y = f64::from(baseline) - layout_baseline;

    ctx.move_to(f64::from(left), adjusted_y);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    pangocairo::functions::show_layout(ctx, &layout);
}

/// Renders the scene into a fresh offscreen raster of the given size.
///
/// Uses the same painting path as live frames, so exports are pixel-faithful
/// to what a display surface was shown.
pub fn render_to_raster(
    scene: &Scene,
    pixels: &PixelBuffer,
    opts: &RenderOptions,
    width: u32,
    height: u32,
) -> Result<Raster, RenderError> {
    let mut surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        width.min(i32::MAX as u32) as i32,
        height.min(i32::MAX as u32) as i32,
    )?;
    {
        let ctx = cairo::Context::new(&surface)?;
        render_scene(&ctx, scene, pixels, opts);
    }
    Ok(Raster::from_surface(&mut surface)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Shape;
    use crate::draw::color::{BLACK, RED, WHITE};

    fn empty_pixels() -> PixelBuffer {
        PixelBuffer::new().expect("pixel buffer")
    }

    #[test]
    fn blank_scene_renders_background() {
        let scene = Scene::new();
        let raster =
            render_to_raster(&scene, &empty_pixels(), &RenderOptions::default(), 20, 10).unwrap();
        assert_eq!((raster.width(), raster.height()), (20, 10));
        assert_eq!(raster.pixel(0, 0), Some(WHITE));
        assert_eq!(raster.pixel(19, 9), Some(WHITE));
    }

    #[test]
    fn stroked_rect_appears_on_background() {
        let mut scene = Scene::new();
        // width 2 keeps probed pixels strictly inside the stroke band
        let mut rect = Shape::rect(2, 2, 10, 6);
        rect.set_stroke_width(2.0);
        scene.add(rect);
        let raster =
            render_to_raster(&scene, &empty_pixels(), &RenderOptions::default(), 20, 12).unwrap();
        assert_eq!(raster.pixel(2, 2), Some(BLACK));
        // interior stays background colored with the default transparent fill
        assert_eq!(raster.pixel(7, 5), Some(WHITE));
    }

    #[test]
    fn pixel_layer_paints_beneath_shapes() {
        let mut scene = Scene::new();
        let mut pixels = empty_pixels();
        pixels.set_pixel(1, 1, RED).unwrap();
        pixels.set_pixel(6, 6, RED).unwrap();

        let mut covered = Shape::rect(0, 0, 4, 4);
        covered.set_fill(BLACK);
        scene.add(covered);

        let raster = render_to_raster(&scene, &pixels, &RenderOptions::default(), 8, 8).unwrap();
        // the filled rect hides the pixel underneath it
        assert_eq!(raster.pixel(1, 1), Some(BLACK));
        // the uncovered pixel shows through
        assert_eq!(raster.pixel(6, 6), Some(RED));
    }

    #[test]
    fn rotation_does_not_leak_to_next_shape() {
        let mut scene = Scene::new();
        let mut rotated = Shape::rect(30, 30, 4, 4);
        rotated.set_rotation(45.0);
        scene.add(rotated);
        let mut straight = Shape::rect(2, 2, 6, 6);
        straight.set_stroke_width(2.0);
        scene.add(straight);

        let raster =
            render_to_raster(&scene, &empty_pixels(), &RenderOptions::default(), 40, 40).unwrap();
        // the second rect must stay axis-aligned at its own corner
        assert_eq!(raster.pixel(2, 2), Some(BLACK));
        assert_eq!(raster.pixel(8, 2), Some(BLACK));
    }

    #[test]
    fn degenerate_shapes_render_without_error() {
        let mut scene = Scene::new();
        scene.add(Shape::rect(5, 5, 0, 0));
        scene.add(Shape::oval(5, 5, 0, 10));
        scene.add(Shape::line(3, 3, 3, 3));
        scene.add(Shape::polygon(vec![]));
        scene.add(Shape::polygon(vec![(4, 4)]));
        scene.add(Shape::text("", 2, 8));

        let raster =
            render_to_raster(&scene, &empty_pixels(), &RenderOptions::default(), 16, 16).unwrap();
        assert_eq!((raster.width(), raster.height()), (16, 16));
    }
}
