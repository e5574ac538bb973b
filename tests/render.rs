//! Raster-level tests for the compositing pipeline.
//!
//! These render full frames and compare bytes, either against a reference
//! frame drawn with raw cairo calls or between two pipeline renders that
//! must agree. Antialiasing stays off throughout so every comparison is
//! exact.

use easel::draw::{
    PixelBuffer, Raster, RenderOptions, Scene, Shape, color, render_to_raster,
};

fn render(scene: &Scene, pixels: &PixelBuffer, width: u32, height: u32) -> Raster {
    render_to_raster(scene, pixels, &RenderOptions::default(), width, height)
        .expect("offscreen render")
}

/// Draws a reference frame with plain cairo calls, bypassing the pipeline.
fn reference(width: i32, height: i32, draw: impl FnOnce(&cairo::Context)) -> Raster {
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
        .expect("reference surface");
    {
        let ctx = cairo::Context::new(&surface).expect("reference context");
        ctx.set_antialias(cairo::Antialias::None);
        draw(&ctx);
    }
    Raster::from_surface(&mut surface).expect("reference readback")
}

fn fill_rect(ctx: &cairo::Context, c: easel::Color, x: f64, y: f64, w: f64, h: f64) {
    ctx.set_source_rgba(c.r, c.g, c.b, c.a);
    ctx.rectangle(x, y, w, h);
    ctx.fill().expect("reference fill");
}

#[test]
fn frame_matches_hand_drawn_reference() {
    // Background, then pixel layer, then shapes, all with hard edges.
    let mut pixels = PixelBuffer::new().expect("pixel buffer");
    pixels.set_pixel(1, 1, color::RED).expect("pixel write");
    pixels.set_pixel(3, 2, color::BLUE).expect("pixel write");

    let mut scene = Scene::new();
    let mut rect = Shape::rect(5, 5, 6, 4);
    rect.set_fill(color::GREEN);
    rect.set_stroke_width(0.0);
    scene.add(rect);

    let frame = render(&scene, &pixels, 16, 12);

    let expected = reference(16, 12, |ctx| {
        fill_rect(ctx, color::WHITE, 0.0, 0.0, 16.0, 12.0);
        fill_rect(ctx, color::RED, 1.0, 1.0, 1.0, 1.0);
        fill_rect(ctx, color::BLUE, 3.0, 2.0, 1.0, 1.0);
        fill_rect(ctx, color::GREEN, 5.0, 5.0, 6.0, 4.0);
    });

    assert_eq!((frame.width(), frame.height()), (16, 12));
    assert!(
        frame.data() == expected.data(),
        "pipeline frame diverges from the hand-drawn reference"
    );
}

#[test]
fn default_rectangle_matches_reference() {
    // A freshly added rectangle: invisible fill, opaque black width-1
    // stroke. The reference strokes the same path directly.
    let pixels = PixelBuffer::new().expect("pixel buffer");
    let mut scene = Scene::new();
    scene.add(Shape::rect(10, 10, 100, 100));

    let frame = render(&scene, &pixels, 128, 128);

    let expected = reference(128, 128, |ctx| {
        fill_rect(ctx, color::WHITE, 0.0, 0.0, 128.0, 128.0);
        ctx.set_line_width(1.0);
        ctx.set_line_cap(cairo::LineCap::Square);
        ctx.set_line_join(cairo::LineJoin::Miter);
        ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
        ctx.rectangle(10.0, 10.0, 100.0, 100.0);
        ctx.stroke().expect("reference stroke");
    });

    assert!(
        frame.data() == expected.data(),
        "default-styled rectangle diverges from the reference"
    );
    // the width-1 band straddles the 9.5..10.5 column, so the ink lands
    // in one of the two adjacent pixels; the interior stays background
    assert!(
        frame.pixel(9, 60) == Some(color::BLACK) || frame.pixel(10, 60) == Some(color::BLACK),
        "left edge stroke missing"
    );
    assert_eq!(frame.pixel(60, 60), Some(color::WHITE));
}

#[test]
fn quarter_turn_equals_axis_aligned_rect() {
    // rect(4, 6, 8, 4) and rect(6, 4, 4, 8) share the pivot (8, 8), so a
    // quarter turn of one covers exactly the other.
    let pixels = PixelBuffer::new().expect("pixel buffer");

    let mut rotated_scene = Scene::new();
    let mut rotated = Shape::rect(4, 6, 8, 4);
    rotated.set_fill(color::RED);
    rotated.set_stroke_width(0.0);
    rotated.set_rotation(90.0);
    rotated_scene.add(rotated);

    let mut straight_scene = Scene::new();
    let mut straight = Shape::rect(6, 4, 4, 8);
    straight.set_fill(color::RED);
    straight.set_stroke_width(0.0);
    straight_scene.add(straight);

    let turned = render(&rotated_scene, &pixels, 16, 16);
    let upright = render(&straight_scene, &pixels, 16, 16);
    assert!(
        turned.data() == upright.data(),
        "rotated rect does not land on the axis-aligned equivalent"
    );
}

#[test]
fn transparent_stroke_equals_zero_width_stroke() {
    // Two ways to ask for "no outline" must paint identical frames.
    let pixels = PixelBuffer::new().expect("pixel buffer");

    let mut invisible_scene = Scene::new();
    let mut invisible = Shape::rect(3, 3, 9, 5);
    invisible.set_fill(color::RED);
    invisible.set_stroke(color::BLACK.with_alpha(0.0));
    invisible.set_stroke_width(3.0);
    invisible_scene.add(invisible);

    let mut zero_scene = Scene::new();
    let mut zero = Shape::rect(3, 3, 9, 5);
    zero.set_fill(color::RED);
    zero.set_stroke_width(0.0);
    zero_scene.add(zero);

    let with_invisible = render(&invisible_scene, &pixels, 16, 12);
    let with_zero = render(&zero_scene, &pixels, 16, 12);
    assert!(
        with_invisible.data() == with_zero.data(),
        "alpha-zero stroke left ink behind"
    );
}

#[test]
fn later_shapes_paint_over_earlier_ones() {
    let pixels = PixelBuffer::new().expect("pixel buffer");
    let mut scene = Scene::new();

    let mut below = Shape::rect(0, 0, 8, 8);
    below.set_fill(color::RED);
    below.set_stroke_width(0.0);
    scene.add(below);

    let mut above = Shape::rect(4, 0, 8, 8);
    above.set_fill(color::BLUE);
    above.set_stroke_width(0.0);
    scene.add(above);

    let frame = render(&scene, &pixels, 16, 8);
    assert_eq!(frame.pixel(2, 4), Some(color::RED));
    // the overlap belongs to the shape added last
    assert_eq!(frame.pixel(6, 4), Some(color::BLUE));
    assert_eq!(frame.pixel(10, 4), Some(color::BLUE));
}

#[test]
fn oversized_frame_extends_the_background() {
    let pixels = PixelBuffer::new().expect("pixel buffer");
    let mut scene = Scene::new();
    let mut rect = Shape::rect(2, 2, 8, 8);
    rect.set_stroke_width(2.0);
    scene.add(rect);

    let opts = RenderOptions {
        background: color::YELLOW,
        ..RenderOptions::default()
    };
    let frame = render_to_raster(&scene, &pixels, &opts, 64, 48).expect("offscreen render");

    assert_eq!((frame.width(), frame.height()), (64, 48));
    assert_eq!(frame.pixel(2, 2), Some(color::BLACK));
    // everything past the content is plain background
    assert_eq!(frame.pixel(40, 30), Some(color::YELLOW));
    assert_eq!(frame.pixel(63, 47), Some(color::YELLOW));
}
