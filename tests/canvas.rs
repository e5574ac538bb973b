//! End-to-end tests driving the canvas through its public handle, the way
//! a program (or several program threads) would.

use std::collections::HashSet;
use std::thread;

use tempfile::TempDir;

use easel::canvas::{Canvas, CanvasOptions};
use easel::display::HeadlessSurface;
use easel::draw::color;
use easel::input::{Key, MouseButton};
use easel::{Shape, ShapeId};

#[test]
fn concurrent_adds_assign_unique_ids() {
    let (canvas, _frames) = Canvas::headless(64, 64).expect("canvas");

    let mut ids: Vec<ShapeId> = Vec::new();
    thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..50)
                        .map(|i| canvas.add(Shape::rect(i, i, 4, 4)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for worker in workers {
            ids.extend(worker.join().expect("adder thread"));
        }
    });
    canvas.flush().expect("flush");

    let unique: HashSet<ShapeId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 200, "every add must get its own id");
    assert_eq!(canvas.shape_count().expect("count"), 200);
    assert!(ids.iter().all(|id| id.raw() >= 1));
}

#[test]
fn pixels_survive_layer_growth_through_to_the_file() {
    let (canvas, _frames) = Canvas::headless(400, 300).expect("canvas");
    canvas.set_pixel(0, 0, color::RED);
    // far outside the initial layer extent, forcing several regrowths
    canvas.set_pixel(300, 200, color::RED);

    let dir = TempDir::new().expect("temp dir");
    let path = canvas
        .save_to_image(dir.path().join("pixels.png"))
        .expect("export");

    let decoded = image::open(&path).expect("decode").to_rgb8();
    assert_eq!(decoded.dimensions(), (400, 300));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(decoded.get_pixel(300, 200).0, [255, 0, 0]);
    assert_eq!(decoded.get_pixel(10, 10).0, [255, 255, 255]);
}

#[test]
fn sized_export_ignores_the_display_dimensions() {
    let (canvas, _frames) = Canvas::headless(64, 48).expect("canvas");
    let id = canvas.add(Shape::rect(0, 0, 200, 200));
    canvas.set_fill(id, color::BLUE);
    canvas.set_stroke_width(id, 0.0);

    let dir = TempDir::new().expect("temp dir");
    let path = canvas
        .save_to_image_sized(dir.path().join("small.png"), 20, 10)
        .expect("export");

    let decoded = image::open(&path).expect("decode").to_rgb8();
    assert_eq!(decoded.dimensions(), (20, 10));
    assert_eq!(decoded.get_pixel(10, 5).0, [0, 0, 255]);
}

#[test]
fn reset_blanks_the_frame_and_restarts_ids() {
    let (canvas, _frames) = Canvas::headless(32, 32).expect("canvas");
    let old = canvas.add(Shape::rect(0, 0, 32, 32));
    canvas.set_fill(old, color::RED);
    canvas.set_pixel(5, 5, color::BLUE);
    canvas.flush().expect("flush");

    canvas.reset();
    let fresh = canvas.add(Shape::line(0, 0, 1, 1));
    assert_eq!(fresh.raw(), 1);

    assert!(canvas.shape(old).expect("query").is_none());
    assert_eq!(canvas.shape_count().expect("count"), 1);

    let frame = canvas.snapshot().expect("snapshot");
    // both the red fill and the blue pixel are gone
    assert_eq!(frame.pixel(16, 16), Some(color::WHITE));
    assert_eq!(frame.pixel(5, 5), Some(color::WHITE));
}

#[test]
fn autoupdate_off_presents_only_on_demand() {
    let surface = HeadlessSurface::new(32, 32);
    let frames = surface.handle();
    let options = CanvasOptions {
        autoupdate: false,
        ..CanvasOptions::default()
    };
    let canvas = Canvas::with_options(Box::new(surface), options).expect("canvas");

    let id = canvas.add(Shape::rect(4, 4, 8, 8));
    canvas.set_fill(id, color::GREEN);
    // snapshot renders offscreen and must not touch the display
    let _ = canvas.snapshot().expect("snapshot");
    assert_eq!(frames.present_count(), 0);

    canvas.flush().expect("flush");
    assert_eq!(frames.present_count(), 1);
    let shown = frames.last_frame().expect("presented frame");
    assert_eq!(shown.pixel(8, 8), Some(color::GREEN));

    // update forces a frame even with autoupdate off; the trailing flush
    // may or may not fold into it, so only a lower bound is stable
    canvas.update();
    canvas.flush().expect("flush");
    assert!(frames.present_count() >= 2);
}

#[test]
fn autoupdate_on_presents_after_mutations() {
    let (canvas, frames) = Canvas::headless(32, 32).expect("canvas");
    canvas.add(Shape::oval(0, 0, 16, 16));
    canvas.flush().expect("flush");
    assert!(frames.present_count() >= 1);
    assert!(frames.last_frame().is_some());
}

#[test]
fn input_events_cross_threads() {
    let (canvas, _frames) = Canvas::headless(32, 32).expect("canvas");
    let feed = canvas.input_handle();

    thread::spawn(move || {
        feed.record_key_press(Key::Char('w'));
        feed.record_button_press(MouseButton::Left);
        feed.record_mouse_position(5, 9);
    })
    .join()
    .expect("event thread");

    let input = canvas.input();
    assert!(input.is_key_down(Key::Char('w')));
    assert!(input.is_button_down(MouseButton::Left));
    assert_eq!(input.last_mouse_position(), (5, 9));
    assert_eq!(input.key_presses_since_last_asked(Key::Char('w')), 1);
    assert_eq!(input.key_presses_since_last_asked(Key::Char('w')), 0);
}
