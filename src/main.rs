use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::{info, warn};

use easel::config::{ColorSpec, Config};
use easel::display::HeadlessSurface;
use easel::draw::{Shape, color};
use easel::{Canvas, Color};

#[derive(Parser, Debug)]
#[command(name = "easel")]
#[command(version, about = "Drawing canvas for learning to program - renders a demo scene")]
struct Cli {
    /// Canvas width in pixels (overrides the config file)
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Canvas height in pixels (overrides the config file)
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Background color (red, green, blue, yellow, orange, pink, white, black)
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Smooth shape edges instead of hard pixel edges
    #[arg(long, action = ArgAction::SetTrue)]
    antialias: bool,

    /// Output image path; the extension picks the format (png, jpg, jpeg,
    /// bmp, gif). Defaults to a timestamped file in the export directory
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::default()
    });
    if let Some(width) = cli.width {
        config.canvas.width = width;
    }
    if let Some(height) = cli.height {
        config.canvas.height = height;
    }
    if let Some(name) = &cli.background {
        config.canvas.background = ColorSpec::Name(name.clone());
    }
    if cli.antialias {
        config.canvas.antialiasing = true;
    }

    let (width, height) = config.display_size();
    let surface = HeadlessSurface::new(width, height);
    let canvas = Canvas::with_options(Box::new(surface), config.canvas_options())?;
    info!("Canvas ready at {width}x{height}");

    draw_demo_scene(
        &canvas,
        width as i32,
        height as i32,
        config.text.default_font_size,
    );
    info!("Demo scene contains {} shapes", canvas.shape_count()?);

    let output = cli
        .output
        .unwrap_or_else(|| config.export_target().resolve_path());
    let saved = canvas
        .save_to_image(&output)
        .context("Failed to export the demo scene")?;
    info!("Demo scene saved to {}", saved.display());
    println!("{}", saved.display());

    Ok(())
}

/// Draws a scene touching every part of the canvas: raw pixels, each shape
/// kind, styling edits, rotation, and hand-driven frame updates.
fn draw_demo_scene(canvas: &Canvas, width: i32, height: i32, caption_size: f64) {
    // Red gradient band along the top, written pixel by pixel
    let band_w = width.min(256);
    let band_h = height.min(48);
    canvas.ensure_pixel_capacity(band_w - 1, band_h - 1);
    for y in 0..band_h {
        for x in 0..band_w {
            let ramp = (255 * (x + y) / (band_w + band_h - 2).max(1)).min(255) as u8;
            canvas.set_pixel(x, y, Color::from_rgb8(ramp, 0, 0));
        }
    }

    let title = canvas.add(Shape::text(
        format!("easel {}", env!("CARGO_PKG_VERSION")),
        16,
        band_h + 36,
    ));
    canvas.set_font_size(title, 28.0);

    // A row of translucent squares plus one tilted on its center
    let fills = [color::RED, color::ORANGE, color::YELLOW, color::GREEN, color::BLUE];
    for (i, fill) in fills.iter().enumerate() {
        let square = canvas.add(Shape::rect(16 + (i as i32) * 56, band_h + 56, 48, 48));
        canvas.set_fill(square, fill.with_alpha(0.85));
    }
    let tilted = canvas.add(Shape::rect(16 + 5 * 56, band_h + 56, 48, 48));
    canvas.set_fill(tilted, color::PINK);
    canvas.set_rotation(tilted, 45.0);

    // Sine wave traced with short line segments
    let mid = height / 2;
    let mut prev = (0, mid);
    for x in (8..width).step_by(8) {
        let phase = f64::from(x) / f64::from(width.max(1)) * std::f64::consts::TAU;
        let y = mid + (phase.sin() * 40.0) as i32;
        let segment = canvas.add(Shape::line(prev.0, prev.1, x, y));
        canvas.set_stroke(segment, color::BLUE);
        canvas.set_stroke_width(segment, 2.0);
        prev = (x, y);
    }

    let diamond = canvas.add(Shape::polygon(vec![
        (width - 120, mid),
        (width - 80, mid - 40),
        (width - 40, mid),
        (width - 80, mid + 40),
    ]));
    canvas.set_fill(diamond, color::GREEN.with_alpha(0.6));
    canvas.set_stroke_width(diamond, 2.0);

    // Roll a ball across the bottom, presenting each step by hand
    canvas.set_autoupdate(false);
    let ball = canvas.add(Shape::oval(8, height - 72, 32, 32));
    canvas.set_fill(ball, color::ORANGE);
    for step in 0..24 {
        let x = 8 + step * (width - 48).max(0) / 24;
        let lift = (f64::from(step) / 24.0 * std::f64::consts::PI).sin() * 30.0;
        canvas.move_shape(ball, x, height - 72 - lift as i32);
        canvas.update();
        std::thread::sleep(Duration::from_millis(5));
    }
    canvas.set_autoupdate(true);

    let caption = canvas.add(Shape::text(
        "shapes, pixels, and one worker thread",
        16,
        height - 16,
    ));
    canvas.set_font_size(caption, caption_size);
}
