//! Growable pixel layer painted beneath all shapes.

use std::collections::HashMap;

use cairo::{Context, Format, ImageSurface, Operator};

use super::color::Color;

/// Raster layer of directly-set pixels.
///
/// Logically infinite: any non-negative coordinate may be written, and the
/// physical backing surface grows to cover it. Growth keeps every
/// previously set pixel readable at its original coordinate by replaying
/// the sparse pixel map onto the fresh surface. Untouched pixels stay
/// transparent, so the layer composites cleanly over the canvas background.
#[derive(Debug)]
pub struct PixelBuffer {
    /// Logical store; survives every regrow of the backing surface
    pixels: HashMap<(i32, i32), Color>,
    /// Committed raster the renderer blits at the origin
    surface: ImageSurface,
}

impl PixelBuffer {
    /// Creates an empty buffer with the minimal physical extent.
    pub fn new() -> Result<Self, cairo::Error> {
        let mut buffer = Self {
            pixels: HashMap::new(),
            surface: ImageSurface::create(Format::ARgb32, 0, 0)?,
        };
        buffer.ensure_capacity(1, 1)?;
        Ok(buffer)
    }

    /// Grows the backing surface so (max_x, max_y) is a valid coordinate.
    ///
    /// Returns without work only when BOTH current dimensions strictly
    /// exceed the request. Otherwise both dimensions are recomputed as
    /// `max(current, requested * 2)` and the surface is rebuilt, so a write
    /// that overflows one axis regrows the other axis through the same
    /// formula. Growing ahead of a batch of writes avoids repeated rebuilds.
    pub fn ensure_capacity(&mut self, max_x: i32, max_y: i32) -> Result<(), cairo::Error> {
        if self.surface.width() > max_x && self.surface.height() > max_y {
            return Ok(());
        }
        let width = self.surface.width().max(max_x.saturating_mul(2));
        let height = self.surface.height().max(max_y.saturating_mul(2));
        log::debug!(
            "growing pixel buffer from {}x{} to {width}x{height}",
            self.surface.width(),
            self.surface.height()
        );

        let grown = ImageSurface::create(Format::ARgb32, width, height)?;
        let ctx = pixel_context(&grown)?;
        for (&(x, y), &color) in &self.pixels {
            write_pixel(&ctx, x, y, color)?;
        }
        drop(ctx);
        self.surface = grown;
        Ok(())
    }

    /// Records a pixel color and commits it to the backing surface
    /// immediately. Negative coordinates are ignored with a warning.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), cairo::Error> {
        if x < 0 || y < 0 {
            log::warn!("ignoring pixel write at negative coordinate ({x}, {y})");
            return Ok(());
        }
        self.pixels.insert((x, y), color);
        self.ensure_capacity(x, y)?;
        let ctx = pixel_context(&self.surface)?;
        write_pixel(&ctx, x, y, color)
    }

    /// Reads back the logically stored color at (x, y), if one was set.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.pixels.get(&(x, y)).copied()
    }

    /// Physical extent of the backing surface, in pixels.
    pub fn extent(&self) -> (i32, i32) {
        (self.surface.width(), self.surface.height())
    }

    /// Number of logically set pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when no pixel has been set.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Drops every pixel and shrinks the surface back to its initial extent.
    pub fn reset(&mut self) -> Result<(), cairo::Error> {
        self.pixels.clear();
        self.surface = ImageSurface::create(Format::ARgb32, 0, 0)?;
        self.ensure_capacity(1, 1)
    }

    /// The committed raster, for compositing at the canvas origin.
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }
}

/// Context configured for exact single-pixel writes: source operator so the
/// stored alpha replaces the destination, no antialiasing so the write hits
/// exactly one cell.
fn pixel_context(surface: &ImageSurface) -> Result<Context, cairo::Error> {
    let ctx = Context::new(surface)?;
    ctx.set_operator(Operator::Source);
    ctx.set_antialias(cairo::Antialias::None);
    Ok(ctx)
}

fn write_pixel(ctx: &Context, x: i32, y: i32, color: Color) -> Result<(), cairo::Error> {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.rectangle(f64::from(x), f64::from(y), 1.0, 1.0);
    ctx.fill()
}
