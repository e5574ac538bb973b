//! The canvas worker thread: applies queued commands, coalesces frames.

use std::sync::mpsc::{Receiver, TryRecvError};

use log::{debug, error, warn};

use crate::display::DisplaySurface;
use crate::draw::{PixelBuffer, Raster, RenderError, RenderOptions, Scene, render_to_raster};
use crate::export;

use super::command::Command;
use super::CanvasError;

/// Whether the worker loop keeps going after a command.
enum Flow {
    Continue,
    Stop,
}

/// State owned exclusively by the worker thread.
///
/// Everything cairo-backed lives here and is created on the worker thread,
/// so no surface or context ever crosses a thread boundary. The handle side
/// only ever sends plain data through the channel.
pub(crate) struct Worker {
    scene: Scene,
    pixels: PixelBuffer,
    options: RenderOptions,
    surface: Box<dyn DisplaySurface>,
    /// Fixed export size from configuration; `None` follows the display
    export_size: Option<(u32, u32)>,
    /// Present after every mutation burst when set
    autoupdate: bool,
    /// A mutation arrived since the last presented frame
    needs_redraw: bool,
    /// An explicit update was requested, presents even with autoupdate off
    present_requested: bool,
}

impl Worker {
    pub(crate) fn new(
        surface: Box<dyn DisplaySurface>,
        options: RenderOptions,
        autoupdate: bool,
        export_size: Option<(u32, u32)>,
    ) -> Result<Self, cairo::Error> {
        Ok(Self {
            scene: Scene::new(),
            pixels: PixelBuffer::new()?,
            options,
            surface,
            export_size,
            autoupdate,
            // Present the bare background once at startup
            needs_redraw: true,
            present_requested: false,
        })
    }

    /// Runs until shutdown or until every sender is gone.
    ///
    /// The queue is drained without presenting; only when it runs empty is
    /// one frame rendered for the whole burst. A program that mutates a
    /// thousand shapes in a tight loop gets a handful of frames, not a
    /// thousand, while still observing every mutation in the final image.
    pub(crate) fn run(mut self, receiver: Receiver<Command>) {
        let (width, height) = self.surface.size();
        debug!("Canvas worker started at {width}x{height}");
        loop {
            match receiver.try_recv() {
                Ok(command) => {
                    if let Flow::Stop = self.apply(command) {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => {
                    self.present_if_needed();
                    match receiver.recv() {
                        Ok(command) => {
                            if let Flow::Stop = self.apply(command) {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }
        debug!("Canvas worker stopped");
    }

    fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Add { id, shape } => {
                self.scene.insert(id, shape);
                self.needs_redraw = true;
            }
            Command::Edit { id, edit } => {
                match self.scene.edit(id, |shape| edit.apply(shape)) {
                    Ok(()) => self.needs_redraw = true,
                    Err(err) => warn!("Ignoring edit: {err}"),
                }
            }
            Command::Remove(id) => {
                self.scene.remove(id);
                self.needs_redraw = true;
            }
            Command::Clear => {
                self.scene.clear();
                self.needs_redraw = true;
            }
            Command::Reset => {
                self.scene.reset();
                if let Err(err) = self.pixels.reset() {
                    warn!("Failed to reset pixel layer: {err}");
                }
                self.needs_redraw = true;
            }
            Command::SetPixel { x, y, color } => {
                if let Err(err) = self.pixels.set_pixel(x, y, color) {
                    warn!("Failed to write pixel ({x}, {y}): {err}");
                }
                self.needs_redraw = true;
            }
            Command::EnsurePixelCapacity { max_x, max_y } => {
                if let Err(err) = self.pixels.ensure_capacity(max_x, max_y) {
                    warn!("Failed to grow pixel layer to ({max_x}, {max_y}): {err}");
                }
            }
            Command::SetAntialias(enabled) => {
                self.options.antialias = enabled;
                self.needs_redraw = true;
            }
            Command::SetBackground(color) => {
                self.options.background = color;
                self.needs_redraw = true;
            }
            Command::SetFont(font) => {
                self.options.font = font;
                self.needs_redraw = true;
            }
            Command::SetAutoupdate(enabled) => {
                self.autoupdate = enabled;
            }
            Command::Update => {
                self.present_requested = true;
            }
            Command::Flush(reply) => {
                self.present_now();
                reply.send(()).ok();
            }
            Command::Snapshot { size, reply } => {
                let (width, height) = size.unwrap_or_else(|| self.surface.size());
                reply.send(self.render_frame(width, height)).ok();
            }
            Command::Export { path, size, reply } => {
                let (width, height) = size
                    .or(self.export_size)
                    .unwrap_or_else(|| self.surface.size());
                let result = self
                    .render_frame(width, height)
                    .map_err(CanvasError::from)
                    .and_then(|frame| {
                        export::save_raster(&frame, &path).map_err(CanvasError::from)
                    });
                reply.send(result).ok();
            }
            Command::QuerySize(reply) => {
                reply.send(self.surface.size()).ok();
            }
            Command::QueryShape { id, reply } => {
                reply.send(self.scene.get(id).cloned()).ok();
            }
            Command::QueryShapeCount(reply) => {
                reply.send(self.scene.len()).ok();
            }
            Command::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    /// Presents the coalesced frame at queue idle, if anything calls for it.
    fn present_if_needed(&mut self) {
        if self.present_requested || (self.autoupdate && self.needs_redraw) {
            self.present_now();
        }
    }

    fn present_now(&mut self) {
        let (width, height) = self.surface.size();
        match self.render_frame(width, height) {
            Ok(frame) => self.surface.present(&frame),
            Err(err) => error!("Dropping frame: {err}"),
        }
        self.needs_redraw = false;
        self.present_requested = false;
    }

    fn render_frame(&self, width: u32, height: u32) -> Result<Raster, RenderError> {
        render_to_raster(&self.scene, &self.pixels, &self.options, width, height)
    }
}
