//! The canvas: a worker thread owning all drawing state, driven through a
//! cloneable command queue.
//!
//! Programs talk to a [`Canvas`] handle. Mutations are fire-and-forget:
//! they enqueue a command and return immediately, which keeps beginner
//! call sites (`canvas.set_fill(id, RED)`) free of error plumbing. Reads
//! and barriers block until the worker answers, so by the time they return
//! every previously issued mutation has been applied.

mod command;
mod worker;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

pub use command::ShapeEdit;

use crate::display::{DisplaySurface, FrameHandle, HeadlessSurface};
use crate::draw::{
    Color, FontDescriptor, Raster, RenderError, RenderOptions, Shape, ShapeId,
};
use crate::export::ExportError;
use crate::input::InputTracker;

use command::Command;
use worker::Worker;

/// How long to wait for the worker thread to come up.
const WORKER_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors surfaced by canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Canvas worker failed to start: {0}")]
    StartupError(String),

    #[error("Canvas worker is no longer running")]
    Disposed,

    #[error("Rendering failed: {0}")]
    RenderError(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportError(#[from] ExportError),

    /// Returned by the global facade when it is used before `init`.
    #[error("Canvas has not been initialized")]
    NotInitialized,
}

/// Construction-time settings for a canvas.
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    /// Canvas-wide rendering settings (background, antialiasing, font)
    pub render: RenderOptions,
    /// Present a frame after every mutation burst (on by default)
    pub autoupdate: bool,
    /// Fixed export size; `None` exports at the display size
    pub export_size: Option<(u32, u32)>,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            autoupdate: true,
            export_size: None,
        }
    }
}

/// Handle to a drawing surface owned by a dedicated worker thread.
///
/// All drawing state (shape registry, pixel layer, cairo surfaces) lives on
/// the worker; this handle is just a command queue plus the id counter, so
/// it is freely shared across threads. Dropping the last handle shuts the
/// worker down.
pub struct Canvas {
    sender: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Next shape id to hand out; assigned here so `add` never blocks
    next_id: AtomicU64,
    input: Arc<InputTracker>,
}

impl Canvas {
    /// Starts a canvas over the given display surface with default options.
    pub fn new(surface: Box<dyn DisplaySurface>) -> Result<Self, CanvasError> {
        Self::with_options(surface, CanvasOptions::default())
    }

    /// Starts a canvas over the given display surface.
    ///
    /// Spawns the worker thread and waits for it to finish creating its
    /// drawing state before returning, so a broken graphics stack shows up
    /// here and not as silently dropped commands later.
    pub fn with_options(
        surface: Box<dyn DisplaySurface>,
        options: CanvasOptions,
    ) -> Result<Self, CanvasError> {
        let (sender, receiver) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let CanvasOptions {
            render,
            autoupdate,
            export_size,
        } = options;

        let handle = thread::spawn(move || {
            match Worker::new(surface, render, autoupdate, export_size) {
                Ok(worker) => {
                    if ready_tx.send(Ok(())).is_err() {
                        return;
                    }
                    worker.run(receiver);
                }
                Err(err) => {
                    ready_tx.send(Err(err.to_string())).ok();
                }
            }
        });

        match ready_rx.recv_timeout(WORKER_START_TIMEOUT) {
            Ok(Ok(())) => {}
            Ok(Err(message)) => {
                handle.join().ok();
                return Err(CanvasError::StartupError(message));
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(CanvasError::StartupError(
                    "worker did not report readiness in time".to_string(),
                ));
            }
            Err(RecvTimeoutError::Disconnected) => {
                handle.join().ok();
                return Err(CanvasError::StartupError(
                    "worker exited before reporting readiness".to_string(),
                ));
            }
        }

        Ok(Self {
            sender,
            worker: Mutex::new(Some(handle)),
            next_id: AtomicU64::new(1),
            input: Arc::new(InputTracker::new()),
        })
    }

    /// Starts a canvas over an in-memory surface of the given size.
    ///
    /// Returns the handle for reading presented frames alongside the
    /// canvas. Useful for exports, tests, and any program that never puts
    /// a window on screen.
    pub fn headless(width: u32, height: u32) -> Result<(Self, FrameHandle), CanvasError> {
        let surface = HeadlessSurface::new(width, height);
        let frames = surface.handle();
        Ok((Self::new(Box::new(surface))?, frames))
    }

    // ---- shape registry ----

    /// Adds a shape on top of everything drawn so far and returns its id.
    ///
    /// The id is assigned immediately; the insertion happens on the worker.
    /// Ids start at 1 and strictly increase, so 0 never names a shape.
    pub fn add(&self, shape: Shape) -> ShapeId {
        let id = ShapeId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.send(Command::Add { id, shape });
        id
    }

    /// Applies one edit to the shape with the given id.
    ///
    /// Edits to ids that are not on the canvas (typically: already removed)
    /// are logged and ignored.
    pub fn edit(&self, id: ShapeId, edit: ShapeEdit) {
        self.send(Command::Edit { id, edit });
    }

    /// Replaces the interior color of a shape.
    pub fn set_fill(&self, id: ShapeId, color: Color) {
        self.edit(id, ShapeEdit::Fill(color));
    }

    /// Replaces the outline color of a shape.
    pub fn set_stroke(&self, id: ShapeId, color: Color) {
        self.edit(id, ShapeEdit::Stroke(color));
    }

    /// Replaces the outline thickness of a shape, in pixels.
    pub fn set_stroke_width(&self, id: ShapeId, width: f64) {
        self.edit(id, ShapeEdit::StrokeWidth(width));
    }

    /// Replaces the rotation of a shape, in degrees around its pivot.
    pub fn set_rotation(&self, id: ShapeId, degrees: f64) {
        self.edit(id, ShapeEdit::Rotation(degrees));
    }

    /// Moves a shape. Boxes and text move their anchor point; lines and
    /// polygons translate rigidly so their geometry is preserved.
    pub fn move_shape(&self, id: ShapeId, x: i32, y: i32) {
        self.edit(id, ShapeEdit::MoveTo { x, y });
    }

    /// Replaces the font size of a text shape. Ignored for other kinds.
    pub fn set_font_size(&self, id: ShapeId, points: f64) {
        self.edit(id, ShapeEdit::FontSize(points));
    }

    /// Replaces the content of a text shape. Ignored for other kinds.
    pub fn set_text(&self, id: ShapeId, content: impl Into<String>) {
        self.edit(id, ShapeEdit::Text(content.into()));
    }

    /// Removes a shape. Removing an id that is not on the canvas is a no-op.
    pub fn remove(&self, id: ShapeId) {
        self.send(Command::Remove(id));
    }

    /// Removes every shape. Ids keep counting and the pixel layer stays.
    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    /// Returns the canvas to its just-created state: no shapes, no pixels,
    /// and ids restarting at 1.
    ///
    /// Only sensible from the thread that adds shapes; an `add` racing a
    /// reset may draw an id the reset then reissues.
    pub fn reset(&self) {
        self.next_id.store(1, Ordering::Relaxed);
        self.send(Command::Reset);
    }

    // ---- pixel layer ----

    /// Sets one pixel in the layer beneath all shapes.
    ///
    /// Negative coordinates are ignored; any non-negative coordinate is
    /// valid and grows the layer as needed.
    pub fn set_pixel(&self, x: i32, y: i32, color: Color) {
        self.send(Command::SetPixel { x, y, color });
    }

    /// Pre-grows the pixel layer so writes up to (max_x, max_y) need no
    /// further growth. Purely an optimization for pixel-heavy programs.
    pub fn ensure_pixel_capacity(&self, max_x: i32, max_y: i32) {
        self.send(Command::EnsurePixelCapacity { max_x, max_y });
    }

    // ---- frame options ----

    /// Toggles antialiasing for subsequent frames.
    pub fn set_antialias(&self, enabled: bool) {
        self.send(Command::SetAntialias(enabled));
    }

    /// Replaces the background color. Alpha is ignored; the background is
    /// always opaque.
    pub fn set_background(&self, color: Color) {
        self.send(Command::SetBackground(color));
    }

    /// Replaces the font family used by all text shapes.
    pub fn set_font(&self, font: FontDescriptor) {
        self.send(Command::SetFont(font));
    }

    /// Toggles presenting a frame after every mutation burst.
    ///
    /// With autoupdate off, the display only refreshes on [`update`] or
    /// [`flush`]. Programs animating many shapes per frame turn it off,
    /// mutate freely, then present once.
    ///
    /// [`update`]: Canvas::update
    /// [`flush`]: Canvas::flush
    pub fn set_autoupdate(&self, enabled: bool) {
        self.send(Command::SetAutoupdate(enabled));
    }

    /// Requests one presented frame, regardless of the autoupdate setting.
    /// Returns immediately; the frame appears when the queue drains.
    pub fn update(&self) {
        self.send(Command::Update);
    }

    // ---- blocking operations ----

    /// Waits until every previously issued command has been applied and a
    /// frame showing the result has been presented.
    pub fn flush(&self) -> Result<(), CanvasError> {
        self.request(Command::Flush)
    }

    /// Renders the current state offscreen at the display size.
    pub fn snapshot(&self) -> Result<Raster, CanvasError> {
        let frame = self.request(|reply| Command::Snapshot { size: None, reply })?;
        Ok(frame?)
    }

    /// Renders the current state offscreen at an explicit size.
    pub fn snapshot_sized(&self, width: u32, height: u32) -> Result<Raster, CanvasError> {
        let frame = self.request(|reply| Command::Snapshot {
            size: Some((width, height)),
            reply,
        })?;
        Ok(frame?)
    }

    /// Renders the current state and writes it to `path`.
    ///
    /// The encoding is chosen by the file extension (png, jpg, jpeg, bmp,
    /// gif; anything else encodes as png). Returns the path written.
    pub fn save_to_image(&self, path: impl AsRef<Path>) -> Result<PathBuf, CanvasError> {
        let path = path.as_ref().to_path_buf();
        self.request(move |reply| Command::Export {
            path,
            size: None,
            reply,
        })?
    }

    /// Renders at an explicit size and writes it to `path`.
    pub fn save_to_image_sized(
        &self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<PathBuf, CanvasError> {
        let path = path.as_ref().to_path_buf();
        self.request(move |reply| Command::Export {
            path,
            size: Some((width, height)),
            reply,
        })?
    }

    /// Current display surface dimensions.
    pub fn size(&self) -> Result<(u32, u32), CanvasError> {
        self.request(Command::QuerySize)
    }

    /// Copy of the shape with the given id, if it is on the canvas.
    pub fn shape(&self, id: ShapeId) -> Result<Option<Shape>, CanvasError> {
        self.request(|reply| Command::QueryShape { id, reply })
    }

    /// Number of shapes currently on the canvas.
    pub fn shape_count(&self) -> Result<usize, CanvasError> {
        self.request(Command::QueryShapeCount)
    }

    // ---- input ----

    /// The input tracker queried by `is_key_down` style calls.
    ///
    /// The embedder feeds events into the same tracker; see
    /// [`input_handle`] for a clonable reference to move into an event
    /// loop.
    ///
    /// [`input_handle`]: Canvas::input_handle
    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    /// Shared reference to the input tracker, for the thread delivering
    /// keyboard and mouse events.
    pub fn input_handle(&self) -> Arc<InputTracker> {
        Arc::clone(&self.input)
    }

    // ---- lifecycle ----

    /// Shuts the worker down and waits for it to exit.
    ///
    /// Further blocking operations return [`CanvasError::Disposed`];
    /// further mutations are dropped with a warning. Disposing twice is
    /// harmless.
    pub fn dispose(&self) {
        let handle = lock_worker(&self.worker).take();
        match handle {
            Some(handle) => {
                self.sender.send(Command::Shutdown).ok();
                match handle.join() {
                    Ok(()) => debug!("Canvas worker shut down"),
                    Err(err) => warn!("Canvas worker panicked: {err:?}"),
                }
            }
            None => debug!("Canvas already disposed"),
        }
    }

    fn send(&self, command: Command) {
        if self.sender.send(command).is_err() {
            warn!("Canvas worker is gone; dropping command");
        }
    }

    /// Sends a command carrying a reply channel and waits for the answer.
    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> Command) -> Result<T, CanvasError> {
        let (reply, response) = mpsc::channel();
        self.sender
            .send(build(reply))
            .map_err(|_| CanvasError::Disposed)?;
        response.recv().map_err(|_| CanvasError::Disposed)
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn lock_worker(worker: &Mutex<Option<JoinHandle<()>>>) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    worker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
