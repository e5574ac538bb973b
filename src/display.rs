//! Display surface capability consumed by the canvas worker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::draw::Raster;

/// Destination for composed frames.
///
/// The canvas worker owns exactly one display surface and is the only
/// caller of these methods, so implementations never see concurrent calls.
/// Real windowing stays outside this crate; [`HeadlessSurface`] is the
/// built-in implementation for tests, demos, and batch export runs.
pub trait DisplaySurface: Send {
    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Shows a finished frame.
    fn present(&mut self, frame: &Raster);
}

/// Fixed-size surface that keeps the last presented frame in memory.
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    last_frame: Arc<Mutex<Option<Raster>>>,
    presents: Arc<AtomicU64>,
}

impl HeadlessSurface {
    /// Creates a surface with the given fixed dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            last_frame: Arc::new(Mutex::new(None)),
            presents: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a handle for observing presented frames from other threads.
    ///
    /// Take the handle before handing the surface to a canvas; the surface
    /// itself moves into the worker thread.
    pub fn handle(&self) -> FrameHandle {
        FrameHandle {
            last_frame: Arc::clone(&self.last_frame),
            presents: Arc::clone(&self.presents),
        }
    }
}

impl DisplaySurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Raster) {
        let mut slot = self
            .last_frame
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(frame.clone());
        self.presents.fetch_add(1, Ordering::Release);
    }
}

/// Observer side of a [`HeadlessSurface`].
#[derive(Clone)]
pub struct FrameHandle {
    last_frame: Arc<Mutex<Option<Raster>>>,
    presents: Arc<AtomicU64>,
}

impl FrameHandle {
    /// The most recently presented frame, if any.
    pub fn last_frame(&self) -> Option<Raster> {
        self.last_frame
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many frames have been presented so far.
    pub fn present_count(&self) -> u64 {
        self.presents.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{PixelBuffer, RenderOptions, Scene, render_to_raster};

    #[test]
    fn handle_sees_presented_frames() {
        let mut surface = HeadlessSurface::new(16, 8);
        let handle = surface.handle();
        assert_eq!(handle.present_count(), 0);
        assert!(handle.last_frame().is_none());

        let scene = Scene::new();
        let pixels = PixelBuffer::new().unwrap();
        let frame =
            render_to_raster(&scene, &pixels, &RenderOptions::default(), 16, 8).unwrap();
        surface.present(&frame);

        assert_eq!(handle.present_count(), 1);
        let seen = handle.last_frame().expect("frame stored");
        assert_eq!((seen.width(), seen.height()), (16, 8));
    }

    #[test]
    fn size_reports_construction_dimensions() {
        let surface = HeadlessSurface::new(640, 480);
        assert_eq!(surface.size(), (640, 480));
    }
}
