//! Input state tracking.
//!
//! This module records keyboard and mouse events delivered by the embedding
//! event source and answers the queries programs build interaction on:
//! down-state, press counts since last asked, trailing-window press checks,
//! and the last pointer position. It never blocks the canvas worker.

pub mod events;
pub mod tracker;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use tracker::InputTracker;
