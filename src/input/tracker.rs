//! Lock-light record of keyboard and mouse state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use super::events::{Key, MouseButton};

/// Per-key (or per-button) state: independent atomic cells, so event
/// sources and querying program threads never coordinate.
#[derive(Debug, Default)]
struct ButtonCell {
    /// Currently held down
    down: AtomicBool,
    /// Total presses recorded since tracking began
    presses: AtomicU64,
    /// High-water mark of presses already handed out by the
    /// `..._since_last_asked` queries
    taken: AtomicU64,
    /// Elapsed millis of the latest press, stored +1 so 0 means never
    last_press_ms: AtomicU64,
}

impl ButtonCell {
    fn record_press(&self, now_ms: u64) {
        self.down.store(true, Ordering::Release);
        self.presses.fetch_add(1, Ordering::AcqRel);
        self.last_press_ms.store(now_ms + 1, Ordering::Release);
    }

    fn record_release(&self) {
        self.down.store(false, Ordering::Release);
    }

    fn is_down(&self) -> bool {
        self.down.load(Ordering::Acquire)
    }

    /// Presses not yet consumed by a previous call. `fetch_max` keeps the
    /// consumed mark monotone even when several threads ask at once.
    fn take_presses(&self) -> u64 {
        let total = self.presses.load(Ordering::Acquire);
        let already = self.taken.fetch_max(total, Ordering::AcqRel);
        total.saturating_sub(already)
    }

    fn pressed_within(&self, now_ms: u64, window: Duration) -> bool {
        let stamp = self.last_press_ms.load(Ordering::Acquire);
        if stamp == 0 {
            return false;
        }
        let elapsed = (now_ms + 1).saturating_sub(stamp);
        u128::from(elapsed) <= window.as_millis()
    }
}

/// Concurrent record of input state.
///
/// Event sources feed it through the `record_*` methods; programs query it
/// at any time. Every query is wait-free after the per-key cell exists, and
/// the canvas render path never touches it, so neither side can stall the
/// other. Timestamps are relative to tracker creation.
#[derive(Debug)]
pub struct InputTracker {
    epoch: Instant,
    keys: RwLock<HashMap<Key, Arc<ButtonCell>>>,
    buttons: RwLock<HashMap<MouseButton, Arc<ButtonCell>>>,
    mouse_x: AtomicI32,
    mouse_y: AtomicI32,
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            keys: RwLock::new(HashMap::new()),
            buttons: RwLock::new(HashMap::new()),
            mouse_x: AtomicI32::new(0),
            mouse_y: AtomicI32::new(0),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
    }

    // ------------------------------------------------------------------
    // Feed side (called by the embedding event source)
    // ------------------------------------------------------------------

    /// Records a key going down. Auto-repeat is the event source's call;
    /// every invocation counts as one press.
    pub fn record_key_press(&self, key: Key) {
        self.key_cell(key).record_press(self.now_ms());
    }

    /// Records a key being released.
    pub fn record_key_release(&self, key: Key) {
        self.key_cell(key).record_release();
    }

    /// Records a mouse button going down.
    pub fn record_button_press(&self, button: MouseButton) {
        self.button_cell(button).record_press(self.now_ms());
    }

    /// Records a mouse button being released.
    pub fn record_button_release(&self, button: MouseButton) {
        self.button_cell(button).record_release();
    }

    /// Records the pointer position. Motion and drag both land here.
    pub fn record_mouse_position(&self, x: i32, y: i32) {
        self.mouse_x.store(x, Ordering::Release);
        self.mouse_y.store(y, Ordering::Release);
    }

    // ------------------------------------------------------------------
    // Query side (called by the program)
    // ------------------------------------------------------------------

    /// True while the key is held down.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.find_key(key).is_some_and(|cell| cell.is_down())
    }

    /// True while the mouse button is held down.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.find_button(button).is_some_and(|cell| cell.is_down())
    }

    /// Number of presses since this method was last called for this key.
    pub fn key_presses_since_last_asked(&self, key: Key) -> u64 {
        self.find_key(key).map_or(0, |cell| cell.take_presses())
    }

    /// Number of presses since this method was last called for this button.
    pub fn button_presses_since_last_asked(&self, button: MouseButton) -> u64 {
        self.find_button(button).map_or(0, |cell| cell.take_presses())
    }

    /// True when the key was pressed within the trailing window.
    pub fn was_key_pressed(&self, key: Key, window: Duration) -> bool {
        self.find_key(key)
            .is_some_and(|cell| cell.pressed_within(self.now_ms(), window))
    }

    /// True when the button was pressed within the trailing window.
    pub fn was_button_pressed(&self, button: MouseButton, window: Duration) -> bool {
        self.find_button(button)
            .is_some_and(|cell| cell.pressed_within(self.now_ms(), window))
    }

    /// Last known pointer position. (0, 0) until the first motion event.
    pub fn last_mouse_position(&self) -> (i32, i32) {
        (
            self.mouse_x.load(Ordering::Acquire),
            self.mouse_y.load(Ordering::Acquire),
        )
    }

    // ------------------------------------------------------------------
    // Cell management
    // ------------------------------------------------------------------

    fn key_cell(&self, key: Key) -> Arc<ButtonCell> {
        if let Some(cell) = read_lock(&self.keys).get(&key) {
            return Arc::clone(cell);
        }
        Arc::clone(write_lock(&self.keys).entry(key).or_default())
    }

    fn button_cell(&self, button: MouseButton) -> Arc<ButtonCell> {
        if let Some(cell) = read_lock(&self.buttons).get(&button) {
            return Arc::clone(cell);
        }
        Arc::clone(write_lock(&self.buttons).entry(button).or_default())
    }

    /// Query path: never allocates a cell for keys nobody pressed.
    fn find_key(&self, key: Key) -> Option<Arc<ButtonCell>> {
        read_lock(&self.keys).get(&key).map(Arc::clone)
    }

    fn find_button(&self, button: MouseButton) -> Option<Arc<ButtonCell>> {
        read_lock(&self.buttons).get(&button).map(Arc::clone)
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn read_lock<K, V>(lock: &RwLock<HashMap<K, V>>) -> RwLockReadGuard<'_, HashMap<K, V>> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<K, V>(lock: &RwLock<HashMap<K, V>>) -> RwLockWriteGuard<'_, HashMap<K, V>> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
