//! ISR-debounced maintenance button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up.  The GPIO fires on
//! the falling edge; the ISR accepts an edge only when the previous
//! accepted edge is at least [`DEBOUNCE_MS`] old, and latches it.  The
//! base-timer callback collects the latch once per period and turns it
//! into [`Event::MaintenanceButton`](crate::events::Event).
//!
//! Everything is atomic so both sides run without locks.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Contact bounce lockout after an accepted edge.
pub const DEBOUNCE_MS: u32 = 200;

/// Latched, debounced presses of one button.
pub struct PressLatch {
    /// Timestamp of the last accepted edge (ms since boot, truncated).
    last_accepted_ms: AtomicU32,
    /// At least one edge has been accepted.
    seen: AtomicBool,
    /// A press is waiting to be collected.
    pending: AtomicBool,
}

impl Default for PressLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl PressLatch {
    pub const fn new() -> Self {
        Self {
            last_accepted_ms: AtomicU32::new(0),
            seen: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    /// Record a falling edge.  Returns `true` when the edge counts as a
    /// new press.  ISR context only (single writer).
    pub fn on_edge(&self, now_ms: u32) -> bool {
        let last = self.last_accepted_ms.load(Ordering::Relaxed);
        if self.seen.load(Ordering::Relaxed) && now_ms.wrapping_sub(last) < DEBOUNCE_MS {
            return false;
        }
        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.seen.store(true, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Collect a latched press.  Several presses between two collections
    /// merge into one.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// The board's maintenance button.
pub static MAINTENANCE_BUTTON: PressLatch = PressLatch::new();

/// ISR handler: register this on the button GPIO falling edge.
pub fn button_isr_handler(now_ms: u32) {
    MAINTENANCE_BUTTON.on_edge(now_ms);
}
