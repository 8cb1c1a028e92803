//! Load registry and the fixed-priority ladder.
//!
//! Eight load slots in fixed priority order.  Slot 0 is the most
//! important load: it is shed last and restored last.
//!
//! ```text
//!  shed ladder       ──▶  0 1 2 3 4 5 6 7
//!  reconnect ladder       0 1 2 3 4 5 6 7  ◀──
//! ```
//!
//! Invariant: a slot is only ever `connected` while its switch is
//! `enabled`.  Every mutator below preserves it.

use serde::Serialize;

/// Number of load slots.
pub const LOAD_COUNT: usize = 8;

/// Scan order used by [`LoadRegistry::shed_one`]: lowest index first.
pub const SHED_ORDER: [usize; LOAD_COUNT] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Scan order used by [`LoadRegistry::reconnect_one`]: highest index first.
pub const RECONNECT_ORDER: [usize; LOAD_COUNT] = [7, 6, 5, 4, 3, 2, 1, 0];

/// One load and the operator switch that makes it available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSlot {
    /// Currently drawing power.
    pub connected: bool,
    /// Operator has made this load available.
    pub switch_enabled: bool,
}

impl LoadSlot {
    /// Disconnected although the operator allows it to run.
    pub fn is_shed(&self) -> bool {
        self.switch_enabled && !self.connected
    }
}

/// Point-in-time copy of every slot, handed to output sinks.
pub type LoadSnapshot = [LoadSlot; LOAD_COUNT];

/// Authoritative load state, owned by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRegistry {
    slots: LoadSnapshot,
}

impl Default for LoadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadRegistry {
    /// All loads connected, all switches enabled.
    pub fn new() -> Self {
        Self {
            slots: [LoadSlot {
                connected: true,
                switch_enabled: true,
            }; LOAD_COUNT],
        }
    }

    /// Map the raw switch bank onto the slots.
    ///
    /// Bit `i` of `bits` (counted from the MSB side, `i = 7..0`) is the
    /// switch for slot `7 - i`.  A cleared bit disables the switch and
    /// forces the slot off.  Returns `true` when at least one enabled
    /// slot is disconnected, i.e. the system is not fully restored.
    pub fn apply_switch_mask(&mut self, bits: u8) -> bool {
        let mut any_shed = false;
        for i in (0..LOAD_COUNT).rev() {
            let slot = &mut self.slots[LOAD_COUNT - 1 - i];
            if (bits >> i) & 1 == 1 {
                slot.switch_enabled = true;
                if !slot.connected {
                    any_shed = true;
                }
            } else {
                slot.switch_enabled = false;
                slot.connected = false;
            }
        }
        any_shed
    }

    /// Disconnect the first connected slot along [`SHED_ORDER`].
    /// Returns the slot index, or `None` when nothing is left to shed.
    pub fn shed_one(&mut self) -> Option<usize> {
        let idx = SHED_ORDER
            .into_iter()
            .find(|&i| self.slots[i].connected)?;
        self.slots[idx].connected = false;
        Some(idx)
    }

    /// Connect the first shed slot along [`RECONNECT_ORDER`].
    /// Slots with a disabled switch are skipped.
    pub fn reconnect_one(&mut self) -> Option<usize> {
        let idx = RECONNECT_ORDER
            .into_iter()
            .find(|&i| self.slots[i].is_shed())?;
        self.slots[idx].connected = true;
        Some(idx)
    }

    pub fn slot(&self, index: usize) -> LoadSlot {
        self.slots[index]
    }

    pub fn snapshot(&self) -> LoadSnapshot {
        self.slots
    }

    pub fn connected_count(&self) -> usize {
        self.slots.iter().filter(|s| s.connected).count()
    }

    /// `true` when every enabled slot is connected.
    pub fn fully_restored(&self) -> bool {
        !self.slots.iter().any(LoadSlot::is_shed)
    }
}
