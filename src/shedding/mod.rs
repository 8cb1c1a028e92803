//! Shedding decision engine.
//!
//! Runs once per decision cycle (20 ms by default) and owns every piece
//! of mutable control state: the load registry, the thresholds, the
//! debounce bookkeeping and both debounce timers.
//!
//! ```text
//!            ┌──────────── first instability ────────────┐
//!            │            (shed one, no debounce)        ▼
//!  RESTORED ─┤                                     UNSTABLE ──[drop timer expires]──▶ shed one per cycle
//!      ▲     │                                        │  ▲
//!      │     └─◀── all enabled loads connected ──┐    │  │
//!      │                                         │    ▼  │
//!      └─────────────────────────────────── STABLE ──[reconnect timer expires]──▶ reconnect one per cycle
//! ```
//!
//! The first instability of an episode acts at once.  After that, a
//! condition must hold for a full debounce window before the ladder
//! moves again; once confirmed, it moves one step every cycle until the
//! opposite condition is seen even once.

pub mod debounce;
pub mod loads;

use log::{debug, info};
use serde::Serialize;

use crate::config::RelayConfig;
use crate::frequency::FrequencySample;

use debounce::DebounceTimer;
use loads::{LoadRegistry, LoadSnapshot};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Operator-adjustable stability limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Below this frequency the system is unstable (Hz).
    pub min_frequency_hz: f64,
    /// Above this |RoC| the system is unstable (Hz/s).
    pub max_roc_hz_per_sec: f64,
}

impl Thresholds {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            min_frequency_hz: config.default_min_frequency_hz,
            max_roc_hz_per_sec: config.default_max_roc_hz_per_sec,
        }
    }

    pub fn is_unstable(&self, sample: &FrequencySample) -> bool {
        sample.roc_hz_per_sec.abs() > self.max_roc_hz_per_sec
            || sample.frequency_hz < self.min_frequency_hz
    }
}

// ---------------------------------------------------------------------------
// Debounce bookkeeping
// ---------------------------------------------------------------------------

/// Flags carried between decision cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheddingState {
    /// At least one load was shed during the current episode.
    pub first_shed_done: bool,
    /// The previous evaluated cycle was unstable.
    pub shedding: bool,
    /// Instability has persisted through a full drop window.
    pub drop_confirmed: bool,
    /// Stability has persisted through a full reconnect window.
    pub reconnect_confirmed: bool,
}

/// Ladder movement made during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderAction {
    Shed(usize),
    Reconnected(usize),
}

/// What one decision cycle observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Stability verdict; `None` when evaluation was suspended.
    pub unstable: Option<bool>,
    /// Ladder movement, if any.
    pub action: Option<LadderAction>,
    /// Switch changes this cycle disconnected at least one load.
    pub switch_forced: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct SheddingEngine {
    loads: LoadRegistry,
    thresholds: Thresholds,
    state: SheddingState,
    drop_timer: DebounceTimer,
    reconnect_timer: DebounceTimer,
}

impl SheddingEngine {
    /// All loads connected, default thresholds, both timers idle.
    pub fn new(config: &RelayConfig) -> Self {
        let ticks = config.debounce_ticks();
        Self {
            loads: LoadRegistry::new(),
            thresholds: Thresholds::from_config(config),
            state: SheddingState::default(),
            drop_timer: DebounceTimer::new("drop", ticks),
            reconnect_timer: DebounceTimer::new("reconnect", ticks),
        }
    }

    /// Run one decision cycle.
    ///
    /// 1. Advance the debounce timers (paused in maintenance).
    /// 2. Apply the switch mask; reset the episode when fully restored.
    /// 3. Unless in maintenance, evaluate stability and move the ladder.
    pub fn cycle(
        &mut self,
        switch_bits: u8,
        sample: FrequencySample,
        maintenance: bool,
    ) -> CycleReport {
        if !maintenance {
            self.advance_timers();
        }

        let connected_before = self.loads.connected_count();
        let any_shed = self.loads.apply_switch_mask(switch_bits);
        let switch_forced = self.loads.connected_count() < connected_before;
        if !any_shed {
            self.state.first_shed_done = false;
        }

        if maintenance {
            return CycleReport {
                unstable: None,
                action: None,
                switch_forced,
            };
        }

        let unstable = self.thresholds.is_unstable(&sample);
        let action = if unstable {
            self.on_unstable()
        } else {
            self.on_stable()
        };

        if let Some(action) = action {
            debug!(
                "ladder: {:?} at f={:.3}Hz roc={:.3}Hz/s",
                action, sample.frequency_hz, sample.roc_hz_per_sec
            );
        }

        CycleReport {
            unstable: Some(unstable),
            action,
            switch_forced,
        }
    }

    // ── Threshold source ──────────────────────────────────────

    pub fn set_min_frequency(&mut self, hz: f64) {
        info!("minimum frequency set to {:.3} Hz", hz);
        self.thresholds.min_frequency_hz = hz;
    }

    pub fn set_max_roc(&mut self, hz_per_sec: f64) {
        info!("maximum rate of change set to {:.3} Hz/s", hz_per_sec);
        self.thresholds.max_roc_hz_per_sec = hz_per_sec;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn state(&self) -> SheddingState {
        self.state
    }

    pub fn loads(&self) -> &LoadRegistry {
        &self.loads
    }

    pub fn load_snapshot(&self) -> LoadSnapshot {
        self.loads.snapshot()
    }

    pub fn drop_timer_active(&self) -> bool {
        self.drop_timer.is_active()
    }

    pub fn reconnect_timer_active(&self) -> bool {
        self.reconnect_timer.is_active()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Timer expiry only raises the confirmation flag.
    fn advance_timers(&mut self) {
        if self.drop_timer.tick() {
            self.state.drop_confirmed = true;
        }
        if self.reconnect_timer.tick() {
            self.state.reconnect_confirmed = true;
        }
    }

    fn on_unstable(&mut self) -> Option<LadderAction> {
        if !self.state.first_shed_done {
            self.state.first_shed_done = true;
            return self.loads.shed_one().map(LadderAction::Shed);
        }

        // One unstable sample breaks any stability streak.
        self.state.reconnect_confirmed = false;
        if !self.state.shedding {
            self.reconnect_timer.stop();
        }

        let action = if self.state.drop_confirmed {
            self.loads.shed_one().map(LadderAction::Shed)
        } else {
            self.drop_timer.start();
            None
        };
        self.state.shedding = true;
        action
    }

    fn on_stable(&mut self) -> Option<LadderAction> {
        self.state.drop_confirmed = false;
        if self.state.shedding {
            self.drop_timer.stop();
        }

        let action = if self.state.reconnect_confirmed {
            self.loads.reconnect_one().map(LadderAction::Reconnected)
        } else {
            self.reconnect_timer.start();
            None
        };
        self.state.shedding = false;
        action
    }
}
