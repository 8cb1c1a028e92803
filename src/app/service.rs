//! Relay service: the hexagonal core.
//!
//! [`RelayService`] owns the shedding engine, the keypad decoder and the
//! maintenance flag.  Each scheduler task maps onto one method here, and
//! all I/O flows through port traits injected at the call site.
//!
//! ```text
//!    SwitchPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  FrequencyPort ──▶│       RelayService        │
//! LoadOutputPort ◀──│ engine · keypad · maint.  │
//!                   └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::RelayConfig;
use crate::frequency::FrequencySample;
use crate::keypad::{KeypadDecoder, ThresholdEntry};
use crate::output::{LedFrame, StatusSnapshot, render_leds};
use crate::shedding::loads::LoadSnapshot;
use crate::shedding::{CycleReport, LadderAction, SheddingEngine, SheddingState, Thresholds};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, FrequencyPort, LoadOutputPort, SwitchPort};

// ───────────────────────────────────────────────────────────────
// RelayService
// ───────────────────────────────────────────────────────────────

pub struct RelayService {
    engine: SheddingEngine,
    keypad: KeypadDecoder,
    maintenance: bool,
    cycle_count: u64,
}

impl RelayService {
    /// Fresh relay: all loads connected, default thresholds, normal mode.
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            engine: SheddingEngine::new(config),
            keypad: KeypadDecoder::new(),
            maintenance: false,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let thresholds = self.engine.thresholds();
        info!(
            "relay started: min {:.2} Hz, max RoC {:.2} Hz/s",
            thresholds.min_frequency_hz, thresholds.max_roc_hz_per_sec
        );
        sink.emit(&AppEvent::Started(thresholds));
    }

    // ── Periodic tasks ────────────────────────────────────────

    /// Decision task: read switches and frequency, run one engine cycle.
    ///
    /// `hw` satisfies both input ports so one adapter can own every pin
    /// without a double mutable borrow.
    pub fn decide(
        &mut self,
        hw: &mut (impl SwitchPort + FrequencyPort),
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycle_count += 1;

        let mask = hw.read_switch_mask();
        let sample = hw.frequency();
        let report = self.engine.cycle(mask, sample, self.maintenance);

        if report.switch_forced {
            let connected = self.engine.loads().connected_count() as u8;
            info!("switch bank 0b{:08b} forced loads off ({} connected)", mask, connected);
            sink.emit(&AppEvent::SwitchForcedOff { connected });
        }

        match report.action {
            Some(LadderAction::Shed(idx)) => {
                info!(
                    "load {} shed (f={:.3} Hz, roc={:.3} Hz/s)",
                    idx, sample.frequency_hz, sample.roc_hz_per_sec
                );
                sink.emit(&AppEvent::LoadShed(idx));
            }
            Some(LadderAction::Reconnected(idx)) => {
                info!("load {} reconnected", idx);
                sink.emit(&AppEvent::LoadReconnected(idx));
            }
            None => {}
        }

        report
    }

    /// LED task: push the current load picture to the outputs.
    pub fn refresh_outputs(&self, hw: &mut impl LoadOutputPort) {
        hw.drive(&self.led_frame());
    }

    /// Console task: emit a status report.  Silent in maintenance.
    pub fn report_status(&self, freq: &impl FrequencyPort, sink: &mut impl EventSink) {
        if self.maintenance {
            return;
        }
        sink.emit(&AppEvent::Status(self.status(freq.frequency())));
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::ToggleMaintenance => self.set_maintenance(!self.maintenance, sink),
            AppCommand::SetMinFrequency(hz) => {
                self.engine.set_min_frequency(hz);
                sink.emit(&AppEvent::ThresholdsChanged(self.engine.thresholds()));
            }
            AppCommand::SetMaxRoc(hz_per_sec) => {
                self.engine.set_max_roc(hz_per_sec);
                sink.emit(&AppEvent::ThresholdsChanged(self.engine.thresholds()));
            }
            AppCommand::KeypadByte(byte) => self.feed_keypad([byte], sink),
        }
    }

    /// Run keypad bytes through the decoder.
    ///
    /// Outside maintenance the bytes are consumed and discarded, so
    /// nothing typed earlier survives into the next maintenance session.
    pub fn feed_keypad(&mut self, bytes: impl IntoIterator<Item = u8>, sink: &mut impl EventSink) {
        let mut dropped = 0usize;
        for byte in bytes {
            if !self.maintenance {
                dropped += 1;
                continue;
            }
            match self.keypad.feed(byte) {
                Some(ThresholdEntry::MinFrequency(hz)) => {
                    self.handle_command(AppCommand::SetMinFrequency(hz), sink)
                }
                Some(ThresholdEntry::MaxRoc(hz_per_sec)) => {
                    self.handle_command(AppCommand::SetMaxRoc(hz_per_sec), sink)
                }
                None => {}
            }
        }
        if dropped > 0 {
            warn!("keypad: {} byte(s) ignored outside maintenance", dropped);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_maintenance(&self) -> bool {
        self.maintenance
    }

    pub fn thresholds(&self) -> Thresholds {
        self.engine.thresholds()
    }

    pub fn shedding_state(&self) -> SheddingState {
        self.engine.state()
    }

    pub fn loads(&self) -> LoadSnapshot {
        self.engine.load_snapshot()
    }

    pub fn engine(&self) -> &SheddingEngine {
        &self.engine
    }

    /// Keypad digits typed but not yet committed.
    pub fn pending_entry(&self) -> &str {
        self.keypad.pending()
    }

    /// Decision cycles run since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn led_frame(&self) -> LedFrame {
        render_leds(&self.engine.load_snapshot(), self.maintenance)
    }

    pub fn status(&self, frequency: FrequencySample) -> StatusSnapshot {
        StatusSnapshot {
            frequency,
            thresholds: self.engine.thresholds(),
            leds: self.led_frame(),
            maintenance: self.maintenance,
            connected_loads: self.engine.loads().connected_count() as u8,
            loads: self.engine.load_snapshot(),
            cycles: self.cycle_count,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_maintenance(&mut self, on: bool, sink: &mut impl EventSink) {
        self.maintenance = on;
        if on {
            self.keypad.clear();
            info!("maintenance mode enabled");
        } else {
            info!("maintenance mode disabled");
        }
        sink.emit(&AppEvent::MaintenanceChanged(on));
    }
}
