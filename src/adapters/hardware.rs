//! Hardware adapter: bridges the board's pins to the domain port traits.
//!
//! Owns the eight switch inputs and the eight relay outputs, and reads
//! frequency from the sampler published by the zero-cross ISR.  The pins
//! are any embedded-hal 1.0 digital pins, so the same adapter runs on
//! `esp-idf-hal` pin drivers and on host-side mocks.
//!
//! The red indicator LEDs are wired across the relay coils, so driving
//! the relays from the red bank lights them too.  The board has no green
//! bank; it only appears in the console status.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{FrequencyPort, LoadOutputPort, SwitchPort};
use crate::frequency::{FrequencySample, FrequencySampler};
use crate::output::{LedFrame, bit_for};
use crate::shedding::loads::LOAD_COUNT;

/// Concrete adapter that combines the switch bank, relay bank and
/// frequency measurement behind port traits.
pub struct HardwareAdapter<S, R> {
    switches: [S; LOAD_COUNT],
    relays: [R; LOAD_COUNT],
    sampler: &'static FrequencySampler,
    /// Last good switch reading, reused for a pin that fails to read.
    last_mask: u8,
}

impl<S, R> HardwareAdapter<S, R>
where
    S: InputPin,
    R: OutputPin,
{
    pub fn new(
        switches: [S; LOAD_COUNT],
        relays: [R; LOAD_COUNT],
        sampler: &'static FrequencySampler,
    ) -> Self {
        Self {
            switches,
            relays,
            sampler,
            last_mask: 0xFF,
        }
    }

    /// Open every relay.  Used before the control loop takes over.
    pub fn all_off(&mut self) {
        for (i, relay) in self.relays.iter_mut().enumerate() {
            if relay.set_low().is_err() {
                warn!("relay {}: write failed", i);
            }
        }
    }
}

// ── SwitchPort implementation ─────────────────────────────────

impl<S, R> SwitchPort for HardwareAdapter<S, R>
where
    S: InputPin,
    R: OutputPin,
{
    fn read_switch_mask(&mut self) -> u8 {
        let mut mask = 0u8;
        for (i, pin) in self.switches.iter_mut().enumerate() {
            let bit = bit_for(i);
            match pin.is_high() {
                Ok(true) => mask |= bit,
                Ok(false) => {}
                Err(_) => {
                    warn!("switch {}: read failed, keeping previous position", i);
                    mask |= self.last_mask & bit;
                }
            }
        }
        self.last_mask = mask;
        mask
    }
}

// ── FrequencyPort implementation ──────────────────────────────

impl<S, R> FrequencyPort for HardwareAdapter<S, R> {
    fn frequency(&self) -> FrequencySample {
        self.sampler.snapshot()
    }
}

// ── LoadOutputPort implementation ─────────────────────────────

impl<S, R> LoadOutputPort for HardwareAdapter<S, R>
where
    S: InputPin,
    R: OutputPin,
{
    fn drive(&mut self, frame: &LedFrame) {
        for (i, relay) in self.relays.iter_mut().enumerate() {
            let result = if frame.load_on(i) {
                relay.set_high()
            } else {
                relay.set_low()
            };
            if result.is_err() {
                warn!("relay {}: write failed", i);
            }
        }
    }
}
