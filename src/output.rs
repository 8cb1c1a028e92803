//! Output rendering: load LEDs and console status.
//!
//! Both LED banks put load 0 on bit 7 and load 7 on bit 0, matching the
//! physical left-to-right order of the switch bank.
//!
//! | Bank  | Bit set when                        | Maintenance |
//! |-------|-------------------------------------|-------------|
//! | red   | load connected                      | unchanged   |
//! | green | load disconnected                   | all off     |

use serde::Serialize;

use crate::frequency::FrequencySample;
use crate::shedding::Thresholds;
use crate::shedding::loads::{LOAD_COUNT, LoadSnapshot};

/// LED bank contents for one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedFrame {
    pub red: u8,
    pub green: u8,
}

impl LedFrame {
    /// Whether load `index` is lit on the red bank.
    pub fn load_on(&self, index: usize) -> bool {
        self.red & bit_for(index) != 0
    }
}

/// Bit position of load `index` in a bank byte.
pub fn bit_for(index: usize) -> u8 {
    1 << (LOAD_COUNT - 1 - index)
}

pub fn render_leds(loads: &LoadSnapshot, maintenance: bool) -> LedFrame {
    let mut frame = LedFrame::default();
    for (i, slot) in loads.iter().enumerate() {
        if slot.connected {
            frame.red |= bit_for(i);
        } else {
            frame.green |= bit_for(i);
        }
    }
    if maintenance {
        frame.green = 0;
    }
    frame
}

/// Everything an output sink needs for one status report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub frequency: FrequencySample,
    pub thresholds: Thresholds,
    pub leds: LedFrame,
    pub maintenance: bool,
    pub connected_loads: u8,
    /// Per-load connected and switch-enabled flags, load 0 first.
    pub loads: LoadSnapshot,
    /// Decision cycles run since startup.
    pub cycles: u64,
}
