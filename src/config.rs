//! Relay configuration parameters
//!
//! All tunable parameters for the load-shedding relay.  The firmware
//! runs on compiled-in defaults; thresholds are adjusted at runtime
//! through the maintenance keypad.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Rate of the zero-crossing analyser's sample clock (Hz).
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Core relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    // --- Frequency analyser ---
    /// Fixed rate (Hz) at which the analyser counts samples between peaks
    pub sample_rate_hz: u32,

    // --- Thresholds ---
    /// Minimum acceptable mains frequency at startup (Hz)
    pub default_min_frequency_hz: f64,
    /// Maximum acceptable |rate of change| at startup (Hz/s)
    pub default_max_roc_hz_per_sec: f64,

    // --- Timing ---
    /// Period of the hardware base timer (milliseconds)
    pub base_tick_ms: u32,
    /// Shedding decision cycle (milliseconds)
    pub decide_interval_ms: u32,
    /// Load LED / relay refresh cadence (milliseconds)
    pub led_refresh_ms: u32,
    /// Console status cadence (milliseconds)
    pub console_interval_ms: u32,
    /// Window a condition must persist before the ladder acts again (milliseconds)
    pub debounce_ms: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,

            default_min_frequency_hz: 48.5,
            default_max_roc_hz_per_sec: 8.0,

            base_tick_ms: 10,
            decide_interval_ms: 20,
            led_refresh_ms: 10,
            console_interval_ms: 100,
            debounce_ms: 500,
        }
    }
}

impl RelayConfig {
    /// Debounce window expressed in decision cycles (rounded up).
    pub fn debounce_ticks(&self) -> u32 {
        self.debounce_ms.div_ceil(self.decide_interval_ms.max(1))
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::Invalid("sample_rate_hz must be non-zero"));
        }
        if !(self.default_min_frequency_hz.is_finite() && self.default_min_frequency_hz > 0.0) {
            return Err(ConfigError::Invalid("default_min_frequency_hz must be positive"));
        }
        if !(self.default_max_roc_hz_per_sec.is_finite() && self.default_max_roc_hz_per_sec > 0.0) {
            return Err(ConfigError::Invalid("default_max_roc_hz_per_sec must be positive"));
        }
        if self.base_tick_ms == 0 {
            return Err(ConfigError::Invalid("base_tick_ms must be non-zero"));
        }
        for (interval, field) in [
            (self.decide_interval_ms, "decide_interval_ms"),
            (self.led_refresh_ms, "led_refresh_ms"),
            (self.console_interval_ms, "console_interval_ms"),
        ] {
            if interval == 0 || interval % self.base_tick_ms != 0 {
                return Err(ConfigError::NotTickAligned(field));
            }
        }
        if self.debounce_ms < self.decide_interval_ms {
            return Err(ConfigError::Invalid("debounce_ms shorter than one decision cycle"));
        }
        Ok(())
    }
}
