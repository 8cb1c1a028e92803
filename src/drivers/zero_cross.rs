//! Zero-crossing capture → peak-interval sample counts.
//!
//! The comparator interrupts once per mains cycle.  The ISR turns the
//! time since the previous edge into a count of analyser samples and
//! hands it to the [`FrequencySampler`].  The very first edge has no
//! predecessor and yields `0`, which the sampler ignores.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::config::SAMPLE_RATE_HZ;
use crate::frequency::FrequencySampler;

/// Board-wide frequency measurement, written only by the zero-cross ISR.
pub static FREQUENCY_SAMPLER: FrequencySampler = FrequencySampler::new(SAMPLE_RATE_HZ);

/// Edge timestamps for the board's comparator.
pub static PEAK_COUNTER: PeakIntervalCounter = PeakIntervalCounter::new(SAMPLE_RATE_HZ);

pub struct PeakIntervalCounter {
    /// Previous edge in µs since boot; `0` before the first edge.
    last_edge_us: AtomicU64,
    sample_rate_hz: u32,
}

impl PeakIntervalCounter {
    pub const fn new(sample_rate_hz: u32) -> Self {
        Self {
            last_edge_us: AtomicU64::new(0),
            sample_rate_hz,
        }
    }

    /// Record an edge at `now_us` and return the samples elapsed since the
    /// previous one, rounded to the nearest sample.
    pub fn on_edge(&self, now_us: u64) -> u32 {
        let prev = self.last_edge_us.swap(now_us, Ordering::AcqRel);
        if prev == 0 || now_us <= prev {
            return 0;
        }
        let delta_us = now_us - prev;
        let samples = (delta_us.saturating_mul(u64::from(self.sample_rate_hz)) + 500_000) / 1_000_000;
        u32::try_from(samples).unwrap_or(u32::MAX)
    }
}

/// ISR handler: register this on the comparator's rising edge.
pub fn zero_cross_isr_handler(now_us: u64) {
    FREQUENCY_SAMPLER.on_peak_interval(PEAK_COUNTER.on_edge(now_us));
}
