//! Frequency sampler.
//!
//! The frequency analyser reports how many fixed-rate samples elapsed
//! between the two most recent signal peaks.  Each report updates the
//! instantaneous frequency and its rate of change.
//!
//! ```text
//!  zero-cross ISR ──▶ on_peak_interval() ──▶ [seqlock] ──▶ snapshot() ──▶ decision engine
//!   (one writer)                                           (any reader)
//! ```
//!
//! The two values are published together behind a sequence counter so a
//! reader never observes a frequency from one update paired with the
//! RoC of another.  The writer does arithmetic and four atomic stores,
//! nothing else, so it is safe to call from interrupt context.

use core::hint::spin_loop;
use core::sync::atomic::{AtomicU32, AtomicU64, Ordering, fence};

use serde::Serialize;

use crate::app::ports::FrequencyPort;

/// A coherent (frequency, RoC) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrequencySample {
    /// Instantaneous signal frequency (Hz).
    pub frequency_hz: f64,
    /// Rate of change of frequency (Hz/s).
    pub roc_hz_per_sec: f64,
}

/// Single-writer / multi-reader frequency state.
pub struct FrequencySampler {
    sample_rate_hz: u32,
    /// Odd while an update is in progress.
    seq: AtomicU32,
    frequency_bits: AtomicU64,
    roc_bits: AtomicU64,
}

impl FrequencySampler {
    /// Both values start at 0.0 ("no peak seen yet").
    pub const fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            seq: AtomicU32::new(0),
            frequency_bits: AtomicU64::new(0),
            roc_bits: AtomicU64::new(0),
        }
    }

    /// Record a new peak interval of `sample_count` samples.
    ///
    /// `0` means no new peak and leaves the published values untouched.
    /// Must only be called from one context at a time.
    pub fn on_peak_interval(&self, sample_count: u32) {
        if sample_count == 0 {
            return;
        }

        let instantaneous = f64::from(self.sample_rate_hz) / f64::from(sample_count);
        // RoC is taken against the frequency *before* this update.
        let previous = f64::from_bits(self.frequency_bits.load(Ordering::Relaxed));
        let roc = (instantaneous - previous) * instantaneous;

        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        self.roc_bits.store(roc.to_bits(), Ordering::Relaxed);
        self.frequency_bits
            .store(instantaneous.to_bits(), Ordering::Relaxed);

        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Read a coherent pair, retrying while a writer is mid-update.
    pub fn snapshot(&self) -> FrequencySample {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 1 {
                spin_loop();
                continue;
            }

            let roc = self.roc_bits.load(Ordering::Relaxed);
            let frequency = self.frequency_bits.load(Ordering::Relaxed);
            fence(Ordering::Acquire);

            if self.seq.load(Ordering::Relaxed) == before {
                return FrequencySample {
                    frequency_hz: f64::from_bits(frequency),
                    roc_hz_per_sec: f64::from_bits(roc),
                };
            }
        }
    }

    /// Analyser sample rate this sampler converts with.
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}

impl FrequencyPort for FrequencySampler {
    fn frequency(&self) -> FrequencySample {
        self.snapshot()
    }
}
