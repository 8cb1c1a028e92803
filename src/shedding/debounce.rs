//! One-shot debounce timers driven by the decision cycle.
//!
//! Each timer is a countdown advanced once per engine tick.  Expiry is
//! reported exactly once; the engine turns it into a confirmation flag.
//! Nothing here touches the load registry.

/// Fixed-length one-shot countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    name: &'static str,
    period_ticks: u32,
    /// `Some(n)` while armed with `n` ticks left.
    remaining: Option<u32>,
}

impl DebounceTimer {
    pub fn new(name: &'static str, period_ticks: u32) -> Self {
        Self {
            name,
            period_ticks: period_ticks.max(1),
            remaining: None,
        }
    }

    /// Arm the timer.  Already armed → left untouched.
    pub fn start(&mut self) {
        if self.remaining.is_none() {
            log::debug!("{} timer armed ({} ticks)", self.name, self.period_ticks);
            self.remaining = Some(self.period_ticks);
        }
    }

    /// Disarm without expiry.  Stopping an idle timer is a no-op.
    pub fn stop(&mut self) {
        self.remaining = None;
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance one tick.  Returns `true` on the tick the timer expires,
    /// after which it is inactive until started again.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(n) if n <= 1 => {
                self.remaining = None;
                log::debug!("{} timer expired", self.name);
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn period_ticks(&self) -> u32 {
        self.period_ticks
    }
}
