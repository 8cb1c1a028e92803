//! Port traits: the hexagonal boundary between relay logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RelayService (domain)
//! ```
//!
//! Driven adapters (switch bank, relay bank, zero-cross measurement, event
//! sinks) implement these traits.  The
//! [`RelayService`](super::service::RelayService) consumes them via
//! generics, so the domain core never touches a GPIO directly.

use crate::frequency::FrequencySample;
use crate::output::LedFrame;

// ───────────────────────────────────────────────────────────────
// Input ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Operator switch bank.
pub trait SwitchPort {
    /// Current switch positions, switch for load 0 on bit 7.
    fn read_switch_mask(&mut self) -> u8;
}

/// Latest published frequency measurement.
pub trait FrequencyPort {
    /// Consistent (frequency, RoC) pair.  Never blocks.
    fn frequency(&self) -> FrequencySample;
}

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Load relays and the two indicator banks.
pub trait LoadOutputPort {
    /// Drive every output to match `frame`.
    fn drive(&mut self, frame: &LedFrame);
}

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial console,
/// log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from event system)
// ───────────────────────────────────────────────────────────────

/// Callback trait the [`Scheduler`](crate::scheduler::Scheduler) invokes
/// when a periodic task comes due.
///
/// The firmware collects due tasks and dispatches them to the relay
/// service; the scheduler itself knows nothing about queues or ISRs.
pub trait TaskDelegate {
    fn on_task_due(&mut self, task: crate::scheduler::TaskId);
}
