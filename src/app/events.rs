//! Outbound application events.
//!
//! The [`RelayService`](super::service::RelayService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.

use serde::Serialize;

use crate::output::StatusSnapshot;
use crate::shedding::Thresholds;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AppEvent {
    /// The relay service has started.
    Started(Thresholds),

    /// The ladder disconnected a load.
    LoadShed(usize),

    /// The ladder reconnected a load.
    LoadReconnected(usize),

    /// A switch change disconnected at least one load.
    SwitchForcedOff { connected: u8 },

    /// Maintenance mode was entered (`true`) or left (`false`).
    MaintenanceChanged(bool),

    /// A threshold was replaced from the keypad or a command.
    ThresholdsChanged(Thresholds),

    /// Periodic console report.
    Status(StatusSnapshot),
}
