//! Inbound commands to the relay service.
//!
//! These represent operator actions (maintenance button, keypad) that the
//! [`RelayService`](super::service::RelayService) interprets.

/// Commands that adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Flip between normal operation and maintenance.
    ToggleMaintenance,

    /// Replace the minimum-frequency threshold (Hz).
    SetMinFrequency(f64),

    /// Replace the maximum rate-of-change threshold (Hz/s).
    SetMaxRoc(f64),

    /// One raw PS/2 scan-code byte from the keypad.
    KeypadByte(u8),
}
