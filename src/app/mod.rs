//! Application core: relay logic with no I/O of its own.
//!
//! The shedding engine, the keypad decoder and the maintenance toggle are
//! wired together here.  Switches, relays, the frequency measurement and
//! event output are reached only through the **port traits** in
//! [`ports`], so the whole relay runs under test with mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
