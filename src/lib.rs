//! Load-shedding relay firmware library.
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod frequency;
pub mod keypad;
pub mod output;
pub mod pins;
pub mod scheduler;
pub mod shedding;

pub mod adapters;
pub mod drivers;
