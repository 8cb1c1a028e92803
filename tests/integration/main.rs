//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the relay against mock
//! adapters.  All tests run on the host (x86_64) with no real hardware.

mod keypad_entry_tests;
mod relay_service_tests;
mod scheduling_tests;
