//! GPIO / peripheral pin assignments for the relay board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.
//!
//! Index `i` of the switch and relay arrays belongs to load `i`, so load 0
//! (highest priority) is the leftmost switch and relay.

use crate::shedding::loads::LOAD_COUNT;

// ---------------------------------------------------------------------------
// Operator switch bank (active HIGH, internal pull-down)
// ---------------------------------------------------------------------------

/// Load-enable switches, load 0 first.
pub const SWITCH_GPIOS: [i32; LOAD_COUNT] = [4, 5, 6, 7, 15, 16, 17, 18];

// ---------------------------------------------------------------------------
// Load relays (active HIGH = load connected)
// ---------------------------------------------------------------------------

/// Relay drivers, load 0 first.  Each relay has its red indicator LED
/// wired in parallel.
pub const RELAY_GPIOS: [i32; LOAD_COUNT] = [8, 9, 10, 11, 12, 13, 14, 21];

// ---------------------------------------------------------------------------
// Frequency measurement
// ---------------------------------------------------------------------------

/// Zero-crossing comparator output; rising edge once per mains cycle.
pub const ZERO_CROSS_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// Maintenance push-button (active-low with external pull-up)
// ---------------------------------------------------------------------------

pub const MAINTENANCE_BUTTON_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PS/2 keypad (through a PS/2-to-serial bridge)
// ---------------------------------------------------------------------------

/// UART peripheral the keypad bridge is attached to.
pub const KEYPAD_UART_NUM: i32 = 1;
pub const KEYPAD_UART_RX_GPIO: i32 = 47;
pub const KEYPAD_UART_TX_GPIO: i32 = 48;
pub const KEYPAD_UART_BAUD: u32 = 9_600;
