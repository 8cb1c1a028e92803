//! Peripheral drivers: interrupt inputs, base timer, keypad serial.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod keypad_uart;
pub mod zero_cross;
