//! Maintenance keypad: PS/2 scan codes → threshold entries.
//!
//! The operator types a number on the numeric keypad and presses Enter.
//! Successive entries alternate between the minimum frequency and the
//! maximum rate of change.
//!
//! | Byte        | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `0xF0`      | break prefix, next byte is a key release  |
//! | `0xE0`      | extended prefix (keypad Enter is `E0 5A`) |
//! | `0x70..`    | digits 0–9 (set-2 keypad codes)           |
//! | `0x71`      | decimal point                             |
//! | `0x5A`      | Enter                                     |

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

pub const PS2_BREAK: u8 = 0xF0;
pub const PS2_EXTENDED: u8 = 0xE0;
pub const PS2_ENTER: u8 = 0x5A;
pub const PS2_DECIMAL: u8 = 0x71;

/// Keypad make codes indexed by digit value.
pub const PS2_DIGITS: [u8; 10] = [0x70, 0x69, 0x72, 0x7A, 0x6B, 0x73, 0x74, 0x6C, 0x75, 0x7D];

/// Longest number the buffer holds, decimal point included.
const ENTRY_CAPACITY: usize = 15;

/// Depth of the raw byte channel.
const KEYPAD_DEPTH: usize = 32;

/// Raw scan codes from the keypad reader to the control loop.
pub static KEYPAD_BYTES: Channel<CriticalSectionRawMutex, u8, KEYPAD_DEPTH> = Channel::new();

/// A committed threshold value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdEntry {
    MinFrequency(f64),
    MaxRoc(f64),
}

/// Which threshold the next Enter commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    MinFrequency,
    MaxRoc,
}

pub struct KeypadDecoder {
    buffer: heapless::String<ENTRY_CAPACITY>,
    has_decimal: bool,
    skip_next: bool,
    target: Target,
}

impl Default for KeypadDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeypadDecoder {
    pub fn new() -> Self {
        Self {
            buffer: heapless::String::new(),
            has_decimal: false,
            skip_next: false,
            target: Target::MinFrequency,
        }
    }

    /// Feed one scan-code byte.  Returns an entry when Enter commits one.
    pub fn feed(&mut self, byte: u8) -> Option<ThresholdEntry> {
        if self.skip_next {
            self.skip_next = false;
            return None;
        }

        match byte {
            PS2_BREAK => {
                self.skip_next = true;
                None
            }
            PS2_EXTENDED => None,
            PS2_ENTER => Some(self.commit()),
            PS2_DECIMAL => {
                if !self.has_decimal {
                    self.has_decimal = true;
                    self.push('.');
                }
                None
            }
            other => {
                if let Some(digit) = PS2_DIGITS.iter().position(|&code| code == other) {
                    self.push(char::from(b'0' + digit as u8));
                }
                None
            }
        }
    }

    /// Drop any partial entry and pending release.  The min/max
    /// alternation is kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.has_decimal = false;
        self.skip_next = false;
    }

    /// Digits typed so far.
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    fn push(&mut self, c: char) {
        if self.buffer.push(c).is_err() {
            warn!("keypad: entry longer than {} characters, dropping '{}'", ENTRY_CAPACITY, c);
        }
    }

    fn commit(&mut self) -> ThresholdEntry {
        // An empty entry (or a lone '.') commits 0.
        let value = self.buffer.parse::<f64>().unwrap_or(0.0);
        self.clear();

        let entry = match self.target {
            Target::MinFrequency => {
                self.target = Target::MaxRoc;
                ThresholdEntry::MinFrequency(value)
            }
            Target::MaxRoc => {
                self.target = Target::MinFrequency;
                ThresholdEntry::MaxRoc(value)
            }
        };
        info!("keypad: committed {:?}", entry);
        entry
    }
}

/// Queue a byte from the reader side.  Returns `false` when full.
pub fn push_keypad_byte(byte: u8) -> bool {
    KEYPAD_BYTES.try_send(byte).is_ok()
}

/// Non-blocking iterator over queued bytes, for the control loop.
pub fn queued_keypad_bytes() -> impl Iterator<Item = u8> {
    core::iter::from_fn(|| KEYPAD_BYTES.try_receive().ok())
}
