//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to                       |
//! |------------|------------------|-----------------------------------|
//! | `hardware` | SwitchPort       | switch bank GPIOs                 |
//! |            | LoadOutputPort   | relay bank GPIOs                  |
//! |            | FrequencyPort    | zero-cross frequency sampler      |
//! | `log_sink` | EventSink        | serial log output                 |
//! | `time`     | (clock)          | ESP32 high-resolution timer       |

pub mod hardware;
pub mod log_sink;
pub mod time;
