//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing relay events to the ESP-IDF logger
//! (UART / USB-CDC console).  Status reports are printed as one JSON
//! object per line so a host script can follow the frequency trace.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(status) => match serde_json::to_string(status) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | encode failed: {}", e),
            },
            AppEvent::LoadShed(idx) => info!("SHED | load {}", idx),
            AppEvent::LoadReconnected(idx) => info!("RECONNECT | load {}", idx),
            AppEvent::SwitchForcedOff { connected } => {
                info!("SWITCH | forced off, {} load(s) connected", connected)
            }
            AppEvent::MaintenanceChanged(on) => {
                info!("MAINT | {}", if *on { "enabled" } else { "disabled" })
            }
            AppEvent::ThresholdsChanged(t) => info!(
                "THRESH | min={:.3}Hz max_roc={:.3}Hz/s",
                t.min_frequency_hz, t.max_roc_hz_per_sec
            ),
            AppEvent::Started(t) => info!(
                "START | min={:.3}Hz max_roc={:.3}Hz/s",
                t.min_frequency_hz, t.max_roc_hz_per_sec
            ),
        }
    }
}
