//! Monotonic time source for interrupt handlers.
//!
//! Wraps `esp_timer_get_time()` from the ESP-IDF high-resolution timer
//! (microsecond precision, monotonic since boot).  Host builds have no
//! interrupt handlers and take their timestamps from the tests directly.

/// Raw high-resolution timer read.  Safe in ISR context.
#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: esp_timer_get_time reads the RTC counter; no shared state.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}
