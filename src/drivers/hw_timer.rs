//! Hardware base timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer at `base_tick_ms` drives the whole relay.  The
//! callback executes in the ESP timer task context (not ISR) and is the
//! only producer on the event queue.

use crate::drivers::button::MAINTENANCE_BUTTON;
use crate::drivers::hw_init::HwInitError;
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
static mut BASE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Body of the timer callback: announce the tick and forward any latched
/// button press.
pub fn on_base_tick() {
    if !push_event(Event::BaseTick) {
        log::warn!("hw_timer: event queue full, base tick dropped");
    }
    if MAINTENANCE_BUTTON.take() {
        push_event(Event::MaintenanceButton);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn base_tick_cb(_arg: *mut core::ffi::c_void) {
    on_base_tick();
}

/// Start the periodic base timer.
#[cfg(target_os = "espidf")]
pub fn start_base_timer(period_ms: u32) -> Result<(), HwInitError> {
    // SAFETY: BASE_TIMER is written here once at boot from the single
    // main-task context before any timer callback fires.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(base_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"base_tick".as_ptr(),
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut BASE_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
        let ret = esp_timer_start_periodic(BASE_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
    }
    log::info!("hw_timer: base tick every {} ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_base_timer(period_ms: u32) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): {} ms base tick driven by the caller", period_ms);
    Ok(())
}
