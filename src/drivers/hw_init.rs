//! One-shot interrupt-pin initialization.
//!
//! Configures the zero-cross and maintenance-button inputs and registers
//! their ISRs using raw ESP-IDF sys calls.  The switch and relay banks
//! are owned by `esp-idf-hal` pin drivers instead (see `main`).  Called
//! once from `main()` before the event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerStartFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::TimerStartFailed(rc) => write!(f, "base timer start failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "keypad UART init failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_interrupt_inputs()?;
    }
    info!("hw_init: interrupt inputs configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_interrupt_inputs() -> Result<(), HwInitError> {
    // Comparator output is push-pull; no pulls.
    let zc_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ZERO_CROSS_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
    };
    let ret = unsafe { gpio_config(&zc_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::MAINTENANCE_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::button_isr_handler;
#[cfg(target_os = "espidf")]
use crate::drivers::zero_cross::zero_cross_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn zero_cross_gpio_isr(_arg: *mut core::ffi::c_void) {
    zero_cross_isr_handler(crate::adapters::time::now_us());
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler((crate::adapters::time::now_us() / 1_000) as u32);
}

/// Install per-pin GPIO ISR service and register interrupt handlers.
/// Call after init_peripherals() and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handlers only
    // touch atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(pins::ZERO_CROSS_GPIO, Some(zero_cross_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 { return Err(HwInitError::IsrInstallFailed(ret)); }
        gpio_intr_enable(pins::ZERO_CROSS_GPIO);

        let ret = gpio_isr_handler_add(pins::MAINTENANCE_BUTTON_GPIO, Some(button_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 { return Err(HwInitError::IsrInstallFailed(ret)); }
        gpio_intr_enable(pins::MAINTENANCE_BUTTON_GPIO);
    }
    info!("hw_init: ISR service installed (zero-cross, button)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
