//! Keypad serial reader.
//!
//! The PS/2 keypad sits behind a PS/2-to-serial bridge that forwards raw
//! scan-code bytes.  A dedicated thread blocks on the UART and queues the
//! bytes on [`KEYPAD_BYTES`](crate::keypad::KEYPAD_BYTES); decoding
//! happens later in the control loop.

use log::warn;

use crate::drivers::hw_init::HwInitError;
use crate::keypad::push_keypad_byte;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Queue a batch read from the UART.  Returns how many bytes were lost
/// because the channel was full.
pub fn forward_bytes(bytes: &[u8]) -> usize {
    let dropped = bytes.iter().filter(|&&b| !push_keypad_byte(b)).count();
    if dropped > 0 {
        warn!("keypad_uart: channel full, {} byte(s) dropped", dropped);
    }
    dropped
}

#[cfg(target_os = "espidf")]
const RX_BUFFER_LEN: i32 = 256;

/// Configure the keypad UART and spawn the reader thread.
#[cfg(target_os = "espidf")]
pub fn start_reader() -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: pins::KEYPAD_UART_BAUD as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    // SAFETY: Called once from main() before the reader thread exists.
    unsafe {
        let ret = uart_driver_install(
            pins::KEYPAD_UART_NUM,
            RX_BUFFER_LEN,
            0,
            0,
            core::ptr::null_mut(),
            0,
        );
        if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

        let ret = uart_param_config(pins::KEYPAD_UART_NUM, &cfg);
        if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

        let ret = uart_set_pin(
            pins::KEYPAD_UART_NUM,
            pins::KEYPAD_UART_TX_GPIO,
            pins::KEYPAD_UART_RX_GPIO,
            -1,
            -1,
        );
        if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }
    }

    std::thread::Builder::new()
        .name("keypad".into())
        .stack_size(3 * 1024)
        .spawn(reader_loop)
        .map_err(|_| HwInitError::UartInitFailed(-1))?;

    log::info!(
        "keypad_uart: UART{} @ {} baud, rx=GPIO{}",
        pins::KEYPAD_UART_NUM,
        pins::KEYPAD_UART_BAUD,
        pins::KEYPAD_UART_RX_GPIO
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
fn reader_loop() {
    let mut buf = [0u8; 16];
    loop {
        // SAFETY: the driver was installed in start_reader(); this thread
        // is the only reader.
        let n = unsafe {
            uart_read_bytes(
                pins::KEYPAD_UART_NUM,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                TickType_t::MAX,
            )
        };
        if n > 0 {
            forward_bytes(&buf[..n as usize]);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_reader() -> Result<(), HwInitError> {
    log::info!("keypad_uart(sim): no reader; feed bytes with forward_bytes()");
    Ok(())
}
