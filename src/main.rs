//! Load-shedding relay firmware entry point.
//!
//! Bring-up order matters: logger → config check → interrupt inputs →
//! ISR service → pin drivers → keypad reader → base timer.  Any failure
//! before the loop starts is fatal; a relay that cannot see its inputs
//! must not run.

#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use log::{error, info};

use lcfr::adapters::hardware::HardwareAdapter;
use lcfr::adapters::log_sink::LogEventSink;
use lcfr::app::commands::AppCommand;
use lcfr::app::ports::TaskDelegate;
use lcfr::app::service::RelayService;
use lcfr::config::RelayConfig;
use lcfr::drivers::zero_cross::FREQUENCY_SAMPLER;
use lcfr::error::Error;
use lcfr::events::{self, Event};
use lcfr::scheduler::{Scheduler, TaskId};
use lcfr::shedding::loads::LOAD_COUNT;
use lcfr::{drivers, keypad, pins};

// ═══════════════════════════════════════════════════════════════
//  Scheduler delegate
// ═══════════════════════════════════════════════════════════════

/// Collects the tasks due on one base tick so the loop can run them in
/// firing order once the scheduler borrow ends.
#[derive(Default)]
struct DueTasks(heapless::Vec<TaskId, 3>);

impl TaskDelegate for DueTasks {
    fn on_task_due(&mut self, task: TaskId) {
        if self.0.push(task).is_err() {
            log::warn!("scheduler: more tasks due than slots, {:?} skipped", task);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Pin banks
// ═══════════════════════════════════════════════════════════════

type SwitchPin = PinDriver<'static, AnyIOPin, Input>;
type RelayPin = PinDriver<'static, AnyOutputPin, Output>;

fn switch_bank() -> Result<[SwitchPin; LOAD_COUNT]> {
    let mut bank: heapless::Vec<SwitchPin, LOAD_COUNT> = heapless::Vec::new();
    for gpio in pins::SWITCH_GPIOS {
        // SAFETY: every GPIO in the switch bank is claimed exactly once, here.
        let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
        pin.set_pull(Pull::Down)?;
        bank.push(pin)
            .map_err(|_| anyhow!("switch bank overflow at GPIO{}", gpio))?;
    }
    bank.into_array()
        .map_err(|_| anyhow!("switch bank incomplete"))
}

fn relay_bank() -> Result<[RelayPin; LOAD_COUNT]> {
    let mut bank: heapless::Vec<RelayPin, LOAD_COUNT> = heapless::Vec::new();
    for gpio in pins::RELAY_GPIOS {
        // SAFETY: every GPIO in the relay bank is claimed exactly once, here.
        let pin = PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?;
        bank.push(pin)
            .map_err(|_| anyhow!("relay bank overflow at GPIO{}", gpio))?;
    }
    bank.into_array()
        .map_err(|_| anyhow!("relay bank incomplete"))
}

// ═══════════════════════════════════════════════════════════════
//  Entry point
// ═══════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LCFR relay v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = RelayConfig::default();
    config.validate().map_err(Error::from)?;
    if config.sample_rate_hz != FREQUENCY_SAMPLER.sample_rate_hz() {
        return Err(anyhow!(
            "config sample rate {} Hz differs from analyser clock {} Hz",
            config.sample_rate_hz,
            FREQUENCY_SAMPLER.sample_rate_hz()
        ));
    }

    if let Err(e) = drivers::hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(Error::from(e).into());
    }
    drivers::hw_init::init_isr_service().map_err(Error::from)?;

    let mut hw = HardwareAdapter::new(switch_bank()?, relay_bank()?, &FREQUENCY_SAMPLER);
    hw.all_off();

    drivers::keypad_uart::start_reader().map_err(Error::from)?;

    let mut sink = LogEventSink::new();
    let mut sched = Scheduler::new(&config);
    let mut app = RelayService::new(&config);
    app.start(&mut sink);

    drivers::hw_timer::start_base_timer(config.base_tick_ms).map_err(Error::from)?;
    info!("System ready. Entering event loop.");

    loop {
        events::drain_events(|event| match event {
            Event::BaseTick => {
                let mut due = DueTasks::default();
                sched.tick(&mut due);
                for task in due.0 {
                    match task {
                        TaskId::Decide => {
                            app.decide(&mut hw, &mut sink);
                        }
                        TaskId::LedRefresh => app.refresh_outputs(&mut hw),
                        TaskId::Console => app.report_status(&hw, &mut sink),
                    }
                }
            }
            Event::MaintenanceButton => {
                app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
            }
        });

        app.feed_keypad(keypad::queued_keypad_bytes(), &mut sink);

        FreeRtos::delay_ms(config.base_tick_ms / 2);
    }
}
