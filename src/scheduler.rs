//! Periodic task divider.
//!
//! The hardware base timer produces one tick every `base_tick_ms`.  The
//! scheduler divides that into the relay's three periodic tasks and
//! notifies a [`TaskDelegate`] when each comes due; the main loop turns
//! the notification into an event.
//!
//! ```text
//!  base tick (10 ms) ──▶ Scheduler ──┬──▶ Decide      every 2 ticks
//!                                    ├──▶ LedRefresh  every tick
//!                                    └──▶ Console     every 10 ticks
//!                                             │
//!                                             ▼
//!                                        TaskDelegate
//! ```
//!
//! Within one base tick the tasks fire in the order above, so the LED
//! refresh always shows the outcome of a decision made in the same tick.

use crate::app::ports::TaskDelegate;
use crate::config::RelayConfig;
use log::info;

/// The relay's periodic tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    Decide,
    LedRefresh,
    Console,
}

const TASK_COUNT: usize = 3;

#[derive(Debug, Clone)]
struct PeriodicTask {
    id: TaskId,
    period_ticks: u32,
    elapsed_ticks: u32,
}

impl PeriodicTask {
    fn new(id: TaskId, interval_ms: u32, base_tick_ms: u32) -> Self {
        Self {
            id,
            period_ticks: (interval_ms / base_tick_ms.max(1)).max(1),
            elapsed_ticks: 0,
        }
    }
}

pub struct Scheduler {
    tasks: [PeriodicTask; TASK_COUNT],
}

impl Scheduler {
    /// Build the task table from a validated configuration.
    pub fn new(config: &RelayConfig) -> Self {
        let base = config.base_tick_ms;
        let tasks = [
            PeriodicTask::new(TaskId::Decide, config.decide_interval_ms, base),
            PeriodicTask::new(TaskId::LedRefresh, config.led_refresh_ms, base),
            PeriodicTask::new(TaskId::Console, config.console_interval_ms, base),
        ];
        for t in &tasks {
            info!("Scheduler: {:?} every {} tick(s)", t.id, t.period_ticks);
        }
        Self { tasks }
    }

    /// Advance one base tick, firing every task that comes due.
    pub fn tick(&mut self, delegate: &mut dyn TaskDelegate) {
        for task in self.tasks.iter_mut() {
            task.elapsed_ticks += 1;
            if task.elapsed_ticks >= task.period_ticks {
                task.elapsed_ticks = 0;
                delegate.on_task_due(task.id);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
