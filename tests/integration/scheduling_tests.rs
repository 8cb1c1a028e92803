//! Integration tests for base tick → scheduler → relay service timing.
//!
//! Mirrors the firmware main loop: each base tick runs the scheduler, and
//! the tasks it reports are dispatched to the service in firing order.

use crate::mock_hw::{MockBoard, RecordingSink};

use lcfr::app::commands::AppCommand;
use lcfr::app::ports::TaskDelegate;
use lcfr::app::service::RelayService;
use lcfr::config::RelayConfig;
use lcfr::scheduler::{Scheduler, TaskId};

#[derive(Default)]
struct DueTasks(Vec<TaskId>);

impl TaskDelegate for DueTasks {
    fn on_task_due(&mut self, task: TaskId) {
        self.0.push(task);
    }
}

struct Rig {
    sched: Scheduler,
    app: RelayService,
    hw: MockBoard,
    sink: RecordingSink,
    ticks: u32,
}

impl Rig {
    fn new() -> Self {
        let config = RelayConfig::default();
        Self {
            sched: Scheduler::new(&config),
            app: RelayService::new(&config),
            hw: MockBoard::new(),
            sink: RecordingSink::new(),
            ticks: 0,
        }
    }

    fn base_tick(&mut self) {
        self.ticks += 1;
        let mut due = DueTasks::default();
        self.sched.tick(&mut due);
        for task in due.0 {
            match task {
                TaskId::Decide => {
                    self.app.decide(&mut self.hw, &mut self.sink);
                }
                TaskId::LedRefresh => self.app.refresh_outputs(&mut self.hw),
                TaskId::Console => self.app.report_status(&self.hw, &mut self.sink),
            }
        }
    }

    fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms / RelayConfig::default().base_tick_ms {
            self.base_tick();
        }
    }
}

#[test]
fn one_second_of_cadences() {
    let mut rig = Rig::new();
    rig.hw.stable();
    rig.run_ms(1_000);

    assert_eq!(rig.hw.switch_reads, 50);
    assert_eq!(rig.hw.frames.len(), 100);
    assert_eq!(rig.sink.status_count(), 10);
}

#[test]
fn second_shed_lands_half_a_second_after_the_timer_arms() {
    let mut rig = Rig::new();
    rig.hw.under_frequency();

    let mut shed_at = Vec::new();
    while shed_at.len() < 3 {
        let before = rig.sink.shed().len();
        rig.base_tick();
        if rig.sink.shed().len() > before {
            shed_at.push(rig.ticks * 10);
        }
        assert!(rig.ticks < 1_000, "ladder stalled");
    }
    // 20 ms: immediate shed; 40 ms: drop timer armed; +500 ms: confirmed.
    assert_eq!(shed_at, vec![20, 540, 560]);
}

#[test]
fn led_refresh_follows_decision_in_same_tick() {
    let mut rig = Rig::new();
    rig.hw.under_frequency();
    rig.run_ms(20);
    assert_eq!(rig.hw.last_frame().map(|f| f.red), Some(0x7F));
}

#[test]
fn maintenance_silences_console_only() {
    let mut rig = Rig::new();
    rig.hw.stable();
    rig.app
        .handle_command(AppCommand::ToggleMaintenance, &mut rig.sink);
    rig.run_ms(500);

    assert_eq!(rig.sink.status_count(), 0);
    assert_eq!(rig.hw.frames.len(), 50);
    assert_eq!(rig.hw.switch_reads, 25);
}
