//! Integration tests for the switches → engine → relays pipeline.
//!
//! Each test drives `RelayService::decide` directly, one call per 20 ms
//! decision cycle, against the mock board.

use crate::mock_hw::{MockBoard, RecordingSink};

use lcfr::app::commands::AppCommand;
use lcfr::app::events::AppEvent;
use lcfr::app::service::RelayService;
use lcfr::config::RelayConfig;
use lcfr::output::LedFrame;
use lcfr::shedding::LadderAction;

fn make_app() -> (RelayService, MockBoard, RecordingSink) {
    let config = RelayConfig::default();
    let mut app = RelayService::new(&config);
    let hw = MockBoard::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    sink.clear();
    (app, hw, sink)
}

fn window() -> u32 {
    RelayConfig::default().debounce_ticks()
}

/// Run `n` decision cycles and return how many moved the ladder.
fn run(app: &mut RelayService, hw: &mut MockBoard, sink: &mut RecordingSink, n: u32) -> usize {
    (0..n)
        .filter(|_| app.decide(hw, sink).action.is_some())
        .count()
}

// ── Boot behaviour ───────────────────────────────────────────

#[test]
fn boot_without_mains_reading_sheds_first_load() {
    // Until the first two zero crossings the measurement reads 0 Hz,
    // which is below any minimum frequency.
    let (mut app, mut hw, mut sink) = make_app();
    let report = app.decide(&mut hw, &mut sink);
    assert_eq!(report.action, Some(LadderAction::Shed(0)));
    assert_eq!(sink.shed(), vec![0]);
}

// ── Frequency path ordering ──────────────────────────────────

#[test]
fn first_peak_roc_trips_then_settles() {
    let (mut app, mut hw, mut sink) = make_app();

    // 320 samples at 16 kHz = 50 Hz; RoC from 0 Hz is 2500 Hz/s.
    hw.peak(320);
    let s = hw.sampler.snapshot();
    assert_eq!(s.frequency_hz, 50.0);
    assert_eq!(s.roc_hz_per_sec, 2500.0);
    assert_eq!(app.decide(&mut hw, &mut sink).unstable, Some(true));

    hw.peak(320);
    assert_eq!(hw.sampler.snapshot().roc_hz_per_sec, 0.0);
    assert_eq!(app.decide(&mut hw, &mut sink).unstable, Some(false));
}

#[test]
fn zero_peak_interval_keeps_previous_reading() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.peak(320);
    hw.peak(320);
    hw.peak(0);
    let s = hw.sampler.snapshot();
    assert_eq!((s.frequency_hz, s.roc_hz_per_sec), (50.0, 0.0));
    assert_eq!(app.decide(&mut hw, &mut sink).unstable, Some(false));
}

// ── Shedding ladder ──────────────────────────────────────────

#[test]
fn first_instability_sheds_exactly_one_without_timer() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();

    app.decide(&mut hw, &mut sink);
    assert_eq!(sink.shed(), vec![0]);
    assert!(app.shedding_state().first_shed_done);
    assert!(!app.engine().drop_timer_active());
    assert!(!app.engine().reconnect_timer_active());
}

#[test]
fn second_shed_waits_a_full_window() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();

    app.decide(&mut hw, &mut sink); // shed 0
    app.decide(&mut hw, &mut sink); // arms the drop timer
    assert!(app.engine().drop_timer_active());

    let mut cycles = 0;
    while sink.shed().len() < 2 {
        app.decide(&mut hw, &mut sink);
        cycles += 1;
        assert!(cycles <= window(), "second shed never came");
    }
    // 25 cycles × 20 ms = 500 ms.
    assert_eq!(cycles, window());
    assert_eq!(sink.shed(), vec![0, 1]);
}

#[test]
fn confirmed_instability_sheds_every_cycle_in_ascending_order() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();

    run(&mut app, &mut hw, &mut sink, 2 + window());
    assert_eq!(sink.shed(), vec![0, 1]);

    for expected in 2..8 {
        let report = app.decide(&mut hw, &mut sink);
        assert_eq!(report.action, Some(LadderAction::Shed(expected)));
    }
    assert_eq!(app.engine().loads().connected_count(), 0);

    // Exhausted ladder: silent.
    assert_eq!(run(&mut app, &mut hw, &mut sink, 10), 0);
}

#[test]
fn recovery_reconnects_in_descending_order() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();
    run(&mut app, &mut hw, &mut sink, 2 + window() + 6);
    assert_eq!(app.engine().loads().connected_count(), 0);

    hw.stable();
    run(&mut app, &mut hw, &mut sink, 1 + window() + 8);
    assert_eq!(sink.reconnected(), vec![7, 6, 5, 4, 3, 2, 1, 0]);
    assert!(app.engine().loads().fully_restored());
}

#[test]
fn single_unstable_sample_restarts_reconnect_window() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();
    app.decide(&mut hw, &mut sink);

    hw.stable();
    run(&mut app, &mut hw, &mut sink, window() - 5);
    hw.under_frequency();
    app.decide(&mut hw, &mut sink);
    hw.stable();

    // The earlier streak no longer counts.
    assert_eq!(run(&mut app, &mut hw, &mut sink, window()), 0);
    assert!(sink.reconnected().is_empty());
}

#[test]
fn restored_system_sheds_immediately_again() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();
    app.decide(&mut hw, &mut sink);

    hw.stable();
    run(&mut app, &mut hw, &mut sink, window() + 2);
    assert_eq!(sink.reconnected(), vec![0]);
    assert!(!app.shedding_state().first_shed_done);

    sink.clear();
    hw.under_frequency();
    app.decide(&mut hw, &mut sink);
    assert_eq!(sink.shed(), vec![0]);
}

#[test]
fn switching_off_the_shed_load_ends_the_episode() {
    // Load 0 was shed; the operator then turns its switch off.  Every
    // enabled load is connected again, so the next instability acts at
    // once even though the system never stabilised.
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();
    app.decide(&mut hw, &mut sink);

    hw.switches = 0b0111_1111;
    app.decide(&mut hw, &mut sink);
    assert_eq!(sink.shed(), vec![0, 1]);
}

// ── Switch bank ──────────────────────────────────────────────

#[test]
fn cleared_switch_forces_load_off_and_reports_once() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.stable();
    hw.switches = 0b1110_1111;

    let report = app.decide(&mut hw, &mut sink);
    assert!(report.switch_forced);
    assert!(!app.loads()[3].connected);
    assert!(sink
        .events
        .contains(&AppEvent::SwitchForcedOff { connected: 7 }));

    // Same mask again: nothing new.
    sink.clear();
    let report = app.decide(&mut hw, &mut sink);
    assert!(!report.switch_forced);
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SwitchForcedOff { .. })));
}

#[test]
fn re_enabled_switch_reconnects_only_through_the_ladder() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.stable();
    hw.switches = 0b1111_1110;
    app.decide(&mut hw, &mut sink);
    hw.switches = 0xFF;
    app.decide(&mut hw, &mut sink);
    assert!(!app.loads()[7].connected);

    run(&mut app, &mut hw, &mut sink, window() + 1);
    assert!(app.loads()[7].connected);
    assert_eq!(sink.reconnected(), vec![7]);
}

// ── Maintenance ──────────────────────────────────────────────

#[test]
fn maintenance_freezes_shedding_but_not_switches() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    hw.under_frequency();

    assert_eq!(run(&mut app, &mut hw, &mut sink, 100), 0);
    assert!(!app.engine().drop_timer_active());
    assert!(!app.engine().reconnect_timer_active());
    assert_eq!(app.engine().loads().connected_count(), 8);

    hw.switches = 0b0111_1111;
    let report = app.decide(&mut hw, &mut sink);
    assert!(report.switch_forced);
    assert_eq!(report.unstable, None);
    assert!(!app.loads()[0].connected);
}

#[test]
fn leaving_maintenance_resumes_control() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    hw.under_frequency();
    run(&mut app, &mut hw, &mut sink, 10);

    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    app.decide(&mut hw, &mut sink);
    assert_eq!(sink.shed(), vec![0]);
}

// ── Outputs ──────────────────────────────────────────────────

#[test]
fn led_frames_track_loads_and_blank_green_in_maintenance() {
    let (mut app, mut hw, mut sink) = make_app();

    app.refresh_outputs(&mut hw);
    assert_eq!(hw.last_frame(), Some(LedFrame { red: 0xFF, green: 0x00 }));

    hw.under_frequency();
    app.decide(&mut hw, &mut sink);
    app.refresh_outputs(&mut hw);
    assert_eq!(hw.last_frame(), Some(LedFrame { red: 0x7F, green: 0x80 }));

    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    app.refresh_outputs(&mut hw);
    assert_eq!(hw.last_frame(), Some(LedFrame { red: 0x7F, green: 0x00 }));
}

#[test]
fn status_report_carries_live_measurement() {
    let (app, mut hw, mut sink) = make_app();
    hw.set_sample(49.9, -0.4);
    app.report_status(&hw, &mut sink);

    match sink.events.last() {
        Some(AppEvent::Status(s)) => {
            assert_eq!(s.frequency.frequency_hz, 49.9);
            assert_eq!(s.frequency.roc_hz_per_sec, -0.4);
            assert_eq!(s.connected_loads, 8);
            assert!(!s.maintenance);
        }
        other => panic!("expected a status event, got {:?}", other),
    }
}

#[test]
fn status_report_carries_cycle_count_and_load_table() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.under_frequency();
    hw.switches = 0b1111_1110;
    run(&mut app, &mut hw, &mut sink, 3);
    app.report_status(&hw, &mut sink);

    match sink.events.last() {
        Some(AppEvent::Status(s)) => {
            assert_eq!(s.cycles, 3);
            assert_eq!(s.cycles, app.cycle_count());
            assert_eq!(s.loads, app.loads());
            // Load 0 shed by the ladder, load 7 forced off by its switch.
            assert!(!s.loads[0].connected && s.loads[0].switch_enabled);
            assert!(!s.loads[7].connected && !s.loads[7].switch_enabled);
            assert_eq!(s.connected_loads, 6);
        }
        other => panic!("expected a status event, got {:?}", other),
    }
}
