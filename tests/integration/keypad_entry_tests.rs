//! Integration tests for maintenance-mode threshold entry.
//!
//! Scan codes are fed the way the keypad bridge delivers them: make code,
//! then `F0` + make code on release; keypad Enter is `E0 5A`.

use crate::mock_hw::{MockBoard, RecordingSink};

use lcfr::app::commands::AppCommand;
use lcfr::app::events::AppEvent;
use lcfr::app::service::RelayService;
use lcfr::config::RelayConfig;
use lcfr::keypad::{PS2_BREAK, PS2_DECIMAL, PS2_DIGITS, PS2_ENTER, PS2_EXTENDED};

fn scan_codes(text: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    for c in text.chars() {
        let code = match c {
            '.' => PS2_DECIMAL,
            d => PS2_DIGITS[d.to_digit(10).expect("digit") as usize],
        };
        bytes.extend([code, PS2_BREAK, code]);
    }
    bytes.extend([PS2_EXTENDED, PS2_ENTER, PS2_EXTENDED, PS2_BREAK, PS2_ENTER]);
    bytes
}

fn maintenance_app() -> (RelayService, RecordingSink) {
    let mut app = RelayService::new(&RelayConfig::default());
    let mut sink = RecordingSink::new();
    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    sink.clear();
    (app, sink)
}

#[test]
fn two_entries_set_both_thresholds() {
    let (mut app, mut sink) = maintenance_app();

    app.feed_keypad(scan_codes("49.25"), &mut sink);
    app.feed_keypad(scan_codes("4"), &mut sink);

    let t = app.thresholds();
    assert_eq!(t.min_frequency_hz, 49.25);
    assert_eq!(t.max_roc_hz_per_sec, 4.0);
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ThresholdsChanged(_)))
            .count(),
        2
    );
}

#[test]
fn third_entry_wraps_to_minimum_frequency() {
    let (mut app, mut sink) = maintenance_app();
    for text in ["49", "5", "48.75"] {
        app.feed_keypad(scan_codes(text), &mut sink);
    }
    assert_eq!(app.thresholds().min_frequency_hz, 48.75);
    assert_eq!(app.thresholds().max_roc_hz_per_sec, 5.0);
}

#[test]
fn bytes_arrive_one_command_at_a_time() {
    let (mut app, mut sink) = maintenance_app();
    for byte in scan_codes("47.5") {
        app.handle_command(AppCommand::KeypadByte(byte), &mut sink);
    }
    assert_eq!(app.thresholds().min_frequency_hz, 47.5);
}

#[test]
fn typing_outside_maintenance_changes_nothing() {
    let mut app = RelayService::new(&RelayConfig::default());
    let mut sink = RecordingSink::new();

    app.feed_keypad(scan_codes("40"), &mut sink);
    assert_eq!(app.thresholds().min_frequency_hz, 48.5);
    assert_eq!(app.pending_entry(), "");

    // The discarded entry did not advance the min/max alternation.
    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    app.feed_keypad(scan_codes("49"), &mut sink);
    assert_eq!(app.thresholds().min_frequency_hz, 49.0);
}

#[test]
fn new_thresholds_apply_once_maintenance_ends() {
    let (mut app, mut sink) = maintenance_app();
    let mut hw = MockBoard::new();
    hw.set_sample(49.5, 0.0);

    app.feed_keypad(scan_codes("49.8"), &mut sink);
    assert_eq!(app.decide(&mut hw, &mut sink).unstable, None);

    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    assert_eq!(app.decide(&mut hw, &mut sink).unstable, Some(true));
}

#[test]
fn bare_enter_commits_zero() {
    let (mut app, mut sink) = maintenance_app();
    app.feed_keypad([PS2_EXTENDED, PS2_ENTER], &mut sink);
    assert_eq!(app.thresholds().min_frequency_hz, 0.0);
}

#[test]
fn status_reports_pause_during_entry() {
    let (mut app, mut sink) = maintenance_app();
    let hw = MockBoard::new();
    app.report_status(&hw, &mut sink);
    assert_eq!(sink.status_count(), 0);

    app.handle_command(AppCommand::ToggleMaintenance, &mut sink);
    app.report_status(&hw, &mut sink);
    assert_eq!(sink.status_count(), 1);
}
