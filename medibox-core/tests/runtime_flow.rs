//! End-to-end runs of the runtime tick against host fakes.

mod common;

use common::{runtime, DrawCall, FakeClock, RecordingRenderer};
use medibox_core::config::LinkConfig;
use medibox_core::state::ScreenState;
use medibox_core::touch::layout::{HOME_REMINDERS, LEFT_BUTTON, OK_BUTTON, RIGHT_BUTTON};
use medibox_core::touch::TouchAction;
use medibox_core::ui::DrawMode;
use medibox_core::{DisplayConfig, Runtime};
use medibox_hal::RawPoint;
use medibox_protocol::LinkMode;

#[test]
fn confirmation_times_out_once_and_returns_home() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut().push_frame(
        r#"{"type":"confirmation_request","confirmation_type":"medication","timeout_seconds":60}"#,
    );
    rt.tick(&mut renderer);
    assert_eq!(rt.controller().current_screen(), ScreenState::TakeMedicine);

    clock.advance(59_999);
    rt.tick(&mut renderer);
    assert!(rt.serial_mut().take_sent().is_empty());
    assert_eq!(rt.controller().current_screen(), ScreenState::TakeMedicine);

    clock.advance(1);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.sent, 1);
    assert_eq!(
        rt.serial_mut().take_sent(),
        vec![
            r#"{"type":"confirmation_response","confirmed":false,"timeout":true,"confirmation_type":"medication"}"#
                .to_string()
        ]
    );
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);

    clock.advance(120_000);
    rt.tick(&mut renderer);
    assert!(rt.serial_mut().take_sent().is_empty());
}

#[test]
fn countdown_is_redrawn_partially() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut()
        .push_frame(r#"{"type":"confirmation_request","timeout_seconds":10}"#);
    rt.tick(&mut renderer);
    renderer.take();

    clock.advance(1_000);
    let report = rt.tick(&mut renderer);
    match report.draw {
        Some(DrawMode::Partial(regions)) => assert!(regions.countdown),
        other => panic!("expected partial redraw, got {:?}", other),
    }
    assert_eq!(renderer.clears(), 0);
}

#[test]
fn oversized_sync_keeps_capacity() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    let containers: Vec<String> = (1..=12)
        .map(|id| format!(r#"{{"id":{id},"medicine_name":"Med {id}","current_capacity":5,"max_capacity":30}}"#))
        .collect();
    let json = format!(
        r#"{{"type":"sync_all_data","containers":[{}]}}"#,
        containers.join(",")
    );
    rt.serial_mut().push_frame(&json);

    let report = rt.tick(&mut renderer);
    assert_eq!(report.messages, 1);
    let stored = &rt.controller().device().containers;
    assert_eq!(stored.len(), 10);
    assert_eq!(stored.as_slice()[9].id, 10);
}

#[test]
fn dispensing_flow_reaches_quantity_confirmation() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();
    rt.tick(&mut renderer);

    rt.serial_mut()
        .push_frame(r#"{"type":"dispensing_status","status":"started","total":2}"#);
    rt.tick(&mut renderer);
    assert_eq!(rt.controller().current_screen(), ScreenState::Dispensing);
    assert!(!rt.controller().device().dispensing.complete);

    rt.serial_mut()
        .push_frame(r#"{"type":"dispensing_status","status":"completed","current":2,"total":2}"#);
    rt.tick(&mut renderer);
    assert_eq!(rt.controller().current_screen(), ScreenState::Dispensing);
    assert!(rt.controller().device().dispensing.complete);

    rt.serial_mut()
        .push_frame(r#"{"type":"all_dispensing_completed","total_dispensed":2}"#);
    rt.tick(&mut renderer);
    assert_eq!(
        rt.controller().current_screen(),
        ScreenState::QuantityConfirmation
    );
    assert_eq!(rt.controller().screen().transition_count(), 2);

    rt.touch_mut().press(LEFT_BUTTON);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.touch, Some(TouchAction::QuantityYes));
    assert!(report.debounce());
    assert_eq!(
        rt.serial_mut().take_sent(),
        vec![r#"{"type":"quantity_confirmed","confirmed":true}"#.to_string()]
    );
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);
}

#[test]
fn failed_dispense_can_be_acknowledged() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut()
        .push_frame(r#"{"type":"dispensing_status","status":"started","total":1}"#);
    rt.tick(&mut renderer);
    rt.touch_mut().press(OK_BUTTON);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.touch, None);
    assert_eq!(rt.controller().current_screen(), ScreenState::Dispensing);

    rt.serial_mut()
        .push_frame(r#"{"type":"dispensing_status","status":"failed","message":"Motor stalled"}"#);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.draw, Some(DrawMode::Full));
    assert_eq!(rt.controller().current_screen(), ScreenState::Dispensing);

    rt.touch_mut().press(OK_BUTTON);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.touch, Some(TouchAction::DispensingOk));
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);
    assert!(rt.serial_mut().take_sent().is_empty());
}

#[test]
fn control_id_is_echoed_intact() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut().push_frame(
        r#"{"type":"confirmation_request","confirmation_type":"device_control","control":{"control_id":"3f2b9c1e-8a7d-4e21-b5c6-0d9e8f7a6b5c","action":"dispense"}}"#,
    );
    rt.tick(&mut renderer);
    assert_eq!(
        rt.controller().current_screen(),
        ScreenState::ControlQueueConfirmation
    );

    rt.touch_mut().press(RIGHT_BUTTON);
    rt.tick(&mut renderer);
    assert_eq!(
        rt.serial_mut().take_sent(),
        vec![
            r#"{"type":"confirmation_response","confirmed":false,"confirmation_type":"device_control","control_id":"3f2b9c1e-8a7d-4e21-b5c6-0d9e8f7a6b5c"}"#
                .to_string()
        ]
    );
}

#[test]
fn oversized_control_id_is_not_truncated() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    let id = "a".repeat(80);
    rt.serial_mut().push_frame(&format!(
        r#"{{"type":"confirmation_request","confirmation_type":"device_control","control":{{"control_id":"{id}"}}}}"#
    ));
    rt.tick(&mut renderer);

    rt.touch_mut().press(LEFT_BUTTON);
    rt.tick(&mut renderer);
    assert_eq!(
        rt.serial_mut().take_sent(),
        vec![
            r#"{"type":"confirmation_response","confirmed":true,"confirmation_type":"device_control"}"#
                .to_string()
        ]
    );
}

#[test]
fn touch_on_right_edge_is_ignored() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();
    assert_eq!(HOME_REMINDERS.right(), 105);

    // Maps to x == 105, y == 205
    rt.touch_mut().presses.push_back(RawPoint::new(2618, 725));
    let report = rt.tick(&mut renderer);
    assert_eq!(report.touch, None);
    assert!(!report.debounce());
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);

    // Maps to x == 104
    rt.touch_mut().presses.push_back(RawPoint::new(2630, 725));
    let report = rt.tick(&mut renderer);
    assert_eq!(report.touch, Some(TouchAction::ShowReminders));
    assert_eq!(rt.controller().current_screen(), ScreenState::Reminders);
}

#[test]
fn repeated_status_is_idempotent() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();
    assert_eq!(rt.tick(&mut renderer).draw, Some(DrawMode::Full));

    let status = r#"{"type":"system_status","wifi_connected":true,"mqtt_connected":true,"time":"08:30"}"#;
    rt.serial_mut().push_frame(status);
    match rt.tick(&mut renderer).draw {
        Some(DrawMode::Partial(regions)) => {
            assert!(regions.time && regions.connectivity);
        }
        other => panic!("expected partial redraw, got {:?}", other),
    }
    let device_after_first = rt.controller().device().clone();

    rt.serial_mut().push_frame(status);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.messages, 1);
    assert_eq!(report.draw, Some(DrawMode::Idle));
    assert_eq!(rt.controller().device(), &device_after_first);
    assert_eq!(rt.controller().screen().transition_count(), 0);
    assert_eq!(renderer.clears(), 1);
}

#[test]
fn frame_is_found_in_line_noise() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut().push_bytes(&[0x01, 0xFF, 0x42, 0x00, 0x13]);
    rt.serial_mut()
        .push_frame(r#"{"type":"jam_alert","container_number":3}"#);
    rt.serial_mut().push_bytes(&[0x55, 0xAA]);

    let report = rt.tick(&mut renderer);
    assert_eq!(report.messages, 1);
    assert_eq!(report.dropped, 0);
    assert_eq!(rt.controller().current_screen(), ScreenState::JamAlert);
    assert_eq!(rt.controller().device().jam.container_number, 3);
}

#[test]
fn bad_payload_is_dropped_without_state_change() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut().push_frame(r#"{"type":"alarm_status","active":"#);
    rt.serial_mut().push_frame(r#"{"type":"firmware_update"}"#);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.messages, 1);
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);
}

#[test]
fn send_failure_is_counted_and_state_moves_on() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();
    rt.serial_mut().fail_writes = true;

    rt.serial_mut()
        .push_frame(r#"{"type":"confirmation_request","timeout_seconds":0}"#);
    let report = rt.tick(&mut renderer);
    assert_eq!(report.send_failures, 1);
    assert_eq!(report.sent, 0);
    assert_eq!(rt.controller().current_screen(), ScreenState::Home);
    assert!(!rt.controller().confirmations().is_armed());
}

#[test]
fn render_failure_forces_full_redraw() {
    let clock = FakeClock::default();
    let mut rt = runtime(&clock);
    let mut renderer = RecordingRenderer::default();
    rt.tick(&mut renderer);
    renderer.take();

    rt.serial_mut()
        .push_frame(r#"{"type":"wifi_error_alert","ssid":"home"}"#);
    renderer.fail_next = true;
    let report = rt.tick(&mut renderer);
    assert!(report.render_failed);
    assert_eq!(report.draw, None);

    let report = rt.tick(&mut renderer);
    assert_eq!(report.draw, Some(DrawMode::Full));
    assert_eq!(
        renderer.take(),
        vec![DrawCall::Clear, DrawCall::Screen(ScreenState::WifiError)]
    );
}

#[test]
fn line_mode_round_trip() {
    let clock = FakeClock::default();
    let config = DisplayConfig {
        link: LinkConfig {
            mode: LinkMode::Lines,
            ..LinkConfig::DEFAULT
        },
        ..DisplayConfig::DEFAULT
    };
    let mut rt = Runtime::new(
        config,
        common::FakeSerial::default(),
        common::FakeTouch::default(),
        &clock,
    );
    let mut renderer = RecordingRenderer::default();

    rt.serial_mut()
        .push_bytes(b"{\"type\":\"jam_alert\",\"container_number\":2}\r\n");
    rt.tick(&mut renderer);
    assert_eq!(rt.controller().current_screen(), ScreenState::JamAlert);

    rt.touch_mut().press(medibox_core::touch::layout::WIDE_BUTTON);
    rt.tick(&mut renderer);
    let written = std::mem::take(&mut rt.serial_mut().tx);
    assert_eq!(
        written,
        b"{\"type\":\"jam_cleared\",\"container_number\":2}\n".to_vec()
    );
}
