//! Integration tests for the request → queue → scheduler → radio pipeline.
//!
//! Time is driven by hand-picked tick timestamps, so whole travel windows
//! elapse instantly and deterministically.

use crate::mock_hw::{CollectingSink, WireLog};

use rollermote::app::commands::Request;
use rollermote::app::events::AppEvent;
use rollermote::config::SystemConfig;
use rollermote::control::{CommandKind, Device, ShutterController};
use rollermote::radio::Instruction;

fn make_controller() -> (ShutterController, WireLog, CollectingSink) {
    (
        ShutterController::new(&SystemConfig::default()),
        WireLog::new(),
        CollectingSink::new(),
    )
}

fn relative(c: &mut ShutterController, sink: &mut CollectingSink, payload: &str) {
    c.handle_request(&Request::Relative(payload.into()), sink);
}

fn absolute(c: &mut ShutterController, sink: &mut CollectingSink, device: &str, position: &str) {
    c.handle_request(
        &Request::Absolute {
            device: device.into(),
            position: position.into(),
        },
        sink,
    );
}

// ── Relative flow ─────────────────────────────────────────────

#[test]
fn relative_up_goes_on_air_next_tick() {
    let (mut c, mut radio, mut sink) = make_controller();
    relative(&mut c, &mut sink, "3,up");

    c.execute(0, &mut radio, &mut sink);

    // Living door is address 0x04.
    assert_eq!(radio.sent, vec![(0x04, Instruction::Up)]);
}

#[test]
fn relative_completion_does_not_touch_the_estimate() {
    let (mut c, mut radio, mut sink) = make_controller();
    relative(&mut c, &mut sink, "0,down");

    c.execute(0, &mut radio, &mut sink);
    // Bedroom window time_down = 26.1 s.
    c.execute(26_100, &mut radio, &mut sink);

    let s = c.shutter(Device::BedroomWindow).unwrap();
    assert_eq!(s.queue_len(), 0);
    assert!(!s.is_calibrated());
    assert_eq!(s.position(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PositionUpdated { .. })),
        0
    );
}

#[test]
fn user_stop_preempts_a_running_move() {
    let (mut c, mut radio, mut sink) = make_controller();
    relative(&mut c, &mut sink, "2,down");
    c.execute(0, &mut radio, &mut sink);

    // Mid-travel the user hits stop: queue is flushed, a stop is queued
    // and goes out on the very next tick.
    relative(&mut c, &mut sink, "2,stop");
    c.execute(5_000, &mut radio, &mut sink);

    assert_eq!(
        radio.sent,
        vec![(0x03, Instruction::Down), (0x03, Instruction::Stop)]
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::QueueCleared { .. })),
        1
    );

    // The stop drains on the following tick and the drive goes idle.
    c.execute(5_020, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::LivingWindow).unwrap().queue_len(), 0);
}

// ── Calibration flow ──────────────────────────────────────────

#[test]
fn calibration_drives_up_for_the_full_range() {
    let (mut c, mut radio, mut sink) = make_controller();
    c.handle_request(&Request::Calibrate("3".into()), &mut sink);

    c.execute(1_000, &mut radio, &mut sink);
    assert_eq!(radio.sent, vec![(0x04, Instruction::Up)]);

    // Living door time_up = 26.1 s; one tick before the window closes
    // nothing happens.
    c.execute(1_000 + 26_099, &mut radio, &mut sink);
    assert!(!c.shutter(Device::LivingDoor).unwrap().is_calibrated());

    c.execute(1_000 + 26_100, &mut radio, &mut sink);
    let s = c.shutter(Device::LivingDoor).unwrap();
    assert!(s.is_calibrated());
    assert_eq!(s.position(), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Calibrated { .. })), 1);
}

// ── Absolute flow ─────────────────────────────────────────────

#[test]
fn absolute_full_travel_from_top_to_bottom() {
    let (mut c, mut radio, mut sink) = make_controller();
    absolute(&mut c, &mut sink, "living_room_door", "100");

    // Uncalibrated: calibration goes first.
    c.execute(0, &mut radio, &mut sink); // calibrate sends UP
    c.execute(26_100, &mut radio, &mut sink); // calibrate completes
    c.execute(26_120, &mut radio, &mut sink); // absolute resolves DOWN, silent
    c.execute(26_140, &mut radio, &mut sink); // absolute sends DOWN

    assert_eq!(
        radio.sent,
        vec![(0x04, Instruction::Up), (0x04, Instruction::Down)]
    );

    // Full range down = 24.76 s from the send tick.
    let end = 26_140 + 24_760;
    c.execute(end - 20, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::LivingDoor).unwrap().position(), 0);

    c.execute(end, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::LivingDoor).unwrap().position(), 100);

    // The synthetic stop physically halts the motor on the next ticks.
    c.execute(end + 20, &mut radio, &mut sink);
    assert_eq!(radio.last(), Some(&(0x04, Instruction::Stop)));
    c.execute(end + 40, &mut radio, &mut sink);

    let s = c.shutter(Device::LivingDoor).unwrap();
    assert_eq!(s.queue_len(), 0);
    assert_eq!(s.position(), 100);
}

#[test]
fn absolute_partial_move_scales_the_window() {
    let (mut c, mut radio, mut sink) = make_controller();

    // Calibrate first so the absolute is queued alone.
    c.handle_request(&Request::Calibrate("1".into()), &mut sink);
    c.execute(0, &mut radio, &mut sink);
    c.execute(26_457, &mut radio, &mut sink);

    absolute(&mut c, &mut sink, "bedroom_door", "40");
    c.execute(30_000, &mut radio, &mut sink); // resolve
    c.execute(30_020, &mut radio, &mut sink); // send DOWN

    // 40% of bedroom door's 25.06 s down travel.
    let travel = (0.4_f64 * 25.06 * 1000.0).round() as u64;
    c.execute(30_020 + travel - 1, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::BedroomDoor).unwrap().position(), 0);

    c.execute(30_020 + travel, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::BedroomDoor).unwrap().position(), 40);
}

#[test]
fn absolute_upward_move_uses_the_up_travel_time() {
    let (mut c, mut radio, mut sink) = make_controller();
    c.handle_request(&Request::Calibrate("0".into()), &mut sink);
    c.execute(0, &mut radio, &mut sink);
    c.execute(26_695, &mut radio, &mut sink);

    // Down to 80 first.
    absolute(&mut c, &mut sink, "bedroom_window", "80");
    c.execute(27_000, &mut radio, &mut sink);
    c.execute(27_020, &mut radio, &mut sink);
    let down_travel = (0.8_f64 * 26.1 * 1000.0).round() as u64;
    c.execute(27_020 + down_travel, &mut radio, &mut sink);
    // Drain the trailing stop.
    c.execute(27_020 + down_travel + 20, &mut radio, &mut sink);
    c.execute(27_020 + down_travel + 40, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::BedroomWindow).unwrap().position(), 80);

    // Then up to 30: delta -50, up table (26.695 s full range).
    let t0 = 60_000;
    absolute(&mut c, &mut sink, "bedroom_window", "30");
    c.execute(t0, &mut radio, &mut sink);
    c.execute(t0 + 20, &mut radio, &mut sink);
    assert_eq!(radio.last(), Some(&(0x01, Instruction::Up)));

    let up_travel = (0.5_f64 * 26.695 * 1000.0).round() as u64;
    c.execute(t0 + 20 + up_travel, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::BedroomWindow).unwrap().position(), 30);
}

#[test]
fn absolute_enqueues_exactly_one_calibration_when_uncalibrated() {
    let (mut c, _radio, mut sink) = make_controller();
    absolute(&mut c, &mut sink, "bedroom_door", "70");

    let s = c.shutter(Device::BedroomDoor).unwrap();
    assert_eq!(s.queue_len(), 2);
    assert_eq!(s.head().unwrap().kind(), CommandKind::Calibrate);
    assert_eq!(s.queued(1).unwrap().kind(), CommandKind::Absolute);
}

// ── Multiplexing ──────────────────────────────────────────────

#[test]
fn drives_travel_concurrently_on_one_thread() {
    let (mut c, mut radio, mut sink) = make_controller();
    relative(&mut c, &mut sink, "0,down");
    relative(&mut c, &mut sink, "3,down");

    c.execute(0, &mut radio, &mut sink);
    assert_eq!(radio.sent.len(), 2);

    // Living door (24.76 s) finishes before bedroom window (26.1 s).
    c.execute(24_760, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::LivingDoor).unwrap().queue_len(), 0);
    assert_eq!(c.shutter(Device::BedroomWindow).unwrap().queue_len(), 1);

    c.execute(26_100, &mut radio, &mut sink);
    assert_eq!(c.shutter(Device::BedroomWindow).unwrap().queue_len(), 0);
}

#[test]
fn malformed_requests_produce_no_traffic() {
    let (mut c, mut radio, mut sink) = make_controller();
    relative(&mut c, &mut sink, "xup");
    relative(&mut c, &mut sink, "9,down");
    relative(&mut c, &mut sink, "1,skyward");
    absolute(&mut c, &mut sink, "garage", "50");
    c.handle_request(&Request::Calibrate("7".into()), &mut sink);

    for _ in 0..10 {
        c.execute(0, &mut radio, &mut sink);
    }

    assert!(radio.sent.is_empty());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::RequestDropped { .. })),
        5
    );
}

#[test]
fn status_snapshot_reflects_the_drives() {
    let (mut c, mut radio, mut sink) = make_controller();
    c.handle_request(&Request::Calibrate("2".into()), &mut sink);
    c.execute(0, &mut radio, &mut sink);
    c.execute(24_500, &mut radio, &mut sink);
    relative(&mut c, &mut sink, "2,down");

    let snapshot = c.status();
    let living_window = snapshot.drives[Device::LivingWindow.index().unwrap()];
    assert!(living_window.calibrated);
    assert_eq!(living_window.position, 0);
    assert_eq!(living_window.queue_len, 1);

    let bedroom_door = snapshot.drives[Device::BedroomDoor.index().unwrap()];
    assert!(!bedroom_door.calibrated);
    assert_eq!(bedroom_door.queue_len, 0);
}
