//! Frost interlock, mode toggle, manual buttons, and sensor-stall
//! behaviour of the control service.

use cisterna::app::service::{ControlService, TickOutcome};
use cisterna::config::{Season, SystemConfig};
use cisterna::display::{Cell, Presenter};
use cisterna::fsm::StateId;

use super::mock_hw::{LogSink, MockDisplay, MockHardware};
use cisterna::app::ports::DisplayPort;

fn make_service() -> (ControlService, MockHardware, LogSink) {
    let mut service = ControlService::new(SystemConfig::default());
    let hw = MockHardware::new();
    let mut sink = LogSink::new();
    service.start(&mut sink);
    (service, hw, sink)
}

// ── Frost interlock ───────────────────────────────────────────

#[test]
fn frost_below_threshold_forces_relay_off() {
    let (mut service, mut hw, mut sink) = make_service();

    // Pump running on a full cistern.
    hw.set_levels(0b10000);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(hw.relay_on());
    assert_eq!(service.state(), StateId::RunOn);

    // 1C is strictly below the 2C threshold.
    hw.set_temp(1);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!hw.relay_on(), "frost must force the relay off");
    assert!(!hw.timer_armed(), "frost must disarm the countdown");
    assert_eq!(service.state(), StateId::FrostLock);
    assert!(sink.contains("FrostDetected"));
}

#[test]
fn frost_above_threshold_clears_and_control_reverts() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.set_temp(0);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::FrostLock);

    hw.set_temp(3);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!service.is_frost_latched());
    assert_eq!(service.state(), StateId::Standby);
    assert!(sink.contains("FrostCleared"));

    // Level control works again.
    hw.set_levels(0b10000);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.relay_on());
}

#[test]
fn exact_threshold_reading_holds_the_latch() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.set_temp(2);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!service.is_frost_latched(), "2C must not latch from clear");

    hw.set_temp(1);
    let _ = service.tick(&mut hw, &mut sink);
    hw.set_temp(2);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(service.is_frost_latched(), "2C must not release the latch");
    assert!(!hw.relay_on());
}

#[test]
fn buttons_are_suppressed_under_frost() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.set_temp(-5);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::FrostLock);

    hw.press(true, false);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!hw.relay_on(), "manual on must not override the interlock");

    hw.press(true, true);
    let outcome = service.tick(&mut hw, &mut sink);
    assert_eq!(outcome, TickOutcome::Normal);
    assert_eq!(service.season(), Season::Summer, "no toggle under frost");
}

// ── Manual buttons and mode toggle ────────────────────────────

#[test]
fn manual_on_energises_relay_in_standby() {
    let (mut service, mut hw, mut sink) = make_service();

    // Water at the drain-stop probe, so no automatic trigger fires.
    hw.set_levels(0b00011);
    hw.press(true, false);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(hw.relay_on());
    assert_eq!(service.state(), StateId::Standby);

    // Relay stays latched after release.
    hw.press(false, false);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(hw.relay_on());
}

#[test]
fn manual_off_cancels_running_countdown() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    hw.set_skim(false);

    hw.press(false, true);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!hw.relay_on());
    assert!(!hw.timer_armed(), "manual off must disarm the tick source");
    assert_eq!(service.state(), StateId::Standby);
}

#[test]
fn both_buttons_toggle_season_and_threshold() {
    let (mut service, mut hw, mut sink) = make_service();
    let config = service.current_config();
    assert_eq!(service.season(), Season::Summer);

    hw.press(true, true);
    let outcome = service.tick(&mut hw, &mut sink);
    assert_eq!(outcome, TickOutcome::ModeToggled);
    assert!(!hw.relay_on(), "toggle must force the relay off");
    assert_eq!(service.season(), Season::Winter);
    assert_eq!(service.active_start_probe(), config.winter_start_probe);
    assert!(sink.contains("SeasonChanged"));

    hw.press(false, false);
    let _ = service.tick(&mut hw, &mut sink);

    hw.press(true, true);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.season(), Season::Summer, "even toggles restore");
    assert_eq!(service.active_start_probe(), config.summer_start_probe);
}

#[test]
fn winter_mode_arms_at_the_winter_probe() {
    let (mut service, mut hw, mut sink) = make_service();
    let config = service.current_config();

    // Water up to the winter probe arms nothing in summer.
    hw.set_levels(0b00111);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::Standby);
    assert!(!hw.relay_on());

    hw.press(true, true);
    let _ = service.tick(&mut hw, &mut sink);
    hw.press(false, false);
    assert_eq!(service.season(), Season::Winter);
    assert_eq!(service.active_start_probe(), config.winter_start_probe);

    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.relay_on());
}

// ── Sensor stall ──────────────────────────────────────────────

#[test]
fn disconnected_sensor_stalls_all_discretionary_control() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.disconnect_temp();
    hw.set_levels(0b10000);
    hw.press(true, true);

    for _ in 0..5 {
        let outcome = service.tick(&mut hw, &mut sink);
        assert_eq!(outcome, TickOutcome::SensorStall);
    }
    assert!(!hw.relay_on(), "no relay change during the stall");
    assert_eq!(service.season(), Season::Summer, "no mode change");
    assert_eq!(service.state(), StateId::Standby, "no state change");
    assert!(sink.contains("SensorLost"));

    // A valid reading ends the stall and control resumes.
    hw.set_temp(10);
    hw.press(false, false);
    let outcome = service.tick(&mut hw, &mut sink);
    assert_eq!(outcome, TickOutcome::Normal);
    assert!(sink.contains("SensorRestored"));
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.relay_on());
}

#[test]
fn stall_does_not_touch_the_frost_latch() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.set_temp(0);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(service.is_frost_latched());

    hw.disconnect_temp();
    for _ in 0..3 {
        let _ = service.tick(&mut hw, &mut sink);
    }
    assert!(service.is_frost_latched(), "no reading, no latch change");
    assert!(!hw.relay_on());

    hw.set_temp(5);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!service.is_frost_latched());
}

// ── Display path ──────────────────────────────────────────────

#[test]
fn rendered_frame_reaches_the_display_port() {
    let (mut service, mut hw, mut sink) = make_service();
    let mut display = MockDisplay::new();
    let mut presenter = Presenter::new();

    hw.set_levels(0b00001);
    hw.disconnect_temp();
    let _ = service.tick(&mut hw, &mut sink);
    display.draw(&presenter.render(&service.display_view()));

    let frame = display.last().expect("one frame drawn");
    // Placeholder temperature while the sensor is gone.
    assert_eq!(frame.cell(0, 11), Cell::Char(b'-'));
    // Lowest level bar is wet.
    assert_eq!(
        frame.cell(0, 1),
        Cell::Glyph(cisterna::display::Glyph::LevelFull)
    );
}
