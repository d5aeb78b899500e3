//! Run-on countdown behaviour: arming triggers, tail expiry, re-arm,
//! and interaction with the frost interlock and sensor stalls.

use cisterna::app::service::ControlService;
use cisterna::config::SystemConfig;
use cisterna::fsm::StateId;

use super::mock_hw::{HwCall, LogSink, MockHardware};

fn make_service(config: SystemConfig) -> (ControlService, MockHardware, LogSink) {
    let mut service = ControlService::new(config);
    let hw = MockHardware::new();
    let mut sink = LogSink::new();
    service.start(&mut sink);
    (service, hw, sink)
}

#[test]
fn top_probe_in_summer_arms_and_times_out() {
    let config = SystemConfig::default();
    let duration = config.run_on_duration_secs;
    let (mut service, mut hw, mut sink) = make_service(config);

    // Scenario: only the top probe wet, summer mode.
    hw.set_levels(0b10000);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.relay_on());
    assert!(hw.timer_armed());
    assert!(hw.calls.contains(&HwCall::ArmTimer));

    // Water drops below the threshold; the tail starts counting.
    hw.set_levels(0);
    let _ = service.tick(&mut hw, &mut sink);

    for tick in 1..=duration {
        service.on_countdown_tick(&mut hw, &mut sink);
        assert!(hw.relay_on(), "relay must stay on at tick {tick}");
    }

    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(!hw.relay_on(), "tail elapsed, pump off");
    assert!(!hw.timer_armed(), "tick source disarmed on expiry");
    assert_eq!(service.state(), StateId::Standby);
    assert!(hw.calls.contains(&HwCall::DisarmTimer));
}

#[test]
fn skim_switch_arms_regardless_of_level() {
    let (mut service, mut hw, mut sink) = make_service(SystemConfig::default());

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.relay_on());
}

#[test]
fn rearm_before_expiry_resets_the_countdown() {
    let config = SystemConfig::default();
    let duration = config.run_on_duration_secs;
    let (mut service, mut hw, mut sink) = make_service(config);

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    hw.set_skim(false);
    let _ = service.tick(&mut hw, &mut sink);

    for _ in 0..3 {
        service.on_countdown_tick(&mut hw, &mut sink);
    }
    assert_eq!(service.run_on_ticks(), 3);

    // Fresh demand re-arms: not an error, just a reset.
    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.run_on_ticks(), 0);
    hw.set_skim(false);
    let _ = service.tick(&mut hw, &mut sink);

    // The extended window runs its full course again.
    for _ in 1..=duration {
        service.on_countdown_tick(&mut hw, &mut sink);
        assert!(hw.relay_on());
    }
    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(!hw.relay_on());
    assert_eq!(service.state(), StateId::Standby);
}

#[test]
fn drain_tail_arms_after_manual_pumping() {
    let (mut service, mut hw, mut sink) = make_service(SystemConfig::default());

    // Water at the stop probe; operator holds ON.
    hw.set_levels(0b00011);
    hw.press(true, false);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::Standby);
    assert!(hw.relay_on());

    // The cistern drains below the stop probe: tail arms.
    hw.set_levels(0);
    hw.press(false, false);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);
    assert!(hw.timer_armed());

    // An empty cistern must not extend its own tail.
    let duration = service.current_config().run_on_duration_secs;
    for _ in 1..=duration {
        service.on_countdown_tick(&mut hw, &mut sink);
        let _ = service.tick(&mut hw, &mut sink);
    }
    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(!hw.relay_on(), "dry cistern, tail over, pump off");
    assert_eq!(service.state(), StateId::Standby);
}

#[test]
fn frost_mid_countdown_kills_relay_immediately() {
    let (mut service, mut hw, mut sink) = make_service(SystemConfig::default());

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    hw.set_skim(false);
    let _ = service.tick(&mut hw, &mut sink);

    service.on_countdown_tick(&mut hw, &mut sink);
    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(hw.relay_on());

    // Frost strikes mid-countdown.
    hw.set_temp(0);
    let _ = service.tick(&mut hw, &mut sink);
    assert!(!hw.relay_on(), "frost overrides the remaining countdown");
    assert!(!hw.timer_armed());
    assert_eq!(service.state(), StateId::FrostLock);
    assert_eq!(service.run_on_ticks(), 0);
}

#[test]
fn countdown_still_ticks_during_sensor_stall() {
    let config = SystemConfig::default();
    let duration = config.run_on_duration_secs;
    let (mut service, mut hw, mut sink) = make_service(config);

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    hw.set_skim(false);
    let _ = service.tick(&mut hw, &mut sink);
    assert_eq!(service.state(), StateId::RunOn);

    // The temperature sensor dies while the tail is counting. The
    // hardware timer is not discretionary control and keeps firing.
    hw.disconnect_temp();
    for _ in 0..=duration {
        let _ = service.tick(&mut hw, &mut sink);
        service.on_countdown_tick(&mut hw, &mut sink);
    }
    assert!(!hw.relay_on(), "tail must still expire during a stall");
    assert_eq!(service.state(), StateId::Standby);
}

#[test]
fn shorter_configured_tail_expires_sooner() {
    let config = SystemConfig {
        run_on_duration_secs: 2,
        ..SystemConfig::default()
    };
    let (mut service, mut hw, mut sink) = make_service(config);

    hw.set_skim(true);
    let _ = service.tick(&mut hw, &mut sink);
    hw.set_skim(false);
    let _ = service.tick(&mut hw, &mut sink);

    service.on_countdown_tick(&mut hw, &mut sink);
    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(hw.relay_on());
    service.on_countdown_tick(&mut hw, &mut sink);
    assert!(!hw.relay_on());
    assert_eq!(service.state(), StateId::Standby);
}
