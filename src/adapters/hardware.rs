//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the sensor hub, the pushbutton pair, and the relay driver, and
//! exposes them through [`SensorPort`], [`ActuatorPort`] and
//! [`RunOnTimerPort`]. On non-espidf targets the underlying drivers use
//! cfg-gated simulation stubs, so the adapter itself is host-testable.

use crate::app::ports::{ActuatorPort, RunOnTimerPort, SensorPort};
use crate::drivers::button::ButtonPair;
use crate::drivers::hw_timer;
use crate::drivers::relay::RelayDriver;
use crate::fsm::context::SensorSnapshot;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensors: SensorHub,
    buttons: ButtonPair,
    relay: RelayDriver,
}

impl HardwareAdapter {
    pub fn new(sensors: SensorHub, buttons: ButtonPair, relay: RelayDriver) -> Self {
        Self {
            sensors,
            buttons,
            relay,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        let mut snapshot = self.sensors.read_all();
        let (on_pressed, off_pressed) = self.buttons.read();
        snapshot.on_pressed = on_pressed;
        snapshot.off_pressed = off_pressed;
        snapshot
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, on: bool) {
        self.relay.set(on);
    }
}

// ── RunOnTimerPort implementation ─────────────────────────────

impl RunOnTimerPort for HardwareAdapter {
    fn arm(&mut self) {
        hw_timer::arm();
    }

    fn disarm(&mut self) {
        hw_timer::disarm();
    }

    fn is_armed(&self) -> bool {
        hw_timer::is_armed()
    }
}
