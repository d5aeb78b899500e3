//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every input driver and produces a
//! [`SensorSnapshot`](crate::fsm::context::SensorSnapshot) each polling
//! iteration; the hardware adapter merges in the pushbutton states
//! before handing the snapshot to the service.

pub mod level;
pub mod skim;
pub mod temperature;

use crate::fsm::context::SensorSnapshot;
use level::LevelProbes;
use skim::SkimSwitch;
use temperature::TemperatureSensor;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub levels: LevelProbes,
    pub skim: SkimSwitch,
    pub temperature: TemperatureSensor,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(levels: LevelProbes, skim: SkimSwitch, temperature: TemperatureSensor) -> Self {
        Self {
            levels,
            skim,
            temperature,
        }
    }

    /// Read every sensor. The temperature degrades to `None` when the
    /// sensor is missing; what to do about that is the service's call.
    pub fn read_all(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            levels: self.levels.read(),
            skim_active: self.skim.read(),
            on_pressed: false,
            off_pressed: false,
            temperature_c: self.temperature.read().ok(),
        }
    }
}
