//! Shared mutable context threaded through every FSM handler.
//!
//! `ControlContext` is the single struct that state handlers read from
//! and write to: the latest input snapshot, actuator command outputs,
//! the season mode, the frost latch mirror, the run-on countdown, and
//! the configuration. There is exactly one instance for the lifetime of
//! the process, owned by the control service.

use crate::config::{PROBE_COUNT, Season, SystemConfig};

// ---------------------------------------------------------------------------
// Level vector
// ---------------------------------------------------------------------------

/// Water contact state of the conductive probes, lowest probe first.
/// Fully overwritten on every sensor read; never partially updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelVector(pub [bool; PROBE_COUNT]);

impl LevelVector {
    /// True if the probe at `index` currently detects water.
    pub fn wet(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Index of the highest probe currently under water.
    pub fn highest_wet(&self) -> Option<usize> {
        self.0.iter().rposition(|&w| w)
    }
}

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every input in the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Conductive probe states.
    pub levels: LevelVector,
    /// Float (skimmer) switch: true = start pumping regardless of level.
    pub skim_active: bool,
    /// Green ON pushbutton currently held.
    pub on_pressed: bool,
    /// Red OFF pushbutton currently held.
    pub off_pressed: bool,
    /// Last temperature reading in whole degrees C; `None` while the
    /// sensor is disconnected.
    pub temperature_c: Option<i32>,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
/// The service applies these through the ports after every FSM tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Desired relay state (gated by the frost latch on application).
    pub relay_on: bool,
    /// Desired run-on tick source state.
    pub countdown_armed: bool,
}

impl ActuatorCommands {
    /// Relay off, countdown disarmed — safe default.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControlContext {
    /// Latest input snapshot. Updated before each FSM tick.
    pub sensors: SensorSnapshot,
    /// Actuator requests to be applied after the FSM tick.
    pub commands: ActuatorCommands,
    /// Active season; decides the arming probe.
    pub season: Season,
    /// Frost latch state, mirrored from the `FrostGuard` each tick.
    pub frost: bool,
    /// Run-on countdown, advanced once per second by the timer tick.
    pub run_on_ticks: u16,
    /// System configuration (tunable parameters).
    pub config: SystemConfig,
}

impl ControlContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            sensors: SensorSnapshot::default(),
            commands: ActuatorCommands::all_off(),
            season: Season::Summer,
            frost: false,
            run_on_ticks: 0,
            config,
        }
    }

    /// Probe index that arms the pump under the current season.
    pub fn start_probe(&self) -> usize {
        self.config.start_probe(self.season)
    }

    /// A condition that should (re)start the run-on window: water at the
    /// arming probe, or the skim switch demanding a pump-out.
    pub fn pump_demand(&self) -> bool {
        self.sensors.levels.wet(self.start_probe()) || self.sensors.skim_active
    }

    /// Manual-drain completion: the relay is commanded on and the water
    /// has dropped below the drain-stop probe. Arms the run-on tail so a
    /// manually started pump shuts itself off. Entry trigger only — it
    /// must not keep resetting an armed countdown, or an empty cistern
    /// would hold the pump on forever.
    pub fn drain_tail_due(&self) -> bool {
        self.commands.relay_on && !self.sensors.levels.wet(self.config.drain_stop_probe)
    }
}
