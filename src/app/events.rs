//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. The stock
//! adapter writes them to the serial log; tests record them.

use crate::config::Season;
use crate::fsm::StateId;
use crate::fsm::context::LevelVector;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The frost latch engaged at the given reading.
    FrostDetected { temp_c: i32 },

    /// The frost latch released at the given reading.
    FrostCleared { temp_c: i32 },

    /// The season mode flipped.
    SeasonChanged(Season),

    /// The temperature sensor stopped answering; control is stalled.
    SensorLost,

    /// The temperature sensor answered again after a stall.
    SensorRestored,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub state: StateId,
    pub season: Season,
    pub levels: LevelVector,
    pub skim_active: bool,
    pub temperature_c: Option<i32>,
    pub frost: bool,
    pub relay_on: bool,
    pub run_on_ticks: u16,
    pub uptime_ticks: u64,
}
