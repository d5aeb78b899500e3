//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensors, relay, run-on timer, display, event sinks)
//! implement these traits. The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches
//! hardware directly.

use crate::display::Frame;
use crate::fsm::context::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain input data.
pub trait SensorPort {
    /// Read every input and return a unified snapshot.
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the pump relay — the single output this system
/// controls, and the single choke point every component routes through.
pub trait ActuatorPort {
    /// Set the relay. Implementations must be idempotent.
    fn set_relay(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Run-on timer port (domain → periodic tick source)
// ───────────────────────────────────────────────────────────────

/// Control over the 1 Hz run-on tick source.
pub trait RunOnTimerPort {
    /// Start the periodic tick source. Arming an armed timer is a no-op.
    fn arm(&mut self);

    /// Stop the tick source.
    fn disarm(&mut self);

    /// Whether the tick source is currently running.
    fn is_armed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Display port (domain view → character panel)
// ───────────────────────────────────────────────────────────────

/// Output port for the character display.
pub trait DisplayPort {
    /// Push a rendered frame to the panel.
    fn draw(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
