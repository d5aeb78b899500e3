//! Inbound commands to the control service.
//!
//! These represent the actions the pushbutton panel can request; the
//! service synthesizes them from the polled button states, and tests
//! drive the same entry point directly.

/// Commands the outside world can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Energise the relay (green button held).
    ManualOn,
    /// De-energise the relay and cancel a running countdown (red button).
    ManualOff,
    /// Flip the season mode (both buttons together). Forces the relay
    /// off first.
    ToggleSeason,
}
