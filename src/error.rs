//! Error types for the cistern firmware.
//!
//! The control loop recognises exactly one runtime fault — the
//! temperature sensor going missing — and it never crosses a component
//! boundary: the service degrades to a retry stall until a reading
//! returns. Peripheral bring-up failures are reported once at boot by
//! `drivers::hw_init` and halt the system.

use core::fmt;

/// Errors from sensor drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// DS18B20 not answering on the OneWire bus (absent or defective).
    Disconnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "temperature sensor disconnected"),
        }
    }
}
