//! Pump relay driver.
//!
//! The single output this system controls, and the single choke point
//! every component routes writes through (via the actuator port). The
//! state mirror is atomic: the commanded state can be observed from any
//! context without racing the main loop's writes.
//!
//! High-active: GPIO high energises the coil.

use core::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::drivers::hw_init;
use crate::pins;

static RELAY_STATE: AtomicBool = AtomicBool::new(false);

pub struct RelayDriver;

impl RelayDriver {
    /// Construct the driver with the relay de-energised.
    pub fn new() -> Self {
        hw_init::gpio_write(pins::RELAY_GPIO, false);
        RELAY_STATE.store(false, Ordering::Release);
        Self
    }

    /// Set the relay. Idempotent; logs only on actual edges.
    pub fn set(&mut self, on: bool) {
        let was = RELAY_STATE.swap(on, Ordering::AcqRel);
        hw_init::gpio_write(pins::RELAY_GPIO, on);
        if was != on {
            debug!("relay: {}", if on { "ON" } else { "OFF" });
        }
    }

    /// Current commanded state (atomic mirror of the output pin).
    pub fn is_on(&self) -> bool {
        RELAY_STATE.load(Ordering::Acquire)
    }
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}
