//! DS18B20 digital temperature sensor on the OneWire bus.
//!
//! The frost interlock needs whole degrees only, so the 12-bit reading
//! is truncated to integer Celsius. A missing presence pulse or a bad
//! scratchpad CRC reports the sensor as disconnected — the one fault
//! this firmware recognises at runtime.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged OneWire transaction via hw_init helpers.
//! On host/test: reads from a static atomic for injection.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Sentinel meaning "no sensor" in the simulation atomic.
const SIM_DISCONNECTED: i32 = i32::MIN;

static SIM_TEMP_C: AtomicI32 = AtomicI32::new(20);

/// Inject a simulated reading in whole degrees C.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_c(celsius: i32) {
    SIM_TEMP_C.store(celsius, Ordering::Relaxed);
}

/// Simulate an unplugged sensor.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_disconnected() {
    SIM_TEMP_C.store(SIM_DISCONNECTED, Ordering::Relaxed);
}

pub struct TemperatureSensor;

impl TemperatureSensor {
    pub fn new() -> Self {
        Self
    }

    /// Request a conversion and read the result in whole degrees C.
    pub fn read(&mut self) -> Result<i32, SensorError> {
        self.read_raw().ok_or(SensorError::Disconnected)
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Option<i32> {
        hw_init::ds18b20_read_celsius(pins::ONEWIRE_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Option<i32> {
        match SIM_TEMP_C.load(Ordering::Relaxed) {
            SIM_DISCONNECTED => None,
            c => Some(c),
        }
    }
}

impl Default for TemperatureSensor {
    fn default() -> Self {
        Self::new()
    }
}
