//! Manual pushbutton pair.
//!
//! Two momentary switches — green starts the pump, red stops it —
//! active-low with internal pull-ups, polled once per loop iteration.
//! Gesture interpretation lives in the service: a lone press maps to a
//! manual command, a simultaneous press flips the season, and the loop
//! applies the post-toggle debounce hold so a long press does not
//! toggle twice.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_ON_PRESSED: AtomicBool = AtomicBool::new(false);
static SIM_OFF_PRESSED: AtomicBool = AtomicBool::new(false);

/// Inject simulated button states.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_buttons(on_pressed: bool, off_pressed: bool) {
    SIM_ON_PRESSED.store(on_pressed, Ordering::Relaxed);
    SIM_OFF_PRESSED.store(off_pressed, Ordering::Relaxed);
}

pub struct ButtonPair;

impl ButtonPair {
    pub fn new() -> Self {
        Self
    }

    /// `(on_pressed, off_pressed)`, inverted for the active-low wiring.
    pub fn read(&self) -> (bool, bool) {
        (self.read_on(), self.read_off())
    }

    #[cfg(target_os = "espidf")]
    fn read_on(&self) -> bool {
        !hw_init::gpio_read(pins::BUTTON_ON_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_on(&self) -> bool {
        SIM_ON_PRESSED.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn read_off(&self) -> bool {
        !hw_init::gpio_read(pins::BUTTON_OFF_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_off(&self) -> bool {
        SIM_OFF_PRESSED.load(Ordering::Relaxed)
    }
}

impl Default for ButtonPair {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_injection_roundtrip() {
        let buttons = ButtonPair::new();
        assert_eq!(buttons.read(), (false, false));
        sim_set_buttons(true, false);
        assert_eq!(buttons.read(), (true, false));
        sim_set_buttons(true, true);
        assert_eq!(buttons.read(), (true, true));
        sim_set_buttons(false, false);
    }
}
