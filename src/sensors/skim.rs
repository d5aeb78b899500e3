//! Float (skimmer) switch.
//!
//! A binary "start pumping" input independent of the conductive probes,
//! typically wired to a surface skimmer float. High-active.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_SKIM: AtomicBool = AtomicBool::new(false);

/// Set the simulated float state.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_skim(active: bool) {
    SIM_SKIM.store(active, Ordering::Relaxed);
}

pub struct SkimSwitch;

impl SkimSwitch {
    pub fn new() -> Self {
        Self
    }

    /// True while the float demands pumping.
    pub fn read(&self) -> bool {
        self.read_hw()
    }

    #[cfg(target_os = "espidf")]
    fn read_hw(&self) -> bool {
        hw_init::gpio_read(pins::SKIM_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_hw(&self) -> bool {
        SIM_SKIM.load(Ordering::Relaxed)
    }
}

impl Default for SkimSwitch {
    fn default() -> Self {
        Self::new()
    }
}
