//! Conductive level probes.
//!
//! Five stainless probes at increasing heights in the well shaft. The
//! probe interface board turns water contact into a digital HIGH on a
//! GPIO, so a read can never fail — a dry probe simply reads low. The
//! whole vector is overwritten on every read.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: reads from an atomic bitmask for injection.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::PROBE_COUNT;
use crate::fsm::context::LevelVector;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_LEVEL_MASK: AtomicU8 = AtomicU8::new(0);

/// Set the simulated probe states (bit i = probe i wet).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_levels(mask: u8) {
    SIM_LEVEL_MASK.store(mask, Ordering::Relaxed);
}

pub struct LevelProbes {
    last: LevelVector,
}

impl LevelProbes {
    pub fn new() -> Self {
        Self {
            last: LevelVector::default(),
        }
    }

    /// Read all probes.
    pub fn read(&mut self) -> LevelVector {
        let mut levels = LevelVector::default();
        for (i, slot) in levels.0.iter_mut().enumerate() {
            *slot = self.read_probe(i);
        }
        self.last = levels;
        levels
    }

    /// Most recent vector without touching hardware.
    pub fn last(&self) -> LevelVector {
        self.last
    }

    #[cfg(target_os = "espidf")]
    fn read_probe(&self, index: usize) -> bool {
        hw_init::gpio_read(pins::PROBE_GPIOS[index])
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_probe(&self, index: usize) -> bool {
        SIM_LEVEL_MASK.load(Ordering::Relaxed) & (1 << index) != 0
    }
}

impl Default for LevelProbes {
    fn default() -> Self {
        Self::new()
    }
}
