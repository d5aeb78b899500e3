//! System configuration parameters
//!
//! All tunable parameters for the cistern controller. Behaviour is fixed
//! at build time; tests construct alternate configurations directly
//! instead of recompiling with different constants.

use serde::{Deserialize, Serialize};

/// Number of conductive level probes in the well shaft, lowest first.
pub const PROBE_COUNT: usize = 5;

/// Operating season. Decides which probe arms the pump run-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// The other season.
    pub fn toggled(self) -> Self {
        match self {
            Self::Summer => Self::Winter,
            Self::Winter => Self::Summer,
        }
    }

    /// Single-letter tag shown in the button menu line.
    pub fn letter(self) -> u8 {
        match self {
            Self::Summer => b'S',
            Self::Winter => b'W',
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Frost interlock ---
    /// Temperature (whole degrees C) below which the frost latch engages.
    pub frost_threshold_c: i32,

    // --- Pump run-on ---
    /// Extra seconds the pump keeps running after a stop condition.
    pub run_on_duration_secs: u16,

    // --- Level thresholds (probe indices) ---
    /// Probe that arms the pump in summer (the highest probe).
    pub summer_start_probe: usize,
    /// Probe that arms the pump in winter.
    pub winter_start_probe: usize,
    /// Probe below which a manually started pump gets its run-on tail.
    pub drain_stop_probe: usize,

    // --- Timing ---
    /// Pause after a season toggle during which no input is sampled.
    pub mode_toggle_debounce_ms: u32,
    /// Polling loop interval (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Retry interval while the temperature sensor is disconnected.
    pub sensor_retry_interval_ms: u32,
    /// How long the boot screen stays up (milliseconds).
    pub boot_screen_hold_ms: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Frost
            frost_threshold_c: 2,

            // Run-on
            run_on_duration_secs: 6,

            // Level thresholds
            summer_start_probe: 4,
            winter_start_probe: 2,
            drain_stop_probe: 1,

            // Timing
            mode_toggle_debounce_ms: 500,
            control_loop_interval_ms: 250,
            sensor_retry_interval_ms: 1000,
            boot_screen_hold_ms: 3000,
            telemetry_interval_secs: 60,
        }
    }
}

impl SystemConfig {
    /// The probe index that arms the pump for the given season.
    pub fn start_probe(&self, season: Season) -> usize {
        match season {
            Season::Summer => self.summer_start_probe,
            Season::Winter => self.winter_start_probe,
        }
    }
}
