//! Frost interlock supervisor.
//!
//! [`FrostGuard`] runs every control tick before the FSM and maintains
//! the frost latch. While latched, the FSM holds `FrostLock`: relay off,
//! countdown disarmed, and all discretionary control suppressed.
//!
//! ## Latch lifecycle
//!
//! 1. A valid reading strictly below the threshold sets the latch.
//! 2. The service force-transitions the FSM to `FrostLock`;
//!    `frost_lock_enter` kills the relay and the countdown.
//! 3. Each tick the guard re-evaluates. A valid reading strictly above
//!    the threshold clears the latch.
//! 4. With the latch clear, `frost_lock_update` returns to `Standby`.
//!
//! A reading exactly at the threshold leaves the latch unchanged, and a
//! missing reading never touches it — frost cannot be evaluated without
//! data, which is why the whole control path stalls on a dead sensor.

use log::{error, info};

use crate::config::SystemConfig;

pub struct FrostGuard {
    threshold_c: i32,
    latched: bool,
}

impl FrostGuard {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            threshold_c: config.frost_threshold_c,
            latched: false,
        }
    }

    /// Evaluate a valid temperature reading against the threshold.
    /// Returns the updated latch state.
    pub fn evaluate(&mut self, temp_c: i32) -> bool {
        if temp_c < self.threshold_c {
            if !self.latched {
                error!("FROST LATCH SET: {}C < {}C", temp_c, self.threshold_c);
            }
            self.latched = true;
        } else if temp_c > self.threshold_c {
            if self.latched {
                info!("FROST LATCH CLEARED: {}C > {}C", temp_c, self.threshold_c);
            }
            self.latched = false;
        }
        self.latched
    }

    /// True while the interlock is engaged.
    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
