//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). This is the only
//! telemetry surface the controller has — there is no network and no
//! persistence.

use core::fmt;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::LevelVector;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

/// `Option<i32>` temperature with a `---` placeholder.
struct TempFmt(Option<i32>);

impl fmt::Display for TempFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{}C", c),
            None => write!(f, "---"),
        }
    }
}

fn level_mask(levels: &LevelVector) -> u8 {
    levels
        .0
        .iter()
        .rev()
        .fold(0u8, |acc, &wet| (acc << 1) | u8::from(wet))
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | season={:?} | levels=0b{:05b} | skim={} | \
                     T={} | frost={} | relay={} | tail={}s | ticks={}",
                    t.state,
                    t.season,
                    level_mask(&t.levels),
                    t.skim_active,
                    TempFmt(t.temperature_c),
                    t.frost,
                    if t.relay_on { "ON" } else { "OFF" },
                    t.run_on_ticks,
                    t.uptime_ticks,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::FrostDetected { temp_c } => {
                warn!("FROST | latched at {}C", temp_c);
            }
            AppEvent::FrostCleared { temp_c } => {
                info!("FROST | cleared at {}C", temp_c);
            }
            AppEvent::SeasonChanged(season) => {
                info!("MODE  | {:?}", season);
            }
            AppEvent::SensorLost => {
                warn!("TEMP  | sensor lost, control stalled");
            }
            AppEvent::SensorRestored => {
                info!("TEMP  | sensor restored");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
