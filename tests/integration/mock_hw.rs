//! Mock hardware adapter for integration tests.
//!
//! Records relay and timer edges so tests can assert on the command
//! history without touching real GPIO.

use cisterna::app::events::AppEvent;
use cisterna::app::ports::{ActuatorPort, DisplayPort, EventSink, RunOnTimerPort, SensorPort};
use cisterna::display::Frame;
use cisterna::fsm::context::{LevelVector, SensorSnapshot};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    SetRelay(bool),
    ArmTimer,
    DisarmTimer,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub snapshot: SensorSnapshot,
    /// Relay and timer *edges* in order of occurrence. The service
    /// re-asserts the relay every tick, so identical writes are folded.
    pub calls: Vec<HwCall>,
    relay: bool,
    armed: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot {
                temperature_c: Some(18),
                ..SensorSnapshot::default()
            },
            calls: Vec::new(),
            relay: false,
            armed: false,
        }
    }

    /// Mark probes wet from the bitmask (bit i = probe i).
    pub fn set_levels(&mut self, mask: u8) {
        let mut levels = LevelVector::default();
        for (i, slot) in levels.0.iter_mut().enumerate() {
            *slot = mask & (1 << i) != 0;
        }
        self.snapshot.levels = levels;
    }

    pub fn set_temp(&mut self, celsius: i32) {
        self.snapshot.temperature_c = Some(celsius);
    }

    pub fn disconnect_temp(&mut self) {
        self.snapshot.temperature_c = None;
    }

    pub fn press(&mut self, on: bool, off: bool) {
        self.snapshot.on_pressed = on;
        self.snapshot.off_pressed = off;
    }

    pub fn set_skim(&mut self, active: bool) {
        self.snapshot.skim_active = active;
    }

    pub fn relay_on(&self) -> bool {
        self.relay
    }

    pub fn timer_armed(&self) -> bool {
        self.armed
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, on: bool) {
        if on != self.relay {
            self.calls.push(HwCall::SetRelay(on));
        }
        self.relay = on;
    }
}

impl RunOnTimerPort for MockHardware {
    fn arm(&mut self) {
        if !self.armed {
            self.calls.push(HwCall::ArmTimer);
        }
        self.armed = true;
    }

    fn disarm(&mut self) {
        if self.armed {
            self.calls.push(HwCall::DisarmTimer);
        }
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

// ── MockDisplay ───────────────────────────────────────────────

/// Records frames pushed at the display.
pub struct MockDisplay {
    pub frames: Vec<Frame>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn draw(&mut self, frame: &Frame) {
        self.frames.push(*frame);
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
