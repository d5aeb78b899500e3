//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the FSM, the frost guard, and the shared
//! context. It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │      ControlService      │
//! ActuatorPort ◀──│   FSM · FrostGuard       │──▶ RunOnTimerPort
//!                 └──────────────────────────┘
//! ```
//!
//! Two entry points matter:
//! - [`tick`](ControlService::tick) — one polling-loop iteration:
//!   read inputs → frost supervision → button handling → FSM tick →
//!   actuators.
//! - [`on_countdown_tick`](ControlService::on_countdown_tick) — one
//!   1 Hz hardware-timer tick advancing the run-on countdown. Runs even
//!   while the polling loop is stalled on a missing sensor; the timer
//!   is not discretionary control.

use log::info;

use crate::config::{Season, SystemConfig};
use crate::display::DisplayView;
use crate::fsm::context::ControlContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::safety::FrostGuard;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, RunOnTimerPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Tick outcome
// ───────────────────────────────────────────────────────────────

/// What the polling loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Continue at the normal polling cadence.
    Normal,
    /// The temperature sensor is gone; retry at the sensor cadence with
    /// all discretionary control suspended.
    SensorStall,
    /// The season was toggled; hold off input sampling for the
    /// configured debounce interval.
    ModeToggled,
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic.
pub struct ControlService {
    fsm: Fsm,
    ctx: ControlContext,
    frost: FrostGuard,
    sensor_lost: bool,
    tick_count: u64,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let frost = FrostGuard::new(&config);
        let ctx = ControlContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Standby);
        Self {
            fsm,
            ctx,
            frost,
            sensor_lost: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in `Standby`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("ControlService started in {:?}", self.fsm.current_state());
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one polling cycle.
    ///
    /// The `hw` parameter satisfies all three hardware-facing ports —
    /// this avoids a double mutable borrow while keeping the port
    /// boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort + RunOnTimerPort),
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Read every input via SensorPort.
        let snapshot = hw.read_all();
        self.ctx.sensors = snapshot;

        // 2. Temperature monitor. Without a reading the frost latch
        //    cannot be evaluated, so every discretionary action is
        //    suspended until the sensor answers again; the loop retries
        //    at the sensor cadence.
        let Some(temp_c) = snapshot.temperature_c else {
            if !self.sensor_lost {
                self.sensor_lost = true;
                sink.emit(&AppEvent::SensorLost);
            }
            return TickOutcome::SensorStall;
        };
        if self.sensor_lost {
            self.sensor_lost = false;
            sink.emit(&AppEvent::SensorRestored);
        }

        // 3. Frost supervision.
        let was_latched = self.frost.is_latched();
        let latched = self.frost.evaluate(temp_c);
        self.ctx.frost = latched;
        if latched && !was_latched {
            sink.emit(&AppEvent::FrostDetected { temp_c });
        } else if !latched && was_latched {
            sink.emit(&AppEvent::FrostCleared { temp_c });
        }
        if latched && self.fsm.current_state() != StateId::FrostLock {
            // Kill the relay right away, overriding any countdown.
            self.fsm.force_transition(StateId::FrostLock, &mut self.ctx);
        }

        // 4. Pushbuttons (suppressed entirely while the latch holds).
        let mut outcome = TickOutcome::Normal;
        if !self.ctx.frost {
            match (snapshot.on_pressed, snapshot.off_pressed) {
                (true, true) => {
                    self.handle_command(AppCommand::ToggleSeason, &mut *hw, &mut *sink);
                    outcome = TickOutcome::ModeToggled;
                }
                (true, false) => {
                    self.handle_command(AppCommand::ManualOn, &mut *hw, &mut *sink);
                }
                (false, true) => {
                    self.handle_command(AppCommand::ManualOff, &mut *hw, &mut *sink);
                }
                (false, false) => {}
            }
        }

        // 5. FSM tick (pure state logic).
        self.fsm.tick(&mut self.ctx);

        // 6. Apply actuator commands through the ports.
        self.apply_actuators(&mut *hw);

        // 7. Emit a state change if the FSM moved.
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        outcome
    }

    /// Advance the run-on countdown by one hardware-timer tick.
    ///
    /// Within the window the relay is re-asserted on every tick; once
    /// the counter exceeds the configured duration the relay is forced
    /// off, the tick source disarmed, and the FSM returns to `Standby`.
    pub fn on_countdown_tick(
        &mut self,
        hw: &mut (impl ActuatorPort + RunOnTimerPort),
        sink: &mut impl EventSink,
    ) {
        if self.fsm.current_state() != StateId::RunOn {
            return;
        }

        self.ctx.run_on_ticks += 1;
        if self.ctx.run_on_ticks > self.ctx.config.run_on_duration_secs {
            info!(
                "RUN-ON: tail elapsed after {}s, pump off",
                self.ctx.config.run_on_duration_secs
            );
            self.fsm.force_transition(StateId::Standby, &mut self.ctx);
            self.apply_actuators(&mut *hw);
            sink.emit(&AppEvent::StateChanged {
                from: StateId::RunOn,
                to: StateId::Standby,
            });
        } else {
            self.apply_actuators(&mut *hw);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button gesture or test driver).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ActuatorPort + RunOnTimerPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ManualOn => {
                self.ctx.commands.relay_on = true;
            }
            AppCommand::ManualOff => {
                self.ctx.commands.relay_on = false;
                if self.fsm.current_state() == StateId::RunOn {
                    // Manual off forces the countdown to immediate expiry.
                    self.fsm.force_transition(StateId::Standby, &mut self.ctx);
                }
            }
            AppCommand::ToggleSeason => {
                self.ctx.commands.relay_on = false;
                self.ctx.season = self.ctx.season.toggled();
                info!("Season switched to {:?}", self.ctx.season);
                sink.emit(&AppEvent::SeasonChanged(self.ctx.season));
            }
        }
        self.apply_actuators(&mut *hw);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            state: self.fsm.current_state(),
            season: self.ctx.season,
            levels: self.ctx.sensors.levels,
            skim_active: self.ctx.sensors.skim_active,
            temperature_c: self.ctx.sensors.temperature_c,
            frost: self.ctx.frost,
            relay_on: self.ctx.commands.relay_on && !self.ctx.frost,
            run_on_ticks: self.ctx.run_on_ticks,
            uptime_ticks: self.tick_count,
        }
    }

    /// Read-only projection for the display presenter.
    pub fn display_view(&self) -> DisplayView {
        DisplayView {
            levels: self.ctx.sensors.levels,
            temperature_c: self.ctx.sensors.temperature_c,
            frost: self.ctx.frost,
            season: self.ctx.season,
            relay_on: self.ctx.commands.relay_on && !self.ctx.frost,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Active season mode.
    pub fn season(&self) -> Season {
        self.ctx.season
    }

    /// Probe index that currently arms the pump.
    pub fn active_start_probe(&self) -> usize {
        self.ctx.start_probe()
    }

    /// Whether the frost interlock is engaged.
    pub fn is_frost_latched(&self) -> bool {
        self.frost.is_latched()
    }

    /// Elapsed run-on ticks since the window was (re)armed.
    pub fn run_on_ticks(&self) -> u16 {
        self.ctx.run_on_ticks
    }

    /// Total polling ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate context commands into port calls.
    fn apply_actuators(&self, hw: &mut (impl ActuatorPort + RunOnTimerPort)) {
        // Relay: double-gated on the frost latch.
        let relay_on = self.ctx.commands.relay_on && !self.ctx.frost;
        hw.set_relay(relay_on);

        // Run-on tick source.
        if self.ctx.commands.countdown_armed {
            if !hw.is_armed() {
                hw.arm();
            }
        } else if hw.is_armed() {
            hw.disarm();
        }
    }
}
