//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  STANDBY ──[arming probe wet / skim / drain tail]──▶ RUN-ON
//!     ▲                                                  │
//!     └───────────[countdown expired / manual off]───────┘
//!
//!  Any state ──[frost latch set]──▶ FROST-LOCK ──[latch clear]──▶ STANDBY
//! ```
//!
//! The countdown itself is advanced by the service's 1 Hz timer entry
//! point, not by these handlers; `run_on_update` only decides whether a
//! fresh demand extends the window.

use log::{info, warn};

use super::context::{ActuatorCommands, ControlContext};
use super::{StateDescriptor, StateId};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Standby
        StateDescriptor {
            id: StateId::Standby,
            name: "Standby",
            on_enter: None,
            on_exit: None,
            on_update: standby_update,
        },
        // Index 1 — RunOn
        StateDescriptor {
            id: StateId::RunOn,
            name: "RunOn",
            on_enter: Some(run_on_enter),
            on_exit: Some(run_on_exit),
            on_update: run_on_update,
        },
        // Index 2 — FrostLock
        StateDescriptor {
            id: StateId::FrostLock,
            name: "FrostLock",
            on_enter: Some(frost_lock_enter),
            on_exit: Some(frost_lock_exit),
            on_update: frost_lock_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY — relay follows manual commands, countdown idle
// ═══════════════════════════════════════════════════════════════════════════

fn standby_update(ctx: &mut ControlContext) -> Option<StateId> {
    // Guard: frost latch wins over everything.
    if ctx.frost {
        return Some(StateId::FrostLock);
    }

    if ctx.pump_demand() || ctx.drain_tail_due() {
        return Some(StateId::RunOn);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUN-ON — relay held on, countdown ticking towards shutoff
// ═══════════════════════════════════════════════════════════════════════════

fn run_on_enter(ctx: &mut ControlContext) {
    ctx.run_on_ticks = 0;
    ctx.commands.relay_on = true;
    ctx.commands.countdown_armed = true;
    info!(
        "RUN-ON: pump on, {}s tail armed",
        ctx.config.run_on_duration_secs
    );
}

fn run_on_exit(ctx: &mut ControlContext) {
    ctx.commands.relay_on = false;
    ctx.commands.countdown_armed = false;
    ctx.run_on_ticks = 0;
}

fn run_on_update(ctx: &mut ControlContext) -> Option<StateId> {
    if ctx.frost {
        return Some(StateId::FrostLock);
    }

    // Fresh demand extends the window. The drain tail deliberately does
    // not: an empty cistern must not re-arm its own shutoff.
    if ctx.pump_demand() {
        ctx.run_on_ticks = 0;
    }

    ctx.commands.relay_on = true;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FROST-LOCK — interlock engaged, everything off
// ═══════════════════════════════════════════════════════════════════════════

fn frost_lock_enter(ctx: &mut ControlContext) {
    // Kill the relay and any countdown in progress immediately.
    ctx.commands = ActuatorCommands::all_off();
    ctx.run_on_ticks = 0;
    warn!("FROST-LOCK: relay disabled, countdown cancelled");
}

fn frost_lock_exit(_ctx: &mut ControlContext) {
    info!("FROST-LOCK: latch cleared, resuming normal operation");
}

fn frost_lock_update(ctx: &mut ControlContext) -> Option<StateId> {
    // Stay locked until the guard clears the latch.
    if !ctx.frost {
        return Some(StateId::Standby);
    }
    None
}
