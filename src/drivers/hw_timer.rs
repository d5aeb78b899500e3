//! Run-on tick source using ESP-IDF's esp_timer API.
//!
//! A periodic 1 s timer whose callback increments a lock-free pending
//! counter. The polling loop drains the counter and advances the
//! countdown, so every relay write stays on the main task — the timer
//! context never touches outputs. This is the redesigned shape of the
//! classic "ISR writes the relay directly" firmware pattern, which
//! loses updates when loop and interrupt race on the output.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! the atomic increment is safe there.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{error, info};

/// Tick period of the run-on countdown.
pub const TICK_PERIOD_US: u64 = 1_000_000;

/// Ticks produced by the timer callback and not yet consumed by the
/// polling loop. Saturates instead of wrapping if the loop stalls.
static PENDING_TICKS: AtomicU8 = AtomicU8::new(0);

/// Whether the periodic tick source is currently running.
static TIMER_ARMED: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
static mut RUNON_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: RUNON_TIMER is written once in `create_timer()` before the
/// control loop starts; only the main task arms and disarms it.
#[cfg(target_os = "espidf")]
unsafe fn runon_timer() -> esp_timer_handle_t {
    unsafe { RUNON_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn runon_tick_cb(_arg: *mut core::ffi::c_void) {
    push_tick();
}

/// Record one elapsed tick. Lock-free; safe from timer/ISR context.
fn push_tick() {
    let _ = PENDING_TICKS.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1));
}

/// Inject a tick from tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_push_tick() {
    push_tick();
}

/// Take all pending ticks, resetting the counter.
pub fn take_pending_ticks() -> u8 {
    PENDING_TICKS.swap(0, Ordering::AcqRel)
}

/// Create the periodic timer (stopped). Call once at boot.
#[cfg(target_os = "espidf")]
pub fn create_timer() {
    // SAFETY: RUNON_TIMER is written here once at boot from the single
    // main-task context before any callback can fire. The callback only
    // touches the lock-free pending counter.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(runon_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"runon".as_ptr(),
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut RUNON_TIMER);
        if ret != ESP_OK {
            error!(
                "hw_timer: run-on timer create failed (rc={}) — countdown unavailable",
                ret
            );
            return;
        }
    }
    info!("hw_timer: run-on timer created (1 Hz, stopped)");
}

#[cfg(not(target_os = "espidf"))]
pub fn create_timer() {
    log::info!("hw_timer(sim): run-on timer is test-driven");
}

/// Start the periodic tick source. No-op when already running.
#[cfg(target_os = "espidf")]
pub fn arm() {
    // SAFETY: runon_timer() contract — main task only.
    unsafe {
        let t = runon_timer();
        if t.is_null() {
            return;
        }
        if TIMER_ARMED.swap(true, Ordering::AcqRel) {
            return;
        }
        let ret = esp_timer_start_periodic(t, TICK_PERIOD_US);
        if ret != ESP_OK {
            error!("hw_timer: run-on timer start failed (rc={})", ret);
            TIMER_ARMED.store(false, Ordering::Release);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn arm() {
    TIMER_ARMED.store(true, Ordering::Release);
}

/// Stop the tick source and drop any tick that already fired.
#[cfg(target_os = "espidf")]
pub fn disarm() {
    // SAFETY: runon_timer() contract — main task only; null-check
    // prevents stopping a timer that never got created.
    unsafe {
        if !TIMER_ARMED.swap(false, Ordering::AcqRel) {
            return;
        }
        let t = runon_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
    PENDING_TICKS.store(0, Ordering::Release);
}

#[cfg(not(target_os = "espidf"))]
pub fn disarm() {
    TIMER_ARMED.store(false, Ordering::Release);
    PENDING_TICKS.store(0, Ordering::Release);
}

/// Whether the tick source is currently running.
pub fn is_armed() -> bool {
    TIMER_ARMED.load(Ordering::Acquire)
}
