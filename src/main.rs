//! Cisterna firmware — main entry point.
//!
//! Hexagonal architecture with a cooperative polling loop and a single
//! asynchronous producer, the 1 Hz run-on timer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                   │
//! │                                                             │
//! │  HardwareAdapter           LogEventSink      Lcd<I2C>       │
//! │  (Sensor+Actuator+Timer)   (EventSink)       (DisplayPort)  │
//! │                                                             │
//! │  ──────────────── Port Trait Boundary ───────────────       │
//! │                                                             │
//! │  ┌───────────────────────────────────────────────────┐      │
//! │  │           ControlService (pure logic)             │      │
//! │  │           FSM · FrostGuard · Presenter view       │      │
//! │  └───────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-iteration order: drain countdown ticks → control tick (the
//! temperature sample always precedes control evaluation) → display
//! render → sleep per tick outcome.
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use log::info;

use cisterna::adapters::hardware::HardwareAdapter;
use cisterna::adapters::log_sink::LogEventSink;
use cisterna::app::events::AppEvent;
use cisterna::app::ports::{DisplayPort, EventSink};
use cisterna::app::service::{ControlService, TickOutcome};
use cisterna::config::SystemConfig;
use cisterna::display::Presenter;
use cisterna::drivers::button::ButtonPair;
use cisterna::drivers::lcd::Lcd;
use cisterna::drivers::relay::RelayDriver;
use cisterna::drivers::{hw_init, hw_timer};
use cisterna::pins;
use cisterna::sensors::SensorHub;
use cisterna::sensors::level::LevelProbes;
use cisterna::sensors::skim::SkimSwitch;
use cisterna::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().context("logger init")?;

    info!("cisterna v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt with the
        // relay de-energised.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    hw_timer::create_timer();

    // I2C display (pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO).
    let peripherals = esp_idf_hal::peripherals::Peripherals::take().context("peripherals")?;
    let i2c = esp_idf_hal::i2c::I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &esp_idf_hal::i2c::config::Config::new().baudrate(esp_idf_hal::units::Hertz(100_000)),
    )
    .context("i2c init")?;
    let mut lcd = Lcd::new(i2c, pins::LCD_I2C_ADDR, esp_idf_hal::delay::Ets);
    if let Err(e) = lcd.init() {
        // The controller keeps pumping without a panel; the operator
        // just loses the status view.
        log::error!("lcd init failed: {:?}", e);
    }

    // ── 3. Adapters + service ─────────────────────────────────
    let hub = SensorHub::new(
        LevelProbes::new(),
        SkimSwitch::new(),
        TemperatureSensor::new(),
    );
    let mut hw = HardwareAdapter::new(hub, ButtonPair::new(), RelayDriver::new());
    let mut sink = LogEventSink::new();
    let mut presenter = Presenter::new();

    let mut service = ControlService::new(config.clone());
    service.start(&mut sink);

    // Boot splash.
    lcd.draw(&Presenter::boot_frame());
    thread::sleep(Duration::from_millis(u64::from(config.boot_screen_hold_ms)));

    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    let mut telemetry_elapsed_ms: u64 = 0;

    loop {
        // Countdown ticks first: the timer may have fired while the
        // loop slept, and relay writes belong to this task.
        for _ in 0..hw_timer::take_pending_ticks() {
            service.on_countdown_tick(&mut hw, &mut sink);
        }

        let outcome = service.tick(&mut hw, &mut sink);

        lcd.draw(&presenter.render(&service.display_view()));

        let sleep_ms = match outcome {
            TickOutcome::Normal => config.control_loop_interval_ms,
            TickOutcome::SensorStall => config.sensor_retry_interval_ms,
            TickOutcome::ModeToggled => config.mode_toggle_debounce_ms,
        };

        telemetry_elapsed_ms += u64::from(sleep_ms);
        if telemetry_elapsed_ms >= u64::from(config.telemetry_interval_secs) * 1000 {
            sink.emit(&AppEvent::Telemetry(service.build_telemetry()));
            telemetry_elapsed_ms = 0;
        }

        thread::sleep(Duration::from_millis(u64::from(sleep_ms)));
    }
}
