//! GPIO / peripheral pin assignments for the cistern controller board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.

use crate::config::PROBE_COUNT;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Conductive level probes, lowest first. The probe interface board
/// drives a defined level: HIGH = water contact.
pub const PROBE_GPIOS: [i32; PROBE_COUNT] = [4, 5, 6, 7, 8];

/// Float (skimmer) switch. HIGH = start pumping.
pub const SKIM_GPIO: i32 = 3;

/// Green ON pushbutton. Active-low with internal pull-up.
pub const BUTTON_ON_GPIO: i32 = 10;
/// Red OFF pushbutton. Active-low with internal pull-up.
pub const BUTTON_OFF_GPIO: i32 = 11;

/// DS18B20 OneWire data line (external 4.7 kOhm pull-up to 3V3).
pub const ONEWIRE_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Pump relay. HIGH energises the coil.
pub const RELAY_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// I²C bus (display backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// PCF8574 backpack address of the 16×2 LCD.
pub const LCD_I2C_ADDR: u8 = 0x27;
