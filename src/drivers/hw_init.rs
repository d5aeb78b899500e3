//! One-shot hardware peripheral initialization and raw GPIO helpers.
//!
//! Configures GPIO directions using raw ESP-IDF sys calls; called once
//! from `main()` before the control loop starts. Also hosts the
//! bit-banged OneWire transaction for the DS18B20 — the one place in
//! the firmware with microsecond-level timing.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── Peripheral bring-up ───────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop;
    // single-threaded at this point.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_onewire_pin()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Probes and skim switch: plain inputs, the interface board drives
    // defined levels.
    for &pin in pins::PROBE_GPIOS.iter().chain([&pins::SKIM_GPIO]) {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    // Pushbuttons: active-low with internal pull-ups.
    for &pin in &[pins::BUTTON_ON_GPIO, pins::BUTTON_OFF_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::RELAY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    // Relay de-energised until the service says otherwise.
    unsafe { gpio_set_level(pins::RELAY_GPIO, 0) };

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_onewire_pin() -> Result<(), HwInitError> {
    // Open-drain in/out so the bus can be pulled low and sampled without
    // reconfiguring the pin mid-transaction. External 4.7k pull-up.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ONEWIRE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::ONEWIRE_GPIO, 1) };

    info!("hw_init: OneWire pin configured");
    Ok(())
}

// ── GPIO helpers ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── DS18B20 over bit-banged OneWire ───────────────────────────
//
// Standard-speed timings from the DS18B20 datasheet. The transaction
// addresses a single sensor with SKIP ROM, so exactly one device may
// sit on the bus.

#[cfg(target_os = "espidf")]
const OW_CMD_SKIP_ROM: u8 = 0xCC;
#[cfg(target_os = "espidf")]
const OW_CMD_CONVERT_T: u8 = 0x44;
#[cfg(target_os = "espidf")]
const OW_CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// 12-bit conversion time.
#[cfg(target_os = "espidf")]
const CONVERT_WAIT_MS: u64 = 750;

/// Read the temperature in whole degrees C, or `None` when no sensor
/// answers the reset pulse or the scratchpad CRC fails.
#[cfg(target_os = "espidf")]
pub fn ds18b20_read_celsius(pin: i32) -> Option<i32> {
    if !ow_reset(pin) {
        return None;
    }
    ow_write_byte(pin, OW_CMD_SKIP_ROM);
    ow_write_byte(pin, OW_CMD_CONVERT_T);

    // Parasite-power safe: wait out the full conversion. Sleeping lets
    // FreeRTOS schedule; the polling loop has no tighter deadline.
    std::thread::sleep(std::time::Duration::from_millis(CONVERT_WAIT_MS));

    if !ow_reset(pin) {
        return None;
    }
    ow_write_byte(pin, OW_CMD_SKIP_ROM);
    ow_write_byte(pin, OW_CMD_READ_SCRATCHPAD);

    let mut scratchpad = [0u8; 9];
    for byte in &mut scratchpad {
        *byte = ow_read_byte(pin);
    }
    if ow_crc8(&scratchpad[..8]) != scratchpad[8] {
        return None;
    }

    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    // 1/16 degree resolution, truncated towards zero.
    Some(i32::from(raw) / 16)
}

#[cfg(target_os = "espidf")]
fn ow_delay_us(us: u32) {
    // SAFETY: esp_rom_delay_us is a calibrated busy-wait; safe anywhere.
    unsafe { esp_rom_delay_us(us) }
}

#[cfg(target_os = "espidf")]
fn ow_drive_low(pin: i32) {
    // SAFETY: open-drain pin configured in init_onewire_pin().
    unsafe { gpio_set_level(pin, 0) };
}

#[cfg(target_os = "espidf")]
fn ow_release(pin: i32) {
    // SAFETY: open-drain pin; the pull-up raises the bus.
    unsafe { gpio_set_level(pin, 1) };
}

#[cfg(target_os = "espidf")]
fn ow_sample(pin: i32) -> bool {
    // SAFETY: read-only register access.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Reset pulse; returns true if a device answered with presence.
#[cfg(target_os = "espidf")]
fn ow_reset(pin: i32) -> bool {
    ow_drive_low(pin);
    ow_delay_us(480);
    ow_release(pin);
    ow_delay_us(70);
    let presence = !ow_sample(pin);
    ow_delay_us(410);
    presence
}

#[cfg(target_os = "espidf")]
fn ow_write_bit(pin: i32, bit: bool) {
    ow_drive_low(pin);
    ow_delay_us(if bit { 6 } else { 60 });
    ow_release(pin);
    ow_delay_us(if bit { 64 } else { 10 });
}

#[cfg(target_os = "espidf")]
fn ow_read_bit(pin: i32) -> bool {
    ow_drive_low(pin);
    ow_delay_us(6);
    ow_release(pin);
    ow_delay_us(9);
    let bit = ow_sample(pin);
    ow_delay_us(55);
    bit
}

#[cfg(target_os = "espidf")]
fn ow_write_byte(pin: i32, byte: u8) {
    for i in 0..8 {
        ow_write_bit(pin, (byte >> i) & 1 != 0);
    }
}

#[cfg(target_os = "espidf")]
fn ow_read_byte(pin: i32) -> u8 {
    let mut byte = 0u8;
    for i in 0..8 {
        if ow_read_bit(pin) {
            byte |= 1 << i;
        }
    }
    byte
}

/// Dallas CRC8 (polynomial x^8 + x^5 + x^4 + 1, reflected).
#[cfg(target_os = "espidf")]
fn ow_crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}
