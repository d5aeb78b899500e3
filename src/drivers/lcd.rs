//! HD44780 character LCD behind a PCF8574 I2C backpack.
//!
//! Generic over [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`], so the driver compiles and tests
//! on the host with a recording bus. 4-bit interface; the backpack maps
//! P0=RS, P1=RW, P2=EN, P3=backlight, P4–P7=D4–D7.
//!
//! The ecosystem hd44780 crates do not expose CGRAM programming, which
//! the level-bar and activity glyphs need, so the byte protocol lives
//! here. A full frame is pushed as one batched I2C write per row — the
//! PCF8574 latches its outputs on every received byte, and the byte
//! time at 100 kHz already exceeds the controller's 37 µs execution
//! window.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::app::ports::DisplayPort;
use crate::display::{COLS, Frame, Glyph, ROWS};

const RS_DATA: u8 = 0x01;
const ENABLE: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no display shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 lines, 5x8 font
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM base address of each display row.
const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

/// Expanded backpack bytes for one row: cursor command plus 16 cells,
/// each taking 2 nibbles × (EN high, EN low).
const ROW_BUF: usize = (1 + COLS) * 4;

pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd<I2C, D> {
    pub fn new(i2c: I2C, addr: u8, delay: D) -> Self {
        Self { i2c, delay, addr }
    }

    /// Power-on init: 4-bit handshake, function set, display on, clear,
    /// then the eight custom glyphs into CGRAM.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        // >40 ms after VCC rise.
        self.delay.delay_ms(50);

        // Three 8-bit function-set knocks, then the switch to 4-bit.
        self.knock(0x30)?;
        self.delay.delay_ms(5);
        self.knock(0x30)?;
        self.delay.delay_us(150);
        self.knock(0x30)?;
        self.delay.delay_us(150);
        self.knock(0x20)?;
        self.delay.delay_us(150);

        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.command(CMD_ENTRY_MODE)?;

        self.load_glyphs()
    }

    /// Upload the eight custom 5×7 glyph bitmaps into CGRAM slots 0–7.
    fn load_glyphs(&mut self) -> Result<(), I2C::Error> {
        for glyph in Glyph::ALL {
            self.command(CMD_SET_CGRAM | (glyph.slot() << 3))?;
            for row in glyph.bitmap() {
                self.write_data(row)?;
            }
        }
        // Leave the address counter back in DDRAM.
        self.command(CMD_SET_DDRAM)
    }

    fn draw_frame(&mut self, frame: &Frame) -> Result<(), I2C::Error> {
        for (row, cells) in frame.rows().iter().enumerate() {
            let mut buf: Vec<u8, ROW_BUF> = Vec::new();
            expand(&mut buf, CMD_SET_DDRAM | ROW_OFFSETS[row], false);
            for cell in cells {
                expand(&mut buf, cell.code(), true);
            }
            self.i2c.write(self.addr, &buf)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.write_byte(cmd, false)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_data(&mut self, data: u8) -> Result<(), I2C::Error> {
        self.write_byte(data, true)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) -> Result<(), I2C::Error> {
        let mut buf: Vec<u8, 4> = Vec::new();
        expand(&mut buf, byte, is_data);
        self.i2c.write(self.addr, &buf)
    }

    /// Single init-handshake nibble (high nibble of `bits`).
    fn knock(&mut self, bits: u8) -> Result<(), I2C::Error> {
        let base = (bits & 0xF0) | BACKLIGHT;
        self.i2c.write(self.addr, &[base | ENABLE, base])
    }
}

/// Append the backpack byte sequence for one controller byte: high and
/// low nibble, each latched by an EN high→low edge.
fn expand<const N: usize>(buf: &mut Vec<u8, N>, byte: u8, is_data: bool) {
    let flags = BACKLIGHT | if is_data { RS_DATA } else { 0 };
    for nibble in [byte & 0xF0, (byte << 4) & 0xF0] {
        let _ = buf.push(nibble | flags | ENABLE);
        let _ = buf.push(nibble | flags);
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for Lcd<I2C, D> {
    fn draw(&mut self, frame: &Frame) {
        // A failed frame is not recoverable mid-loop; drop it and let
        // the next iteration redraw.
        if self.draw_frame(frame).is_err() {
            log::warn!("lcd: frame write failed");
        }
    }
}
