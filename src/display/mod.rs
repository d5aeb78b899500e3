//! Display presenter — pure rendering, no I/O and no decisions.
//!
//! Turns a [`DisplayView`] of the control state into a fixed-layout
//! 2×16 [`Frame`]:
//!
//! ```text
//!  ┌────────────────┐
//!  │ [▁▁█▁█]  |* 12°C│  well outline, level bars, wheel, temperature
//!  │ On <-- S --> Off│  button menu with the season tag
//!  └────────────────┘
//! ```
//!
//! Eight CGRAM glyphs cover the well outline, the level-bar segments,
//! and the four-frame activity wheel; everything else is plain ROM
//! characters. The adapter that pushes frames at the panel lives in
//! `drivers::lcd`.

use core::fmt::Write as _;

use heapless::String;

use crate::config::{PROBE_COUNT, Season};
use crate::fsm::context::LevelVector;

/// Display geometry: two rows of sixteen 5×7 cells.
pub const COLS: usize = 16;
pub const ROWS: usize = 2;

/// HD44780 ROM code for the degree sign.
const DEGREE: u8 = 0xDF;

// Fixed column layout, row 0.
const WELL_FLOOR_COL: usize = 0;
const LEVEL_BAR_COL: usize = 1;
const WELL_RIM_COL: usize = 6;
const WHEEL_COL: usize = 8;
const OK_MARK_COL: usize = 9;
const TEMP_COL: usize = 11;
// Row 1: season letter inside the button menu.
const SEASON_COL: usize = 7;

// ───────────────────────────────────────────────────────────────
// Custom glyphs
// ───────────────────────────────────────────────────────────────

/// The eight CGRAM glyphs, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Glyph {
    /// Activity wheel frame: vertical bar.
    Wheel0 = 0,
    /// Activity wheel frame: rising diagonal.
    Wheel1 = 1,
    /// Activity wheel frame: horizontal bar.
    Wheel2 = 2,
    /// Activity wheel frame: falling diagonal.
    Wheel3 = 3,
    /// Level bar segment, probe wet.
    LevelFull = 4,
    /// Left end of the well outline (floor).
    WellFloor = 5,
    /// Level bar segment, probe dry.
    LevelEmpty = 6,
    /// Right end of the well outline (ground rim).
    WellRim = 7,
}

impl Glyph {
    /// Every glyph, in CGRAM slot order.
    pub const ALL: [Glyph; 8] = [
        Glyph::Wheel0,
        Glyph::Wheel1,
        Glyph::Wheel2,
        Glyph::Wheel3,
        Glyph::LevelFull,
        Glyph::WellFloor,
        Glyph::LevelEmpty,
        Glyph::WellRim,
    ];

    /// CGRAM slot (doubles as the DDRAM character code).
    pub const fn slot(self) -> u8 {
        self as u8
    }

    /// Wheel frame for an animation phase.
    pub fn wheel(phase: u8) -> Self {
        match phase % 4 {
            0 => Self::Wheel0,
            1 => Self::Wheel1,
            2 => Self::Wheel2,
            _ => Self::Wheel3,
        }
    }

    /// 5×7 bitmap rows (bit 4 = leftmost column).
    pub const fn bitmap(self) -> [u8; 8] {
        match self {
            Self::Wheel0 => [0x00, 0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x00],
            Self::Wheel1 => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00, 0x00],
            Self::Wheel2 => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00, 0x00],
            Self::Wheel3 => [0x00, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00, 0x00],
            Self::LevelFull => [0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x00],
            Self::WellFloor => [0x03, 0x02, 0x02, 0x02, 0x02, 0x02, 0x03, 0x00],
            Self::LevelEmpty => [0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F, 0x00],
            Self::WellRim => [0x18, 0x01, 0x03, 0x07, 0x03, 0x01, 0x18, 0x00],
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Frame
// ───────────────────────────────────────────────────────────────

/// One display cell: a ROM character or a CGRAM glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Char(u8),
    Glyph(Glyph),
}

impl Cell {
    /// Byte to write into DDRAM for this cell.
    pub const fn code(self) -> u8 {
        match self {
            Self::Char(b) => b,
            Self::Glyph(g) => g.slot(),
        }
    }
}

/// A fully rendered 2×16 screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    cells: [[Cell; COLS]; ROWS],
}

impl Frame {
    /// All-blank frame.
    pub fn blank() -> Self {
        Self {
            cells: [[Cell::Char(b' '); COLS]; ROWS],
        }
    }

    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    fn put_str(&mut self, row: usize, col: usize, text: &str) {
        for (i, b) in text.bytes().enumerate() {
            if col + i < COLS {
                self.cells[row][col + i] = Cell::Char(b);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// View + presenter
// ───────────────────────────────────────────────────────────────

/// Read-only projection of the control state the presenter consumes.
#[derive(Debug, Clone, Copy)]
pub struct DisplayView {
    pub levels: LevelVector,
    pub temperature_c: Option<i32>,
    pub frost: bool,
    pub season: Season,
    pub relay_on: bool,
}

/// Stateless except for the activity-wheel phase.
pub struct Presenter {
    wheel_phase: u8,
}

impl Presenter {
    pub fn new() -> Self {
        Self { wheel_phase: 0 }
    }

    /// Splash shown while the system boots.
    pub fn boot_frame() -> Frame {
        let mut f = Frame::blank();
        f.put_str(0, 0, "    CISTERNA    ");
        let mut line: String<COLS> = String::new();
        let _ = write!(line, "fw v{}", env!("CARGO_PKG_VERSION"));
        f.put_str(1, 0, &line);
        f
    }

    /// Render the operating screen. Advances the activity wheel by one
    /// frame per call while the relay is energised; the wheel parks on
    /// its first frame when the pump is off.
    pub fn render(&mut self, view: &DisplayView) -> Frame {
        let mut f = Frame::blank();

        // Well outline and level bars.
        f.cells[0][WELL_FLOOR_COL] = Cell::Glyph(Glyph::WellFloor);
        for probe in 0..PROBE_COUNT {
            f.cells[0][LEVEL_BAR_COL + probe] = Cell::Glyph(if view.levels.wet(probe) {
                Glyph::LevelFull
            } else {
                Glyph::LevelEmpty
            });
        }
        f.cells[0][WELL_RIM_COL] = Cell::Glyph(Glyph::WellRim);

        // Activity wheel.
        if view.relay_on {
            self.wheel_phase = self.wheel_phase.wrapping_add(1);
            f.cells[0][WHEEL_COL] = Cell::Glyph(Glyph::wheel(self.wheel_phase));
        } else {
            f.cells[0][WHEEL_COL] = Cell::Glyph(Glyph::Wheel0);
        }

        // Frost warning replaces the wheel and the OK marker.
        if view.frost {
            f.put_str(0, WHEEL_COL, "!!");
        } else {
            f.cells[0][OK_MARK_COL] = Cell::Char(b'*');
        }

        // Temperature, or a placeholder while the sensor is missing.
        match view.temperature_c {
            Some(t) => {
                let mut text: String<COLS> = String::new();
                let _ = write!(text, "{}", t);
                f.put_str(0, TEMP_COL, &text);
                let deg_col = TEMP_COL + text.len();
                if deg_col + 1 < COLS {
                    f.cells[0][deg_col] = Cell::Char(DEGREE);
                    f.cells[0][deg_col + 1] = Cell::Char(b'C');
                }
            }
            None => f.put_str(0, TEMP_COL, "---"),
        }

        // Button menu with the season tag.
        f.put_str(1, 0, "On <-- S --> Off");
        f.cells[1][SEASON_COL] = Cell::Char(view.season.letter());

        f
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
