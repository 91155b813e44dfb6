//! Shared status formatting: temperature scale handling, the serial status
//! record, and the two display lines.
//!
//! Everything renders into fixed-capacity [`Line`]s so the loop never
//! allocates per tick.
//!
//! ```text
//!  serial   heat,69,72
//!  lcd #1   10/18/2026 14:05
//!  lcd #2   Temp: 69F   |   HEAT SP:72F
//! ```

use core::fmt::{self, Write};

use chrono::NaiveDateTime;

use crate::fsm::Mode;

/// Capacity of one rendered line.  Matches the HD44780 DDRAM row length.
pub const LINE_CAP: usize = 40;

/// A rendered display line or status record.
pub type Line = heapless::String<LINE_CAP>;

/// strftime pattern for display line 1.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

// ───────────────────────────────────────────────────────────────
// Temperature
// ───────────────────────────────────────────────────────────────

/// An ambient temperature reading.  Stored in Fahrenheit, the scale every
/// comparison against the set-point is made in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature {
    fahrenheit: f32,
}

impl Temperature {
    pub fn from_celsius(celsius: f32) -> Self {
        Self {
            fahrenheit: celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn from_fahrenheit(fahrenheit: f32) -> Self {
        Self { fahrenheit }
    }

    pub fn fahrenheit(self) -> f32 {
        self.fahrenheit
    }

    pub fn celsius(self) -> f32 {
        (self.fahrenheit - 32.0) * 5.0 / 9.0
    }

    /// Whole degrees Fahrenheit, rounded down (69.7 → 69, -0.5 → -1).
    pub fn floor_fahrenheit(self) -> i32 {
        self.fahrenheit.floor() as i32
    }
}

// ───────────────────────────────────────────────────────────────
// Status record
// ───────────────────────────────────────────────────────────────

/// Snapshot sent to the external monitor: `<mode>,<temp_f_floor>,<setpoint>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRecord {
    pub mode: Mode,
    pub temperature_f: i32,
    pub set_point_f: i32,
}

impl StatusRecord {
    /// The record as one line, without the trailing newline.
    pub fn to_line(&self) -> Line {
        render(format_args!("{}", self))
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.mode.as_str(),
            self.temperature_f,
            self.set_point_f
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Display lines
// ───────────────────────────────────────────────────────────────

/// Line 1: `MM/DD/YYYY HH:MM`.
pub fn timestamp_line(now: &NaiveDateTime) -> Line {
    render(format_args!("{}", now.format(TIMESTAMP_FORMAT)))
}

/// Line 2, first half of the minor cycle: `Temp: {N}F`.
pub fn temperature_line(temperature_f: i32) -> Line {
    render(format_args!("Temp: {}F", temperature_f))
}

/// Line 2, second half of the minor cycle: `{MODE} SP:{N}F`.
pub fn mode_line(mode: Mode, set_point_f: i32) -> Line {
    render(format_args!("{} SP:{}F", mode.label(), set_point_f))
}

fn render(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    // Longest possible output ("COOL SP:-2147483648F") fits LINE_CAP.
    let _ = line.write_fmt(args);
    line
}
