//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermostatController / ScheduleLoop
//! ```
//!
//! Driven adapters (sensor, indicators, display, serial reporter, clock,
//! event sinks) implement these traits.  The core consumes them via
//! generics, so it never touches hardware directly and runs unchanged
//! against the mocks in `tests/integration/mock_hw.rs`.

use chrono::NaiveDateTime;

use crate::error::{DisplayError, ReportError, SensorError};
use crate::status::Temperature;

use super::indicators::{Indicator, IndicatorState};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the core calls this whenever it needs a fresh reading.
pub trait SensorPort {
    /// Read the current ambient temperature.
    fn read_temperature(&mut self) -> Result<Temperature, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: core → lights)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the two status lights.
pub trait IndicatorPort {
    /// Light `indicator` at full brightness.
    fn turn_on(&mut self, indicator: Indicator);

    /// Extinguish `indicator`.
    fn turn_off(&mut self, indicator: Indicator);

    /// Start a continuous fade in/out on `indicator`.
    fn pulse(&mut self, indicator: Indicator);

    /// Advance any time-based animation by `elapsed_ms`.  Called by the
    /// schedule loop between ticks; drivers with hardware fades ignore it.
    fn advance(&mut self, _elapsed_ms: u32) {}

    /// Drive `indicator` to `state`.
    fn apply(&mut self, indicator: Indicator, state: IndicatorState) {
        match state {
            IndicatorState::Off => self.turn_off(indicator),
            IndicatorState::SolidOn => self.turn_on(indicator),
            IndicatorState::Pulsing => self.pulse(indicator),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: core → two-line text surface)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Blank the surface.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Replace the whole surface with two lines of text.
    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;

    /// Hand the underlying lines back.  No further writes succeed.
    fn release(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Report port (driven adapter: core → serial monitor)
// ───────────────────────────────────────────────────────────────

/// Append-only, line-oriented output channel.
pub trait ReportPort {
    /// Write `line` followed by a newline terminator.
    fn write_line(&mut self, line: &str) -> Result<(), ReportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time for the display timestamp.
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Aggregate
// ───────────────────────────────────────────────────────────────

/// Everything the schedule loop drives.  Implemented automatically for
/// any adapter that satisfies all four ports: typically one struct that
/// owns every peripheral, which avoids juggling several mutable borrows.
pub trait ThermostatHardware: SensorPort + IndicatorPort + DisplayPort + ReportPort {}

impl<T> ThermostatHardware for T where T: SensorPort + IndicatorPort + DisplayPort + ReportPort {}
