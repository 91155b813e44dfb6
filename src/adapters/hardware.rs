//! Hardware adapter: bridges the peripheral drivers to domain port traits.
//!
//! Owns the temperature sensor, both indicator LEDs, the display and the
//! status reporter, exposing them through [`SensorPort`], [`IndicatorPort`],
//! [`DisplayPort`] and [`ReportPort`].  Generic over each peripheral so the
//! same bundle serves the ESP32 firmware and the host simulator.

use std::io::Write;

use embedded_hal::pwm::SetDutyCycle;

use crate::app::indicators::{Indicator, IndicatorState};
use crate::app::ports::{DisplayPort, IndicatorPort, ReportPort, SensorPort};
use crate::drivers::indicator_led::IndicatorLed;
use crate::drivers::serial_reporter::SerialReporter;
use crate::error::{DisplayError, ReportError, SensorError};
use crate::status::Temperature;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, P, L, W> {
    sensor: S,
    heat: IndicatorLed<P>,
    cool: IndicatorLed<P>,
    display: L,
    reporter: SerialReporter<W>,
}

impl<S, P, L, W> HardwareAdapter<S, P, L, W>
where
    P: SetDutyCycle,
{
    pub fn new(
        sensor: S,
        heat: IndicatorLed<P>,
        cool: IndicatorLed<P>,
        display: L,
        reporter: SerialReporter<W>,
    ) -> Self {
        Self {
            sensor,
            heat,
            cool,
            display,
            reporter,
        }
    }

    fn led(&mut self, indicator: Indicator) -> &mut IndicatorLed<P> {
        match indicator {
            Indicator::Heat => &mut self.heat,
            Indicator::Cool => &mut self.cool,
        }
    }

    pub fn indicator_state(&self, indicator: Indicator) -> IndicatorState {
        match indicator {
            Indicator::Heat => self.heat.state(),
            Indicator::Cool => self.cool.state(),
        }
    }
}

// ── SensorPort ────────────────────────────────────────────────

impl<S: SensorPort, P, L, W> SensorPort for HardwareAdapter<S, P, L, W> {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        self.sensor.read_temperature()
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<S, P: SetDutyCycle, L, W> IndicatorPort for HardwareAdapter<S, P, L, W> {
    fn turn_on(&mut self, indicator: Indicator) {
        self.led(indicator).set(IndicatorState::SolidOn);
    }

    fn turn_off(&mut self, indicator: Indicator) {
        self.led(indicator).set(IndicatorState::Off);
    }

    fn pulse(&mut self, indicator: Indicator) {
        self.led(indicator).set(IndicatorState::Pulsing);
    }

    fn advance(&mut self, elapsed_ms: u32) {
        self.heat.advance(elapsed_ms);
        self.cool.advance(elapsed_ms);
    }
}

// ── DisplayPort ───────────────────────────────────────────────

impl<S, P, L: DisplayPort, W> DisplayPort for HardwareAdapter<S, P, L, W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.display.clear()
    }

    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.display.write_lines(line1, line2)
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        self.display.release()
    }
}

// ── ReportPort ────────────────────────────────────────────────

impl<S, P, L, W: Write> ReportPort for HardwareAdapter<S, P, L, W> {
    fn write_line(&mut self, line: &str) -> Result<(), ReportError> {
        self.reporter.write_line(line)
    }
}
