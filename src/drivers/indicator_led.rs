//! Single-colour indicator LED on one PWM channel.
//!
//! | State   | Output                                  |
//! |---------|-----------------------------------------|
//! | Off     | duty 0                                  |
//! | SolidOn | full duty                               |
//! | Pulsing | triangular fade 0→255→0 over the period |
//!
//! The fade is advanced by [`IndicatorLed::advance`] with the elapsed time
//! since the last call.  The schedule loop calls it between ticks, so the
//! fade resolution is the input poll interval.
//!
//! PWM errors are logged and otherwise ignored: a dead LED must not stop
//! the thermostat.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::app::indicators::IndicatorState;

/// Full brightness on the 8-bit scale used by the fade.
const FULL: u8 = 255;

pub struct IndicatorLed<P> {
    pwm: P,
    name: &'static str,
    state: IndicatorState,
    phase_ms: u32,
    period_ms: u32,
    brightness: u8,
}

impl<P: SetDutyCycle> IndicatorLed<P> {
    /// Wrap a PWM channel and drive it dark.
    pub fn new(pwm: P, name: &'static str, period_ms: u32) -> Self {
        let mut led = Self {
            pwm,
            name,
            state: IndicatorState::Off,
            phase_ms: 0,
            period_ms: period_ms.max(2),
            brightness: FULL,
        };
        led.write(0);
        led
    }

    /// Switch to `state`.  Re-applying the current state is a no-op, so a
    /// running fade is not restarted by a periodic refresh.
    pub fn set(&mut self, state: IndicatorState) {
        if state == self.state {
            return;
        }
        self.state = state;
        self.phase_ms = 0;
        let level = self.level();
        self.write(level);
    }

    /// Advance a running fade by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.state != IndicatorState::Pulsing {
            return;
        }
        self.phase_ms = (self.phase_ms + elapsed_ms % self.period_ms) % self.period_ms;
        let level = self.level();
        self.write(level);
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Current output level on the 0–255 scale.
    pub fn level(&self) -> u8 {
        match self.state {
            IndicatorState::Off => 0,
            IndicatorState::SolidOn => FULL,
            IndicatorState::Pulsing => triangle(self.phase_ms, self.period_ms),
        }
    }

    /// Give the PWM channel back, dark.
    pub fn release(mut self) -> P {
        self.write(0);
        self.pwm
    }

    fn write(&mut self, level: u8) {
        if level == self.brightness {
            return;
        }
        match self.pwm.set_duty_cycle_fraction(u16::from(level), u16::from(FULL)) {
            Ok(()) => self.brightness = level,
            Err(e) => warn!("{} LED: PWM write failed: {:?}", self.name, e.kind()),
        }
    }
}

/// Triangular ramp 0→255→0 over `period_ms`.
fn triangle(phase_ms: u32, period_ms: u32) -> u8 {
    let pos = u64::from(phase_ms % period_ms);
    let half = u64::from(period_ms / 2);
    let level = if pos < half {
        (pos * 255) / half
    } else {
        ((u64::from(period_ms) - pos) * 255) / half
    };
    level.min(255) as u8
}
