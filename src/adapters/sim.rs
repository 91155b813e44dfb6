//! Host simulation adapters.
//!
//! Stand-ins for the real peripherals so the full schedule loop runs on a
//! workstation:
//!
//! | Adapter          | Replaces            |
//! |------------------|---------------------|
//! | `SimSensor`      | AHT20               |
//! | `SimPwm`         | LEDC PWM channel    |
//! | `ConsoleDisplay` | 16×2 character LCD  |
//!
//! The simulated temperature is shared through [`SimTemperature`] so the
//! console thread can change it while the loop owns the sensor.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

use core::convert::Infallible;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::{info, trace};

use crate::app::ports::{DisplayPort, SensorPort};
use crate::error::{DisplayError, SensorError};
use crate::status::Temperature;

// ── Sensor ────────────────────────────────────────────────────

/// Shared simulated ambient temperature in °F, stored as `f32` bits.
#[derive(Debug, Clone)]
pub struct SimTemperature(Arc<AtomicU32>);

impl SimTemperature {
    pub fn new(fahrenheit: f32) -> Self {
        Self(Arc::new(AtomicU32::new(fahrenheit.to_bits())))
    }

    pub fn set(&self, fahrenheit: f32) {
        self.0.store(fahrenheit.to_bits(), Ordering::Relaxed);
        info!("Simulated temperature -> {:.1}F", fahrenheit);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

pub struct SimSensor {
    ambient: SimTemperature,
}

impl SimSensor {
    pub fn new(ambient: SimTemperature) -> Self {
        Self { ambient }
    }
}

impl SensorPort for SimSensor {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        let f = self.ambient.get();
        if f.is_finite() {
            Ok(Temperature::from_fahrenheit(f))
        } else {
            Err(SensorError::Bus)
        }
    }
}

// ── PWM ───────────────────────────────────────────────────────

/// In-memory PWM channel.  The duty is readable from other threads.
#[derive(Debug, Clone)]
pub struct SimPwm {
    name: &'static str,
    duty: Arc<AtomicU16>,
}

impl SimPwm {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            duty: Arc::new(AtomicU16::new(0)),
        }
    }

    pub fn duty(&self) -> u16 {
        self.duty.load(Ordering::Relaxed)
    }
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        trace!("{} PWM duty={}", self.name, duty);
        self.duty.store(duty, Ordering::Relaxed);
        Ok(())
    }
}

// ── Display ───────────────────────────────────────────────────

/// Renders the two display lines as a boxed frame on a text stream.
pub struct ConsoleDisplay<W> {
    out: W,
    columns: usize,
    released: bool,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns,
            released: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame_line(&mut self, text: &str) -> Result<(), DisplayError> {
        let shown: String = text.chars().take(self.columns).collect();
        writeln!(self.out, "|{:<width$}|", shown, width = self.columns)
            .map_err(|_| DisplayError::Pin)
    }
}

impl<W: Write> DisplayPort for ConsoleDisplay<W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.released {
            return Err(DisplayError::Released);
        }
        self.frame_line("")?;
        self.frame_line("")
    }

    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        if self.released {
            return Err(DisplayError::Released);
        }
        self.frame_line(line1)?;
        self.frame_line(line2)?;
        writeln!(self.out).map_err(|_| DisplayError::Pin)
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        self.released = true;
        self.out.flush().map_err(|_| DisplayError::Pin)
    }
}
