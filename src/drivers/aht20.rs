//! AHT20 temperature/humidity sensor over I²C.
//!
//! ## Protocol
//!
//! | Step      | Bytes            | Notes                               |
//! |-----------|------------------|-------------------------------------|
//! | Status    | read 1           | bit 7 busy, bit 3 calibrated        |
//! | Calibrate | `BE 08 00`       | only when the calibrated bit is 0   |
//! | Trigger   | `AC 33 00`       | then wait ≥ 75 ms                   |
//! | Read      | read 6           | status, 20-bit RH, 20-bit T         |
//!
//! Temperature: `raw_t / 2^20 * 200 - 50` °C.  Humidity is decoded but not
//! used by the thermostat.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::status::Temperature;

/// Fixed 7-bit bus address.
pub const AHT20_ADDR: u8 = 0x38;

const CMD_CALIBRATE: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];
const CMD_SOFT_RESET: u8 = 0xBA;

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

const POWER_ON_MS: u32 = 40;
const RESET_MS: u32 = 20;
const CALIBRATE_MS: u32 = 10;
const MEASURE_MS: u32 = 80;
const BUSY_POLL_MS: u32 = 10;
const BUSY_RETRIES: u8 = 10;

/// One decoded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub celsius: f32,
    pub relative_humidity: f32,
}

pub struct Aht20<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Aht20<I, D> {
    /// Reset and calibrate the sensor.
    pub fn new(i2c: I, delay: D) -> Result<Self, SensorError> {
        let mut sensor = Self {
            i2c,
            delay,
            address: AHT20_ADDR,
        };
        sensor.init()?;
        Ok(sensor)
    }

    fn init(&mut self) -> Result<(), SensorError> {
        self.delay.delay_ms(POWER_ON_MS);
        self.write(&[CMD_SOFT_RESET])?;
        self.delay.delay_ms(RESET_MS);

        if self.status()? & STATUS_CALIBRATED == 0 {
            debug!("AHT20: calibrating");
            self.write(&CMD_CALIBRATE)?;
            self.delay.delay_ms(CALIBRATE_MS);
            if self.status()? & STATUS_CALIBRATED == 0 {
                warn!("AHT20: calibration bit still clear");
                return Err(SensorError::NotCalibrated);
            }
        }
        Ok(())
    }

    /// Trigger a conversion and wait for the result.
    pub fn measure(&mut self) -> Result<Reading, SensorError> {
        self.write(&CMD_TRIGGER)?;
        self.delay.delay_ms(MEASURE_MS);

        let mut frame = [0u8; 6];
        for _ in 0..BUSY_RETRIES {
            self.i2c
                .read(self.address, &mut frame)
                .map_err(|_| SensorError::Bus)?;
            if frame[0] & STATUS_BUSY == 0 {
                return Ok(decode(&frame));
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
        warn!("AHT20: still busy after {} polls", BUSY_RETRIES);
        Err(SensorError::Busy)
    }

    /// Hand back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn status(&mut self) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|_| SensorError::Bus)
    }
}

impl<I: I2c, D: DelayNs> SensorPort for Aht20<I, D> {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        Ok(Temperature::from_celsius(self.measure()?.celsius))
    }
}

/// Decode a 6-byte measurement frame.
fn decode(frame: &[u8; 6]) -> Reading {
    let raw_h = (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_t = (u32::from(frame[3] & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);
    const SCALE: f32 = (1u32 << 20) as f32;
    Reading {
        celsius: raw_t as f32 / SCALE * 200.0 - 50.0,
        relative_humidity: raw_h as f32 / SCALE * 100.0,
    }
}
