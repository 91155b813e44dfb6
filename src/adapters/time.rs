//! Time adapters.
//!
//! - [`SystemClock`]: local wall-clock time for the display timestamp.
//! - [`StdDelay`]: blocking `DelayNs` on top of `std::thread::sleep`.
//!   On ESP-IDF the sleep yields to FreeRTOS, so other tasks keep running.
//! - [`uptime_ms`]: monotonic milliseconds since boot for button latches.
//!   Wraps `esp_timer_get_time()` on ESP-IDF and `Instant` elsewhere.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Thread-sleeping delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Milliseconds since boot, truncated to `u32` (wraps after ~49 days).
#[cfg(target_os = "espidf")]
pub fn uptime_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a read-only, ISR-safe query.
    ((unsafe { esp_idf_sys::esp_timer_get_time() }) / 1_000) as u32
}

/// Milliseconds since first call, truncated to `u32`.
#[cfg(not(target_os = "espidf"))]
pub fn uptime_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}
