//! ESP-IDF UART link for the serial status reporter.
//!
//! Wraps `UartDriver` as a `std::io::Write`.  Bytes are queued into the
//! driver's TX ring buffer; `flush()` waits for the hardware FIFO to drain
//! for at most the configured timeout and reports `TimedOut` otherwise.

use std::io;
use std::time::Duration;

use esp_idf_hal::delay::TickType;
use esp_idf_hal::uart::UartDriver;
use log::warn;

pub struct UartLink<'d> {
    uart: UartDriver<'d>,
    timeout: Duration,
}

impl<'d> UartLink<'d> {
    pub fn new(uart: UartDriver<'d>, timeout_ms: u32) -> Self {
        Self {
            uart,
            timeout: Duration::from_millis(u64::from(timeout_ms)),
        }
    }
}

impl io::Write for UartLink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.uart
            .write(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    fn flush(&mut self) -> io::Result<()> {
        let ticks = TickType::from(self.timeout).ticks();
        self.uart.wait_tx_done(ticks).map_err(|e| {
            warn!("UART TX not drained within {:?}: {}", self.timeout, e);
            io::Error::from(io::ErrorKind::TimedOut)
        })
    }
}
