//! Line-oriented status reporter over any byte link.
//!
//! Each report is written as `line + "\n"` and flushed.  The link decides
//! how long a write may block; the ESP-IDF UART link bounds it and reports
//! overruns as `TimedOut`, which surfaces here as [`ReportError::Timeout`].

use std::io::Write;

use log::debug;

use crate::app::ports::ReportPort;
use crate::error::ReportError;

pub struct SerialReporter<W> {
    link: W,
    lines_written: u64,
}

impl<W: Write> SerialReporter<W> {
    pub fn new(link: W) -> Self {
        Self {
            link,
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn into_inner(self) -> W {
        self.link
    }
}

impl<W: Write> ReportPort for SerialReporter<W> {
    fn write_line(&mut self, line: &str) -> Result<(), ReportError> {
        self.link.write_all(line.as_bytes())?;
        self.link.write_all(b"\n")?;
        self.link.flush()?;
        self.lines_written += 1;
        debug!("Reported: {}", line);
        Ok(())
    }
}
