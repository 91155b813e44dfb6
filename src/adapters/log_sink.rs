//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART console on the device, stderr in the simulator).

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { mode, set_point_f } => {
                info!("START | mode={} set_point={}F", mode, set_point_f);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from, to);
            }
            AppEvent::SetPointChanged(sp) => {
                info!("SETPOINT | {}F", sp);
            }
            AppEvent::IndicatorsUpdated {
                mode,
                temperature_f,
                set_point_f,
                pair,
            } => {
                info!(
                    "LEDS | mode={} temp={}F sp={}F | heat={:?} cool={:?}",
                    mode, temperature_f, set_point_f, pair.heat, pair.cool
                );
            }
            AppEvent::StatusReported(record) => {
                info!("REPORT | {}", record);
            }
            AppEvent::Halted(None) => {
                info!("HALT | shutdown requested");
            }
            AppEvent::Halted(Some(e)) => {
                error!("HALT | {}", e);
            }
        }
    }
}
