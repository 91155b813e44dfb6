//! Outbound application events.
//!
//! The controller and schedule loop emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log to the console, count them in tests.

use crate::error::Error;
use crate::fsm::Mode;
use crate::status::StatusRecord;

use super::indicators::IndicatorPair;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries the initial state).
    Started { mode: Mode, set_point_f: i32 },

    /// The operating mode moved one step along the cycle.
    ModeChanged { from: Mode, to: Mode },

    /// The set-point was raised or lowered.
    SetPointChanged(i32),

    /// Indicators were recomputed from a fresh reading.
    IndicatorsUpdated {
        mode: Mode,
        temperature_f: i32,
        set_point_f: i32,
        pair: IndicatorPair,
    },

    /// A status record was delivered to the reporter.
    StatusReported(StatusRecord),

    /// The schedule loop stopped.  `None` on a requested shutdown.
    Halted(Option<Error>),
}
