//! Scratch context threaded through every mode handler.
//!
//! Handlers do not own the indicator hardware.  They record what must
//! happen as a consequence of the transition: indicators that have to be
//! forced off, and whether a fresh recomputation is due: and the
//! controller applies those requests after the machine has settled.

use crate::app::indicators::{Indicator, IndicatorState};

/// Indicator requests produced by `on_enter` / `on_exit` handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeContext {
    /// Forced state for the heat indicator, if a handler set one.
    pub heat: Option<IndicatorState>,
    /// Forced state for the cool indicator, if a handler set one.
    pub cool: Option<IndicatorState>,
    /// The entered mode wants its indicator recomputed from a fresh reading.
    pub refresh_requested: bool,
}

impl ModeContext {
    /// Request that `indicator` be driven to `state` immediately.
    pub fn force(&mut self, indicator: Indicator, state: IndicatorState) {
        match indicator {
            Indicator::Heat => self.heat = Some(state),
            Indicator::Cool => self.cool = Some(state),
        }
    }

    /// The forced state recorded for `indicator`, if any.
    pub fn forced(&self, indicator: Indicator) -> Option<IndicatorState> {
        match indicator {
            Indicator::Heat => self.heat,
            Indicator::Cool => self.cool,
        }
    }

    /// Drop all pending requests.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take the pending requests, leaving the context empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}
