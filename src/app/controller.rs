//! Thermostat controller: the hexagonal core.
//!
//! [`ThermostatController`] owns the mode machine and the set-point.  It
//! exposes the three input operations plus the read-only decisions the
//! schedule loop needs.  All I/O flows through port traits injected at call
//! sites, so the controller is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │   ThermostatController    │
//! IndicatorPort ◀─│  ModeMachine · SetPoint   │
//!                 └──────────────────────────┘
//! ```
//!
//! Nothing is retried or masked here: a sensor failure during an indicator
//! recomputation is returned to the caller unchanged.

use log::{debug, info};

use crate::config::ThermostatConfig;
use crate::error::Result;
use crate::fsm::context::ModeContext;
use crate::fsm::states::build_mode_table;
use crate::fsm::{Mode, ModeMachine};
use crate::status::{Line, StatusRecord};

use super::commands::InputEvent;
use super::events::AppEvent;
use super::indicators::{self, Indicator, IndicatorPair};
use super::ports::{EventSink, IndicatorPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// ThermostatController
// ───────────────────────────────────────────────────────────────

pub struct ThermostatController {
    machine: ModeMachine,
    ctx: ModeContext,
    set_point_f: i32,
}

impl ThermostatController {
    /// Construct in [`Mode::Off`] with the configured power-on set-point.
    ///
    /// Does **not** touch the indicators: call [`start`](Self::start) next.
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            machine: ModeMachine::new(build_mode_table(), Mode::Off),
            ctx: ModeContext::default(),
            set_point_f: config.default_set_point_f,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial mode's entry action and bring the lights to match.
    pub fn start(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.machine.start(&mut self.ctx);
        self.apply_mode_requests(hw, sink)?;
        sink.emit(&AppEvent::Started {
            mode: self.mode(),
            set_point_f: self.set_point_f,
        });
        info!(
            "Controller started: mode={} set_point={}F",
            self.mode(),
            self.set_point_f
        );
        Ok(())
    }

    // ── Input operations ──────────────────────────────────────

    /// Advance the mode along Off → Heat → Cool → Off.
    ///
    /// The outgoing mode's indicator is forced off before the new mode's
    /// indicators are recomputed.
    pub fn cycle_mode(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<Mode> {
        let from = self.mode();
        let to = self.machine.cycle(&mut self.ctx);
        sink.emit(&AppEvent::ModeChanged { from, to });
        self.apply_mode_requests(hw, sink)?;
        Ok(to)
    }

    /// Raise the set-point by one degree, then recompute the indicators.
    pub fn increment_set_point(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<i32> {
        self.adjust_set_point(1, hw, sink)
    }

    /// Lower the set-point by one degree, then recompute the indicators.
    pub fn decrement_set_point(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<i32> {
        self.adjust_set_point(-1, hw, sink)
    }

    /// Dispatch a queued [`InputEvent`] to the matching operation.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match event {
            InputEvent::CycleMode => {
                self.cycle_mode(hw, sink)?;
            }
            InputEvent::RaiseSetPoint => {
                self.increment_set_point(hw, sink)?;
            }
            InputEvent::LowerSetPoint => {
                self.decrement_set_point(hw, sink)?;
            }
        }
        Ok(())
    }

    // ── Decisions ─────────────────────────────────────────────

    /// Whole degrees Fahrenheit from a fresh reading.
    pub fn measure(&self, sensor: &mut impl SensorPort) -> Result<i32> {
        Ok(sensor.read_temperature()?.floor_fahrenheit())
    }

    /// The indicator pair for the current mode and set-point.
    ///
    /// Off needs no reading and never fails.
    pub fn compute_indicator_state(&self, sensor: &mut impl SensorPort) -> Result<IndicatorPair> {
        if self.mode() == Mode::Off {
            return Ok(IndicatorPair::OFF);
        }
        let temp_f = self.measure(sensor)?;
        Ok(indicators::decide(self.mode(), temp_f, self.set_point_f))
    }

    /// Recompute from a fresh reading and drive both lights.
    pub fn refresh_indicators(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<IndicatorPair> {
        let mode = self.mode();
        let (pair, temperature_f) = if mode == Mode::Off {
            (IndicatorPair::OFF, None)
        } else {
            let temp_f = self.measure(hw)?;
            (indicators::decide(mode, temp_f, self.set_point_f), Some(temp_f))
        };

        for indicator in Indicator::BOTH {
            hw.apply(indicator, pair.get(indicator));
        }

        debug!(
            "Indicators: mode={} temp={:?}F sp={}F -> heat={:?} cool={:?}",
            mode, temperature_f, self.set_point_f, pair.heat, pair.cool
        );
        if let Some(temperature_f) = temperature_f {
            sink.emit(&AppEvent::IndicatorsUpdated {
                mode,
                temperature_f,
                set_point_f: self.set_point_f,
                pair,
            });
        }
        Ok(pair)
    }

    /// Snapshot for the serial monitor, taken from a fresh reading.
    pub fn status_record(&self, sensor: &mut impl SensorPort) -> Result<StatusRecord> {
        Ok(StatusRecord {
            mode: self.mode(),
            temperature_f: self.measure(sensor)?,
            set_point_f: self.set_point_f,
        })
    }

    /// `"<mode>,<temp>,<setpoint>"`, e.g. `"heat,70,72"`.
    pub fn status_line(&self, sensor: &mut impl SensorPort) -> Result<Line> {
        Ok(self.status_record(sensor)?.to_line())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.machine.current_mode()
    }

    pub fn set_point(&self) -> i32 {
        self.set_point_f
    }

    // ── Internal ──────────────────────────────────────────────

    fn adjust_set_point(
        &mut self,
        delta: i32,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<i32> {
        // Wrapping keeps raise/lower exact inverses across the whole i32 range.
        self.set_point_f = self.set_point_f.wrapping_add(delta);
        info!("Set point -> {}F", self.set_point_f);
        sink.emit(&AppEvent::SetPointChanged(self.set_point_f));
        self.refresh_indicators(hw, sink)?;
        Ok(self.set_point_f)
    }

    /// Apply the requests left in the context by the last transition.
    fn apply_mode_requests(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let requests = self.ctx.take();
        for indicator in Indicator::BOTH {
            if let Some(state) = requests.forced(indicator) {
                hw.apply(indicator, state);
            }
        }
        if requests.refresh_requested {
            self.refresh_indicators(hw, sink)?;
        }
        Ok(())
    }
}
