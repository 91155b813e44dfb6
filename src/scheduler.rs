//! Schedule loop: the single periodic driver.
//!
//! One worker thread owns the [`ThermostatController`] and all output
//! hardware.  Every tick it rewrites the display, and on fixed sub-periods
//! it recomputes the indicators and emits a status report.  Between ticks
//! it services queued button presses and animates pulsing lights.
//!
//! ```text
//! tick    1  2  3  4  5  6  7  8  9 10 11 12
//! line2   T  T  T  T  T  M  M  M  M  M  T  T
//! leds                                ●
//! ```
//!
//! The status report fires on tick 30 of each 30-tick window.
//! `T` = temperature line, `M` = mode line.  Both counters start at 1.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::app::controller::ThermostatController;
use crate::app::events::AppEvent;
use crate::app::indicators::Indicator;
use crate::app::ports::{ClockPort, EventSink, ThermostatHardware};
use crate::config::ThermostatConfig;
use crate::drivers::task_pin::{self, Core};
use crate::error::{ConfigError, Result};
use crate::events::ControllerHandle;
use crate::status::{self, Line};

// ═══════════════════════════════════════════════════════════════
//  Cadence
// ═══════════════════════════════════════════════════════════════

/// What line 2 of the display shows this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondLine {
    /// `Temp: {N}F`
    Temperature,
    /// `{MODE} SP:{N}F`
    Mode,
}

/// Work due on one tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    pub second_line: SecondLine,
    pub refresh_indicators: bool,
    pub report: bool,
}

/// The two tick counters.  Pure; the loop asks it what to do next.
#[derive(Debug, Clone)]
pub struct Cadence {
    minor: u32,
    report: u32,
    temperature_ticks: u32,
    minor_cycle_ticks: u32,
    report_interval_ticks: u32,
}

impl Cadence {
    /// Rejects a config that fails [`ThermostatConfig::validate`].
    pub fn new(config: &ThermostatConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            minor: 1,
            report: 1,
            temperature_ticks: config.temperature_line_ticks,
            minor_cycle_ticks: config.minor_cycle_ticks,
            report_interval_ticks: config.report_interval_ticks,
        })
    }

    /// Plan the next tick and advance both counters.
    pub fn next_tick(&mut self) -> TickPlan {
        let (second_line, refresh_indicators) = if self.minor <= self.temperature_ticks {
            self.minor += 1;
            (SecondLine::Temperature, false)
        } else {
            self.minor += 1;
            if self.minor > self.minor_cycle_ticks {
                self.minor = 1;
                (SecondLine::Mode, true)
            } else {
                (SecondLine::Mode, false)
            }
        };

        let report = if self.report % self.report_interval_ticks == 0 {
            self.report = 1;
            true
        } else {
            self.report += 1;
            false
        };

        TickPlan {
            second_line,
            refresh_indicators,
            report,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Schedule loop
// ═══════════════════════════════════════════════════════════════

/// Stack for the loop thread; host log formatting is the deepest path.
const LOOP_STACK_KB: usize = 32;
const LOOP_PRIORITY: u8 = 5;

pub struct ScheduleLoop<H, C, D, S> {
    controller: ThermostatController,
    hw: H,
    clock: C,
    delay: D,
    sink: S,
    cadence: Cadence,
    handle: ControllerHandle,
    tick_interval_ms: u32,
    poll_interval_ms: u32,
    ticks: u64,
}

impl<H, C, D, S> ScheduleLoop<H, C, D, S>
where
    H: ThermostatHardware,
    C: ClockPort,
    D: DelayNs,
    S: EventSink,
{
    /// Fails with [`Error::Config`](crate::error::Error::Config) if `config`
    /// does not pass [`ThermostatConfig::validate`].
    pub fn new(config: &ThermostatConfig, hw: H, clock: C, delay: D, sink: S) -> Result<Self> {
        let cadence = Cadence::new(config)?;
        Ok(Self {
            controller: ThermostatController::new(config),
            hw,
            clock,
            delay,
            sink,
            cadence,
            handle: ControllerHandle::new(),
            tick_interval_ms: config.tick_interval_ms,
            poll_interval_ms: config.input_poll_interval_ms,
            ticks: 0,
        })
    }

    /// A handle for input producers.  Clone freely.
    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }

    pub fn controller(&self) -> &ThermostatController {
        &self.controller
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Bring the controller up and light the indicators for the initial mode.
    pub fn start(&mut self) -> Result<()> {
        self.controller.start(&mut self.hw, &mut self.sink)
    }

    /// One tick: display, then indicators, then report.
    pub fn tick(&mut self) -> Result<()> {
        self.ticks += 1;
        let plan = self.cadence.next_tick();

        let line1 = status::timestamp_line(&self.clock.now());
        let line2 = self.second_line(plan.second_line)?;
        self.hw.write_lines(&line1, &line2)?;

        if plan.refresh_indicators {
            self.controller.refresh_indicators(&mut self.hw, &mut self.sink)?;
        }

        if plan.report {
            let record = self.controller.status_record(&mut self.hw)?;
            self.hw.write_line(&record.to_line())?;
            self.sink.emit(&AppEvent::StatusReported(record));
        }
        Ok(())
    }

    /// Apply every queued press, in arrival order.
    pub fn service_inputs(&mut self) -> Result<()> {
        while let Some(event) = self.handle.queue().pop() {
            debug!("Input: {:?}", event);
            self.controller.handle_input(event, &mut self.hw, &mut self.sink)?;
        }
        Ok(())
    }

    /// Sleep out the tick period in poll-sized slices.
    ///
    /// Returns early once shutdown has been requested; the flag itself is
    /// acted on at the top of the next iteration of [`run`](Self::run).
    fn wait_for_next_tick(&mut self) -> Result<()> {
        let mut remaining = self.tick_interval_ms;
        while remaining > 0 {
            if self.handle.is_shutdown_requested() {
                break;
            }
            let slice = remaining.min(self.poll_interval_ms);
            self.delay.delay_ms(slice);
            self.hw.advance(slice);
            self.service_inputs()?;
            remaining -= slice;
        }
        Ok(())
    }

    /// Run until shutdown or the first failure, then tear down.
    ///
    /// The original error wins over any teardown error.
    pub fn run(mut self) -> Result<()> {
        let outcome = self.run_until_shutdown();
        if let Err(e) = &outcome {
            error!("Schedule loop halted after {} ticks: {}", self.ticks, e);
        }
        let teardown = self.teardown();
        if let Err(e) = &teardown {
            warn!("Teardown failed: {}", e);
        }
        self.sink.emit(&AppEvent::Halted(outcome.err()));
        outcome.and(teardown)
    }

    fn run_until_shutdown(&mut self) -> Result<()> {
        self.start()?;
        info!(
            "Schedule loop running (tick={}ms, poll={}ms)",
            self.tick_interval_ms, self.poll_interval_ms
        );
        loop {
            if self.handle.is_shutdown_requested() {
                info!("Schedule loop stopping after {} ticks", self.ticks);
                return Ok(());
            }
            self.tick()?;
            self.wait_for_next_tick()?;
        }
    }

    /// Blank and release the display, then darken both indicators.
    ///
    /// Every step is attempted; the first display error is returned.
    pub fn teardown(&mut self) -> Result<()> {
        let cleared = self.hw.clear();
        let released = self.hw.release();
        for indicator in Indicator::BOTH {
            self.hw.turn_off(indicator);
        }
        cleared?;
        released?;
        Ok(())
    }

    fn second_line(&mut self, which: SecondLine) -> Result<Line> {
        Ok(match which {
            SecondLine::Temperature => {
                status::temperature_line(self.controller.measure(&mut self.hw)?)
            }
            SecondLine::Mode => {
                status::mode_line(self.controller.mode(), self.controller.set_point())
            }
        })
    }
}

impl<H, C, D, S> ScheduleLoop<H, C, D, S>
where
    H: ThermostatHardware + Send + 'static,
    C: ClockPort + Send + 'static,
    D: DelayNs + Send + 'static,
    S: EventSink + Send + 'static,
{
    /// Move the loop onto its own thread.  Join the handle to collect the
    /// halt reason.
    pub fn spawn(self) -> Result<(ControllerHandle, std::thread::JoinHandle<Result<()>>)> {
        let handle = self.handle();
        let join = task_pin::spawn_on_core(
            Core::App,
            LOOP_PRIORITY,
            LOOP_STACK_KB,
            "schedule\0",
            move || self.run(),
        )?;
        Ok((handle, join))
    }
}
