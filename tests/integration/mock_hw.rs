//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full output history
//! without touching real GPIO/PWM/I²C.  State lives behind an
//! `Arc<Mutex<_>>` so a test keeps a view after the schedule loop takes
//! ownership of the adapter (or moves it onto another thread).

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};
use embedded_hal::delay::DelayNs;

use thermostat::app::events::AppEvent;
use thermostat::app::indicators::{Indicator, IndicatorState};
use thermostat::app::ports::{
    ClockPort, DisplayPort, EventSink, IndicatorPort, ReportPort, SensorPort,
};
use thermostat::error::{DisplayError, ReportError, SensorError};
use thermostat::status::Temperature;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Read,
    Lines(String, String),
    Clear,
    Release,
    Report(String),
    Light(Indicator, IndicatorState),
}

#[derive(Debug)]
pub struct HwState {
    pub temperature_f: Option<f32>,
    pub fail_display: bool,
    pub fail_report: bool,
    pub calls: Vec<HwCall>,
    pub lights: [IndicatorState; 2],
    pub advanced_ms: u64,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Clone)]
pub struct MockHardware(Arc<Mutex<HwState>>);

#[allow(dead_code)]
impl MockHardware {
    pub fn at(temperature_f: f32) -> Self {
        Self(Arc::new(Mutex::new(HwState {
            temperature_f: Some(temperature_f),
            fail_display: false,
            fail_report: false,
            calls: Vec::new(),
            lights: [IndicatorState::Off; 2],
            advanced_ms: 0,
        })))
    }

    pub fn state(&self) -> MutexGuard<'_, HwState> {
        self.0.lock().unwrap()
    }

    pub fn set_temperature(&self, f: f32) {
        self.state().temperature_f = Some(f);
    }

    pub fn fail_sensor(&self) {
        self.state().temperature_f = None;
    }

    pub fn light(&self, indicator: Indicator) -> IndicatorState {
        self.state().lights[indicator as usize]
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Every `(line1, line2)` frame written so far.
    pub fn frames(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HwCall::Lines(a, b) => Some((a, b)),
                _ => None,
            })
            .collect()
    }

    pub fn reports(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HwCall::Report(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.calls().iter().filter(|c| **c == HwCall::Read).count()
    }

    fn set_light(&mut self, indicator: Indicator, state: IndicatorState) {
        let mut s = self.state();
        s.lights[indicator as usize] = state;
        s.calls.push(HwCall::Light(indicator, state));
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        let mut s = self.state();
        s.calls.push(HwCall::Read);
        s.temperature_f
            .map(Temperature::from_fahrenheit)
            .ok_or(SensorError::Bus)
    }
}

impl IndicatorPort for MockHardware {
    fn turn_on(&mut self, indicator: Indicator) {
        self.set_light(indicator, IndicatorState::SolidOn);
    }

    fn turn_off(&mut self, indicator: Indicator) {
        self.set_light(indicator, IndicatorState::Off);
    }

    fn pulse(&mut self, indicator: Indicator) {
        self.set_light(indicator, IndicatorState::Pulsing);
    }

    fn advance(&mut self, elapsed_ms: u32) {
        self.state().advanced_ms += u64::from(elapsed_ms);
    }
}

impl DisplayPort for MockHardware {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.state().calls.push(HwCall::Clear);
        Ok(())
    }

    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        let mut s = self.state();
        if s.fail_display {
            return Err(DisplayError::Pin);
        }
        s.calls.push(HwCall::Lines(line1.to_owned(), line2.to_owned()));
        Ok(())
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        self.state().calls.push(HwCall::Release);
        Ok(())
    }
}

impl ReportPort for MockHardware {
    fn write_line(&mut self, line: &str) -> Result<(), ReportError> {
        let mut s = self.state();
        if s.fail_report {
            return Err(ReportError::Timeout);
        }
        s.calls.push(HwCall::Report(line.to_owned()));
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// 10/18/2026 09:05.
    pub fn morning() -> Self {
        Self(
            NaiveDate::from_ymd_opt(2026, 10, 18)
                .and_then(|d| d.and_hms_opt(9, 5, 0))
                .unwrap(),
        )
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ── Delay ─────────────────────────────────────────────────────

type SleepHook = Box<dyn FnMut(u64) + Send>;

/// Virtual time: sleeping only advances a counter and runs `hook` with the
/// total elapsed milliseconds.
pub struct ScriptedDelay {
    now_ms: u64,
    hook: SleepHook,
}

#[allow(dead_code)]
impl ScriptedDelay {
    pub fn new(hook: impl FnMut(u64) + Send + 'static) -> Self {
        Self {
            now_ms: 0,
            hook: Box::new(hook),
        }
    }

    pub fn idle() -> Self {
        Self::new(|_| {})
    }
}

impl DelayNs for ScriptedDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ms += u64::from(ns / 1_000_000);
        (self.hook)(self.now_ms);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
        (self.hook)(self.now_ms);
    }
}

// ── EventSink ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<AppEvent>>>);

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.lock().unwrap().push(*event);
    }
}
