//! Schedule loop tests: display cadence, indicator refresh, status reports
//! and the halt path, all on virtual time.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::mock_hw::{FixedClock, HwCall, MockHardware, RecordingSink, ScriptedDelay};

use thermostat::adapters::time::StdDelay;
use thermostat::app::events::AppEvent;
use thermostat::app::indicators::{Indicator, IndicatorState};
use thermostat::config::ThermostatConfig;
use thermostat::error::{ConfigError, DisplayError, Error, ReportError, SensorError};
use thermostat::events::ControllerHandle;
use thermostat::fsm::Mode;
use thermostat::scheduler::ScheduleLoop;

const STAMP: &str = "10/18/2026 09:05";

type Loop = ScheduleLoop<MockHardware, FixedClock, ScriptedDelay, RecordingSink>;

fn make_loop(temp_f: f32, delay: ScriptedDelay) -> (Loop, MockHardware, RecordingSink) {
    let hw = MockHardware::at(temp_f);
    let sink = RecordingSink::new();
    let schedule = ScheduleLoop::new(
        &ThermostatConfig::default(),
        hw.clone(),
        FixedClock::morning(),
        delay,
        sink.clone(),
    )
    .unwrap();
    (schedule, hw, sink)
}

/// A delay whose hook can reach the loop's handle once it exists.
fn delay_with_handle(
    mut script: impl FnMut(u64, &ControllerHandle) + Send + 'static,
) -> (ScriptedDelay, Arc<OnceLock<ControllerHandle>>) {
    let slot = Arc::new(OnceLock::<ControllerHandle>::new());
    let hook_slot = slot.clone();
    let delay = ScriptedDelay::new(move |now_ms| {
        if let Some(handle) = hook_slot.get() {
            script(now_ms, handle);
        }
    });
    (delay, slot)
}

fn teardown_tail() -> Vec<HwCall> {
    vec![
        HwCall::Clear,
        HwCall::Release,
        HwCall::Light(Indicator::Heat, IndicatorState::Off),
        HwCall::Light(Indicator::Cool, IndicatorState::Off),
    ]
}

// ── Cadence against real output ───────────────────────────────

#[test]
fn first_ten_frames_follow_minor_cycle() {
    let (mut schedule, hw, _) = make_loop(70.4, ScriptedDelay::idle());
    schedule.start().unwrap();
    for _ in 0..10 {
        schedule.tick().unwrap();
    }

    let frames = hw.frames();
    assert_eq!(frames.len(), 10);
    for (i, (line1, line2)) in frames.iter().enumerate() {
        assert_eq!(line1, STAMP, "tick {}", i + 1);
        let expected = if i < 5 { "Temp: 70F" } else { "OFF SP:72F" };
        assert_eq!(line2, expected, "tick {}", i + 1);
    }
    assert_eq!(schedule.ticks(), 10);
}

#[test]
fn indicators_only_follow_temperature_on_refresh_ticks() {
    let (mut schedule, hw, _) = make_loop(70.0, ScriptedDelay::idle());
    schedule.start().unwrap();
    schedule.handle().cycle_mode();
    schedule.service_inputs().unwrap();
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Pulsing);

    hw.set_temperature(75.0);
    for _ in 0..9 {
        schedule.tick().unwrap();
    }
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Pulsing);

    schedule.tick().unwrap();
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::SolidOn);
    assert_eq!(hw.light(Indicator::Cool), IndicatorState::Off);
}

#[test]
fn status_report_every_thirty_ticks() {
    let (mut schedule, hw, sink) = make_loop(70.0, ScriptedDelay::idle());
    schedule.start().unwrap();

    for _ in 0..29 {
        schedule.tick().unwrap();
    }
    assert!(hw.reports().is_empty());

    schedule.tick().unwrap();
    assert_eq!(hw.reports(), vec!["off,70,72".to_owned()]);

    for _ in 0..31 {
        schedule.tick().unwrap();
    }
    assert_eq!(hw.reports().len(), 2);

    let reported = sink
        .events()
        .iter()
        .filter(|e| matches!(e, AppEvent::StatusReported(_)))
        .count();
    assert_eq!(reported, 2);
}

#[test]
fn report_follows_display_and_refresh_within_a_tick() {
    let (mut schedule, hw, _) = make_loop(70.0, ScriptedDelay::idle());
    schedule.start().unwrap();
    for _ in 0..29 {
        schedule.tick().unwrap();
    }
    hw.clear_calls();
    schedule.tick().unwrap();

    let calls = hw.calls();
    let lines = calls
        .iter()
        .position(|c| matches!(c, HwCall::Lines(..)))
        .unwrap();
    let report = calls
        .iter()
        .position(|c| matches!(c, HwCall::Report(_)))
        .unwrap();
    let light = calls
        .iter()
        .position(|c| matches!(c, HwCall::Light(..)))
        .unwrap();
    assert!(lines < light && light < report);
}

// ── Inputs ────────────────────────────────────────────────────

#[test]
fn queued_inputs_apply_in_arrival_order() {
    let (mut schedule, hw, sink) = make_loop(70.0, ScriptedDelay::idle());
    schedule.start().unwrap();

    let handle = schedule.handle();
    handle.cycle_mode();
    handle.raise_set_point();
    handle.raise_set_point();
    handle.lower_set_point();
    schedule.service_inputs().unwrap();

    assert_eq!(schedule.controller().mode(), Mode::Heat);
    assert_eq!(schedule.controller().set_point(), 73);
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Pulsing);

    let set_points: Vec<i32> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            AppEvent::SetPointChanged(sp) => Some(*sp),
            _ => None,
        })
        .collect();
    assert_eq!(set_points, vec![73, 74, 73]);
}

#[test]
fn presses_between_ticks_are_serviced_while_running() {
    let (delay, slot) = delay_with_handle(|now_ms, handle| match now_ms {
        500 => {
            handle.cycle_mode();
        }
        1500 => handle.request_shutdown(),
        _ => {}
    });
    let (schedule, hw, sink) = make_loop(70.0, delay);
    let _ = slot.set(schedule.handle());

    schedule.run().unwrap();

    assert!(sink.events().contains(&AppEvent::ModeChanged {
        from: Mode::Off,
        to: Mode::Heat
    }));
    assert!(hw
        .calls()
        .contains(&HwCall::Light(Indicator::Heat, IndicatorState::Pulsing)));
    let frames = hw.frames();
    assert_eq!(frames.len(), 2);
}

// ── Shutdown and halt ─────────────────────────────────────────

#[test]
fn requested_shutdown_tears_down_cleanly() {
    let (delay, slot) = delay_with_handle(|now_ms, handle| {
        if now_ms >= 3000 {
            handle.request_shutdown();
        }
    });
    let (schedule, hw, sink) = make_loop(70.0, delay);
    let _ = slot.set(schedule.handle());

    assert_eq!(schedule.run(), Ok(()));

    assert_eq!(hw.frames().len(), 3);
    assert_eq!(hw.state().advanced_ms, 3000);
    let calls = hw.calls();
    assert!(calls.ends_with(&teardown_tail()));
    assert_eq!(sink.events().last(), Some(&AppEvent::Halted(None)));
}

#[test]
fn shutdown_before_run_still_tears_down() {
    let (schedule, hw, sink) = make_loop(70.0, ScriptedDelay::idle());
    schedule.handle().request_shutdown();

    assert_eq!(schedule.run(), Ok(()));

    assert!(hw.frames().is_empty());
    assert!(hw.calls().ends_with(&teardown_tail()));
    assert_eq!(sink.events().last(), Some(&AppEvent::Halted(None)));
}

#[test]
fn sensor_failure_halts_and_tears_down() {
    let (schedule, hw, sink) = make_loop(70.0, ScriptedDelay::idle());
    hw.fail_sensor();

    let err = schedule.run().unwrap_err();
    assert_eq!(err, Error::Sensor(SensorError::Bus));

    // Tick 1 needs a reading for "Temp:", so nothing was drawn.
    assert!(hw.frames().is_empty());
    assert!(hw.calls().ends_with(&teardown_tail()));
    assert_eq!(
        sink.events().last(),
        Some(&AppEvent::Halted(Some(Error::Sensor(SensorError::Bus))))
    );
}

#[test]
fn display_failure_propagates() {
    let (schedule, hw, sink) = make_loop(70.0, ScriptedDelay::idle());
    hw.state().fail_display = true;

    assert_eq!(schedule.run(), Err(Error::Display(DisplayError::Pin)));
    assert!(hw.calls().ends_with(&teardown_tail()));
    assert!(matches!(
        sink.events().last(),
        Some(AppEvent::Halted(Some(Error::Display(_))))
    ));
}

#[test]
fn report_failure_halts_on_first_report_tick() {
    let (schedule, hw, _) = make_loop(70.0, ScriptedDelay::idle());
    hw.state().fail_report = true;

    assert_eq!(schedule.run(), Err(Error::Report(ReportError::Timeout)));
    assert_eq!(hw.frames().len(), 30);
    assert!(hw.reports().is_empty());
}

#[test]
fn invalid_config_is_refused_before_running() {
    let config = ThermostatConfig {
        input_poll_interval_ms: 0,
        ..ThermostatConfig::default()
    };
    let hw = MockHardware::at(70.0);
    let built = ScheduleLoop::new(
        &config,
        hw.clone(),
        FixedClock::morning(),
        ScriptedDelay::idle(),
        RecordingSink::new(),
    );
    assert!(matches!(
        built.err(),
        Some(Error::Config(ConfigError::ValidationFailed(_)))
    ));
    assert!(hw.calls().is_empty());
}

// ── Threaded ──────────────────────────────────────────────────

#[test]
fn spawned_loop_stops_on_request() {
    let config = ThermostatConfig {
        tick_interval_ms: 20,
        input_poll_interval_ms: 5,
        ..ThermostatConfig::default()
    };
    let hw = MockHardware::at(70.0);
    let sink = RecordingSink::new();
    let schedule =
        ScheduleLoop::new(&config, hw.clone(), FixedClock::morning(), StdDelay, sink.clone())
            .unwrap();

    let (handle, worker) = schedule.spawn().unwrap();
    handle.cycle_mode();
    std::thread::sleep(Duration::from_millis(100));
    handle.request_shutdown();

    let outcome = worker.join().expect("loop thread panicked");
    assert_eq!(outcome, Ok(()));
    assert!(!hw.frames().is_empty());
    assert!(hw.calls().ends_with(&teardown_tail()));
    assert!(sink.events().contains(&AppEvent::ModeChanged {
        from: Mode::Off,
        to: Mode::Heat
    }));
}
