//! Integration tests for the ThermostatController → indicators pipeline.
//!
//! Drive the controller through its public operations against the
//! recording mock and assert on the exact light commands issued.

use crate::mock_hw::{HwCall, MockHardware, RecordingSink};

use thermostat::app::commands::InputEvent;
use thermostat::app::controller::ThermostatController;
use thermostat::app::events::AppEvent;
use thermostat::app::indicators::{Indicator, IndicatorPair, IndicatorState};
use thermostat::config::ThermostatConfig;
use thermostat::error::{Error, SensorError};
use thermostat::fsm::Mode;

fn make_controller(temp_f: f32) -> (ThermostatController, MockHardware, RecordingSink) {
    let mut ctl = ThermostatController::new(&ThermostatConfig::default());
    let mut hw = MockHardware::at(temp_f);
    let mut sink = RecordingSink::new();
    ctl.start(&mut hw, &mut sink).unwrap();
    (ctl, hw, sink)
}

#[test]
fn full_cycle_drives_the_right_lights() {
    let (mut ctl, mut hw, mut sink) = make_controller(70.0);
    hw.clear_calls();

    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(ctl.mode(), Mode::Heat);
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Pulsing);
    assert_eq!(hw.light(Indicator::Cool), IndicatorState::Off);

    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(ctl.mode(), Mode::Cool);
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Off);
    assert_eq!(hw.light(Indicator::Cool), IndicatorState::SolidOn);

    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(ctl.mode(), Mode::Off);
    assert_eq!(hw.light(Indicator::Heat), IndicatorState::Off);
    assert_eq!(hw.light(Indicator::Cool), IndicatorState::Off);
}

#[test]
fn leaving_heat_turns_heat_off_before_cool_lights() {
    let (mut ctl, mut hw, mut sink) = make_controller(90.0);
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    hw.clear_calls();

    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    let calls = hw.calls();
    let heat_off = calls
        .iter()
        .position(|c| *c == HwCall::Light(Indicator::Heat, IndicatorState::Off))
        .expect("heat forced off");
    let cool_on = calls
        .iter()
        .position(|c| *c == HwCall::Light(Indicator::Cool, IndicatorState::Pulsing))
        .expect("cool pulsing above set-point");
    assert!(heat_off < cool_on);
}

#[test]
fn ties_are_satisfied_in_both_modes() {
    let (mut ctl, mut hw, mut sink) = make_controller(72.9);
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(
        ctl.compute_indicator_state(&mut hw).unwrap(),
        IndicatorPair {
            heat: IndicatorState::SolidOn,
            cool: IndicatorState::Off,
        }
    );
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(
        ctl.compute_indicator_state(&mut hw).unwrap(),
        IndicatorPair {
            heat: IndicatorState::Off,
            cool: IndicatorState::SolidOn,
        }
    );
}

#[test]
fn set_point_changes_are_unbounded_and_exact() {
    let (mut ctl, mut hw, mut sink) = make_controller(70.0);
    for _ in 0..200 {
        ctl.handle_input(InputEvent::RaiseSetPoint, &mut hw, &mut sink).unwrap();
    }
    assert_eq!(ctl.set_point(), 272);
    for _ in 0..400 {
        ctl.handle_input(InputEvent::LowerSetPoint, &mut hw, &mut sink).unwrap();
    }
    assert_eq!(ctl.set_point(), -128);
}

#[test]
fn status_line_matches_serial_format() {
    let (mut ctl, mut hw, mut sink) = make_controller(69.7);
    assert_eq!(ctl.status_line(&mut hw).unwrap().as_str(), "off,69,72");
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(ctl.status_line(&mut hw).unwrap().as_str(), "heat,69,72");
    hw.set_temperature(-0.5);
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    assert_eq!(ctl.status_line(&mut hw).unwrap().as_str(), "cool,-1,72");
}

#[test]
fn off_mode_never_reads_sensor_for_indicators() {
    let (mut ctl, mut hw, mut sink) = make_controller(70.0);
    hw.fail_sensor();
    assert_eq!(ctl.compute_indicator_state(&mut hw).unwrap(), IndicatorPair::OFF);
    ctl.refresh_indicators(&mut hw, &mut sink).unwrap();
    assert_eq!(hw.reads(), 0);
}

#[test]
fn sensor_failure_surfaces_from_set_point_change() {
    let (mut ctl, mut hw, mut sink) = make_controller(70.0);
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    hw.fail_sensor();
    let err = ctl
        .increment_set_point(&mut hw, &mut sink)
        .unwrap_err();
    assert_eq!(err, Error::Sensor(SensorError::Bus));
    // The change itself is not rolled back.
    assert_eq!(ctl.set_point(), 73);
}

#[test]
fn events_describe_each_operation() {
    let (mut ctl, mut hw, mut sink) = make_controller(70.0);
    ctl.cycle_mode(&mut hw, &mut sink).unwrap();
    ctl.increment_set_point(&mut hw, &mut sink).unwrap();

    let events = sink.events();
    assert_eq!(
        events[0],
        AppEvent::Started {
            mode: Mode::Off,
            set_point_f: 72
        }
    );
    assert!(events.contains(&AppEvent::ModeChanged {
        from: Mode::Off,
        to: Mode::Heat
    }));
    assert!(events.contains(&AppEvent::SetPointChanged(73)));
    assert!(events.contains(&AppEvent::IndicatorsUpdated {
        mode: Mode::Heat,
        temperature_f: 70,
        set_point_f: 73,
        pair: IndicatorPair {
            heat: IndicatorState::Pulsing,
            cool: IndicatorState::Off,
        },
    }));
}
