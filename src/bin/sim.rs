//! Host simulator for the thermostat.
//!
//! Runs the real schedule loop against simulated peripherals: the display
//! is drawn on stderr alongside the logs, so stdout carries only the
//! status records, one per line, as the serial link would.
//!
//! ```text
//! thermostat-sim [config.json]
//!
//!   m        cycle mode
//!   +        raise set-point
//!   -        lower set-point
//!   t <F>    set simulated temperature
//!   q        quit (also Ctrl-D or Ctrl-C)
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use thermostat::adapters::hardware::HardwareAdapter;
use thermostat::adapters::log_sink::LogEventSink;
use thermostat::adapters::sim::{ConsoleDisplay, SimPwm, SimSensor, SimTemperature};
use thermostat::adapters::time::{StdDelay, SystemClock};
use thermostat::app::commands::InputEvent;
use thermostat::config::ThermostatConfig;
use thermostat::drivers::indicator_led::IndicatorLed;
use thermostat::drivers::serial_reporter::SerialReporter;
use thermostat::events::ControllerHandle;
use thermostat::scheduler::ScheduleLoop;

/// Starting ambient temperature of the simulated room.
const INITIAL_TEMPERATURE_F: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConsoleCommand {
    Input(InputEvent),
    SetTemperature(f32),
    Quit,
}

fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next()? {
        "m" => ConsoleCommand::Input(InputEvent::CycleMode),
        "+" => ConsoleCommand::Input(InputEvent::RaiseSetPoint),
        "-" => ConsoleCommand::Input(InputEvent::LowerSetPoint),
        "t" => ConsoleCommand::SetTemperature(parts.next()?.parse().ok()?),
        "q" => ConsoleCommand::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn load_config() -> Result<ThermostatConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ThermostatConfig::default());
    };
    let doc = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = ThermostatConfig::from_json(&doc).map_err(|e| anyhow!("{path}: {e}"))?;
    info!("Config loaded from {}", path);
    Ok(config)
}

/// Read commands until `q` or end of input, then request shutdown.
fn run_console(handle: &ControllerHandle, ambient: &SimTemperature) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(ConsoleCommand::Input(event)) => {
                handle.send(event);
            }
            Some(ConsoleCommand::SetTemperature(f)) => ambient.set(f),
            Some(ConsoleCommand::Quit) => break,
            None => warn!("Unknown command {:?} (m, +, -, t <F>, q)", line.trim()),
        }
    }
    handle.request_shutdown();
}

type SimHardware<D, R> = HardwareAdapter<SimSensor, SimPwm, ConsoleDisplay<D>, R>;

/// Display frames and status records go to separate writers so the record
/// stream stays one clean line per report.
fn build_hardware<D: Write, R: Write>(
    config: &ThermostatConfig,
    ambient: &SimTemperature,
    display_out: D,
    report_out: R,
) -> SimHardware<D, R> {
    let heat = IndicatorLed::new(SimPwm::new("heat"), "heat", config.pulse_period_ms);
    let cool = IndicatorLed::new(SimPwm::new("cool"), "cool", config.pulse_period_ms);
    let display = ConsoleDisplay::new(display_out, usize::from(config.display_columns));
    HardwareAdapter::new(
        SimSensor::new(ambient.clone()),
        heat,
        cool,
        display,
        SerialReporter::new(report_out),
    )
}

/// Ctrl-C stops the loop the same way `q` does, so teardown still runs
/// before the worker is joined.
fn shutdown_on_interrupt(handle: ControllerHandle) -> impl FnMut() + Send + 'static {
    move || {
        warn!("Interrupted");
        handle.request_shutdown();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = load_config()?;
    config.validate().map_err(|e| anyhow!("config: {e}"))?;

    let ambient = SimTemperature::new(INITIAL_TEMPERATURE_F);
    let hw = build_hardware(&config, &ambient, io::stderr(), io::stdout());

    let (handle, worker) =
        ScheduleLoop::new(&config, hw, SystemClock, StdDelay, LogEventSink::new())
            .and_then(ScheduleLoop::spawn)
            .map_err(|e| anyhow!("schedule loop: {e}"))?;

    ctrlc::set_handler(shutdown_on_interrupt(handle.clone()))
        .context("installing Ctrl-C handler")?;

    // The console blocks on stdin; if the loop halts on its own the process
    // exits without waiting for another line.
    let console_handle = handle.clone();
    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || run_console(&console_handle, &ambient))
        .context("spawning console thread")?;

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("schedule loop panicked"))?;
    outcome.map_err(|e| anyhow!("schedule loop halted: {e}"))?;
    info!("Simulator stopped");
    Ok(())
}
