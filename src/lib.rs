//! Thermostat controller library.
//!
//! Exposes the control core, drivers and adapters to the firmware binary,
//! the host simulator and the integration tests.  All ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module.
//!
//! ```text
//!  buttons ──▶ ControllerHandle ──▶ ScheduleLoop ──▶ display / LEDs / UART
//!                                      │
//!                               ThermostatController
//!                               (ModeMachine · SetPoint)
//! ```

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod scheduler;
pub mod status;

pub mod adapters;
pub mod drivers;

mod esp_link_shims;

pub use error::{Error, Result};
