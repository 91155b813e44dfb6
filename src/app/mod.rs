//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules of the thermostat: the mode
//! cycle, set-point adjustment, and the indicator decision table.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod controller;
pub mod events;
pub mod indicators;
pub mod ports;
