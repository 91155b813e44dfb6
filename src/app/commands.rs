//! Inbound input events.
//!
//! One per physical button.  They carry no payload and are valid in every
//! mode, so there is no rejection path.  Producers (button handlers, the
//! simulator console) enqueue them through a
//! [`ControllerHandle`](crate::events::ControllerHandle); the schedule loop
//! applies them to the [`ThermostatController`](super::controller::ThermostatController).

/// Events that input adapters can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Advance Off → Heat → Cool → Off.
    CycleMode,

    /// Raise the set-point by one degree.
    RaiseSetPoint,

    /// Lower the set-point by one degree.
    LowerSetPoint,
}
