//! Indicator identities, states, and the pure decision table.
//!
//! | Mode | Condition        | Heat    | Cool    |
//! |------|------------------|---------|---------|
//! | Off  | —                | Off     | Off     |
//! | Heat | temp < setPoint  | Pulsing | Off     |
//! | Heat | temp ≥ setPoint  | SolidOn | Off     |
//! | Cool | temp > setPoint  | Off     | Pulsing |
//! | Cool | temp ≤ setPoint  | Off     | SolidOn |
//!
//! Pulsing means "working toward the target", solid means "target
//! satisfied".  A reading equal to the set-point is satisfied in both
//! Heat and Cool.

use crate::fsm::Mode;

/// The two status lights.  Each belongs to exactly one active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Red light, owned by [`Mode::Heat`].
    Heat,
    /// Blue light, owned by [`Mode::Cool`].
    Cool,
}

impl Indicator {
    pub const BOTH: [Indicator; 2] = [Indicator::Heat, Indicator::Cool];

    /// Mode whose activity this indicator reports.
    pub const fn owner(self) -> Mode {
        match self {
            Self::Heat => Mode::Heat,
            Self::Cool => Mode::Cool,
        }
    }
}

/// Visual state of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndicatorState {
    #[default]
    Off,
    SolidOn,
    Pulsing,
}

/// Desired state for both indicators at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorPair {
    pub heat: IndicatorState,
    pub cool: IndicatorState,
}

impl IndicatorPair {
    /// Both lights dark.
    pub const OFF: Self = Self {
        heat: IndicatorState::Off,
        cool: IndicatorState::Off,
    };

    pub fn get(&self, indicator: Indicator) -> IndicatorState {
        match indicator {
            Indicator::Heat => self.heat,
            Indicator::Cool => self.cool,
        }
    }
}

/// Map (mode, measured °F, set-point °F) to the indicator pair.
pub fn decide(mode: Mode, temp_f: i32, set_point_f: i32) -> IndicatorPair {
    match mode {
        Mode::Off => IndicatorPair::OFF,
        Mode::Heat => IndicatorPair {
            heat: if temp_f < set_point_f {
                IndicatorState::Pulsing
            } else {
                IndicatorState::SolidOn
            },
            cool: IndicatorState::Off,
        },
        Mode::Cool => IndicatorPair {
            heat: IndicatorState::Off,
            cool: if temp_f > set_point_f {
                IndicatorState::Pulsing
            } else {
                IndicatorState::SolidOn
            },
        },
    }
}
