//! Function-pointer finite state machine for the operating mode.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ModeTable                                   │
//! │  ┌───────┬────────────┬────────────┐         │
//! │  │ Mode  │ on_enter   │ on_exit    │         │
//! │  ├───────┼────────────┼────────────┤         │
//! │  │ Off   │ fn(ctx)    │ —          │         │
//! │  │ Heat  │ fn(ctx)    │ fn(ctx)    │         │
//! │  │ Cool  │ fn(ctx)    │ fn(ctx)    │         │
//! │  └───────┴────────────┴────────────┘         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Unlike a sensor-driven machine there is no per-tick update: the mode only
//! moves on an explicit [`ModeMachine::cycle`].  A cycle runs `on_exit` for
//! the current mode, advances along `Off → Heat → Cool → Off`, then runs
//! `on_enter` for the new one.  Handlers never touch hardware: they write
//! indicator requests into [`ModeContext`], which the controller applies.

pub mod context;
pub mod states;

use context::ModeContext;
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Operating mode of the thermostat.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Heat = 1,
    Cool = 2,
}

impl Mode {
    /// Total number of modes: used to size the table array.
    pub const COUNT: usize = 3;

    /// Cycle order starting from power-on.
    pub const ALL: [Mode; Mode::COUNT] = [Mode::Off, Mode::Heat, Mode::Cool];

    /// The mode that follows `self` in the fixed cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Off => Self::Heat,
            Self::Heat => Self::Cool,
            Self::Cool => Self::Off,
        }
    }

    /// Lower-case identifier used on the serial link.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
        }
    }

    /// Upper-case label used on the display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type ModeActionFn = fn(&mut ModeContext);

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct ModeDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The mode state machine.
pub struct ModeMachine {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [ModeDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Number of cycle events handled since construction.
    transitions: u64,
}

impl ModeMachine {
    /// Construct a machine with the given table, starting in `initial`.
    pub fn new(table: [ModeDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction.
    pub fn start(&mut self, ctx: &mut ModeContext) {
        info!("Mode machine starting in: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance to the next mode in the cycle and return it.
    ///
    /// `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn cycle(&mut self, ctx: &mut ModeContext) -> Mode {
        let next = self.current_mode().next();
        self.transition(next, ctx);
        next
    }

    /// The active mode.
    pub fn current_mode(&self) -> Mode {
        self.table[self.current].id
    }

    /// How many cycle events have been handled.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut ModeContext) {
        let next_idx = next as usize;

        info!(
            "Mode transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
