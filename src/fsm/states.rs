//! Concrete mode handlers and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  OFF ──[cycle]──▶ HEAT ──[cycle]──▶ COOL
//!   ▲                                  │
//!   └─────────────[cycle]──────────────┘
//! ```
//!
//! Leaving HEAT or COOL always extinguishes that mode's indicator, so a
//! stale solid or pulsing light never survives a mode change.

use super::context::ModeContext;
use super::{Mode, ModeDescriptor};
use crate::app::indicators::{Indicator, IndicatorState};
use log::debug;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; Mode::COUNT] {
    [
        // Index 0: Off
        ModeDescriptor {
            id: Mode::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
        },
        // Index 1: Heat
        ModeDescriptor {
            id: Mode::Heat,
            name: "Heat",
            on_enter: Some(heat_enter),
            on_exit: Some(heat_exit),
        },
        // Index 2: Cool
        ModeDescriptor {
            id: Mode::Cool,
            name: "Cool",
            on_enter: Some(cool_enter),
            on_exit: Some(cool_exit),
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut ModeContext) {
    ctx.force(Indicator::Heat, IndicatorState::Off);
    ctx.force(Indicator::Cool, IndicatorState::Off);
    debug!("Off: both indicators silenced");
}

// ═══════════════════════════════════════════════════════════════════════════
//  HEAT
// ═══════════════════════════════════════════════════════════════════════════

fn heat_enter(ctx: &mut ModeContext) {
    ctx.refresh_requested = true;
    debug!("Heat: indicator refresh requested");
}

fn heat_exit(ctx: &mut ModeContext) {
    ctx.force(Indicator::Heat, IndicatorState::Off);
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOL
// ═══════════════════════════════════════════════════════════════════════════

fn cool_enter(ctx: &mut ModeContext) {
    ctx.refresh_requested = true;
    debug!("Cool: indicator refresh requested");
}

fn cool_exit(ctx: &mut ModeContext) {
    ctx.force(Indicator::Cool, IndicatorState::Off);
}
