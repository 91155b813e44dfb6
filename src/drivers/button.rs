//! ISR-latched, software-debounced push buttons.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  Each GPIO fires on the
//! falling edge; the ISR only stores the uptime in an atomic latch.  A
//! watcher thread polls every latch, applies the debounce window, and
//! invokes the callback registered for that button.
//!
//! ```text
//!  GPIO ISR ──store(ms)──▶ PressLatch ──poll──▶ ButtonPanel ──▶ callback
//! ```
//!
//! A press is accepted when its latch timestamp is at least the debounce
//! window after the previously accepted one.  Contact bounce inside the
//! window overwrites the latch but never produces a second press.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info};

use crate::drivers::task_pin::{self, Core};
use crate::error::Result;

/// The three front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// Green: cycle mode.
    Cycle,
    /// Red: raise set-point.
    Raise,
    /// Blue: lower set-point.
    Lower,
}

/// Raw press timestamp written from interrupt context.
///
/// `0` means "never pressed"; stored timestamps are bumped to at least 1.
#[derive(Debug, Clone, Default)]
pub struct PressLatch(Arc<AtomicU32>);

impl PressLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a falling edge.  Lock-free, safe from an ISR.
    pub fn record(&self, now_ms: u32) {
        self.0.store(now_ms.max(1), Ordering::Release);
    }

    fn load(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

pub struct ButtonDriver {
    id: ButtonId,
    latch: PressLatch,
    debounce_ms: u32,
    last_seen_ms: u32,
    last_accepted_ms: Option<u32>,
}

impl ButtonDriver {
    pub fn new(id: ButtonId, latch: PressLatch, debounce_ms: u32) -> Self {
        Self {
            id,
            latch,
            debounce_ms,
            last_seen_ms: 0,
            last_accepted_ms: None,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Check the latch.  Returns `true` once per debounced press.
    pub fn poll(&mut self) -> bool {
        let isr_ms = self.latch.load();
        if isr_ms == 0 || isr_ms == self.last_seen_ms {
            return false;
        }
        self.last_seen_ms = isr_ms;

        let accepted = match self.last_accepted_ms {
            None => true,
            Some(prev) => isr_ms.wrapping_sub(prev) >= self.debounce_ms,
        };
        if accepted {
            self.last_accepted_ms = Some(isr_ms);
        } else {
            debug!("{:?}: bounce at {}ms ignored", self.id, isr_ms);
        }
        accepted
    }
}

type PressCallback = Box<dyn FnMut() + Send>;

/// Owns every button and its callback; runs them on one watcher thread.
pub struct ButtonPanel {
    buttons: Vec<(ButtonDriver, PressCallback)>,
    after_poll: Vec<PressCallback>,
    poll_interval: Duration,
}

/// Stops a spawned [`ButtonPanel`] watcher.
#[derive(Debug, Clone, Default)]
pub struct PanelStop(Arc<AtomicBool>);

impl PanelStop {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl ButtonPanel {
    pub fn new(poll_interval_ms: u32) -> Self {
        Self {
            buttons: Vec::new(),
            after_poll: Vec::new(),
            poll_interval: Duration::from_millis(u64::from(poll_interval_ms.max(1))),
        }
    }

    /// Register `on_press` for `button`.
    pub fn register(&mut self, button: ButtonDriver, on_press: impl FnMut() + Send + 'static) {
        info!("Button {:?} registered", button.id());
        self.buttons.push((button, Box::new(on_press)));
    }

    /// Run `hook` after every poll pass.  ESP-IDF GPIO interrupts disarm
    /// themselves when they fire, so the firmware re-enables them here.
    pub fn after_poll(&mut self, hook: impl FnMut() + Send + 'static) {
        self.after_poll.push(Box::new(hook));
    }

    /// Poll every button once and fire callbacks.  Returns presses handled.
    pub fn poll_once(&mut self) -> usize {
        let mut fired = 0;
        for (button, on_press) in &mut self.buttons {
            if button.poll() {
                debug!("{:?} pressed", button.id());
                on_press();
                fired += 1;
            }
        }
        for hook in &mut self.after_poll {
            hook();
        }
        fired
    }

    /// Move the panel onto its own watcher thread.
    pub fn spawn(mut self) -> Result<(PanelStop, JoinHandle<()>)> {
        let stop = PanelStop::default();
        let watcher = stop.clone();
        let join = task_pin::spawn_on_core(Core::Pro, 4, 16, "buttons\0", move || {
            while !watcher.is_stopped() {
                self.poll_once();
                std::thread::sleep(self.poll_interval);
            }
            info!("Button watcher stopped");
        })?;
        Ok((stop, join))
    }
}
