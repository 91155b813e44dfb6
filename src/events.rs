//! Input hand-off between producers and the schedule loop.
//!
//! Button handlers and the simulator console run on their own threads.
//! They never touch controller state directly: each press becomes an
//! [`InputEvent`] pushed into a bounded channel, and the schedule loop
//! drains it between ticks.  Shutdown is a separate flag the loop polls.
//!
//! ```text
//! ┌─────────────┐                ┌──────────────┐     ┌──────────────┐
//! │ Button task │──InputEvent──▶│              │     │              │
//! │ Sim console │──InputEvent──▶│  InputQueue  │────▶│ ScheduleLoop │
//! │             │──shutdown───┐ │  (bounded)   │     │  (consumer)  │
//! └─────────────┘             │ └──────────────┘     └──────▲───────┘
//!                             └──── ShutdownSignal ─────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::commands::InputEvent;

/// Maximum number of presses waiting for the loop.
pub const INPUT_QUEUE_DEPTH: usize = 16;

/// Bounded MPMC queue of pending presses.
pub struct InputQueue {
    channel: Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>,
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking.  Returns `false` if the queue is full and
    /// the press was dropped.
    pub fn push(&self, event: InputEvent) -> bool {
        if self.channel.try_send(event).is_err() {
            warn!("Input queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Next pending press, if any.
    pub fn pop(&self) -> Option<InputEvent> {
        self.channel.try_receive().ok()
    }

    /// Drain every pending press in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(InputEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// One-way latch asking the schedule loop to stop at its next poll.
#[derive(Debug, Default)]
pub struct ShutdownSignal(AtomicBool);

impl ShutdownSignal {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Cloneable handle given to input producers.
///
/// Every method only enqueues or sets a flag, so all of them are safe to
/// call from any thread while the loop is running.
#[derive(Clone, Default)]
pub struct ControllerHandle {
    queue: Arc<InputQueue>,
    shutdown: Arc<ShutdownSignal>,
}

impl ControllerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, event: InputEvent) -> bool {
        self.queue.push(event)
    }

    pub fn cycle_mode(&self) -> bool {
        self.send(InputEvent::CycleMode)
    }

    pub fn raise_set_point(&self) -> bool {
        self.send(InputEvent::RaiseSetPoint)
    }

    pub fn lower_set_point(&self) -> bool {
        self.send(InputEvent::LowerSetPoint)
    }

    pub fn request_shutdown(&self) {
        if !self.shutdown.is_requested() {
            info!("Shutdown requested");
        }
        self.shutdown.request();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.is_requested()
    }

    pub(crate) fn queue(&self) -> &InputQueue {
        &self.queue
    }
}
