//! Run mode and cancellable suspension.
//!
//! Every delay in the runtime is a [`RunControl::pause`]: a sleep raced
//! against the run-mode watch channel. The pause fails as soon as the mode
//! leaves the state it was started under, which is how `stop_game`,
//! `reset` and `abort_preview` reach suspended callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, LifecycleEvent};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    #[default]
    Stopped,
    Running,
    Previewing,
}

/// Mode plus a generation counter bumped on every transition, so a waiter
/// can tell "still running" from "stopped and restarted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RunState {
    pub mode: RunMode,
    pub epoch: u64,
}

pub(crate) struct RunControl {
    tx: watch::Sender<RunState>,
    events: EventBus,
}

impl RunControl {
    pub(crate) fn new(events: EventBus) -> Self {
        let (tx, _rx) = watch::channel(RunState::default());
        Self { tx, events }
    }

    pub(crate) fn current(&self) -> RunState {
        *self.tx.borrow()
    }

    pub(crate) fn mode(&self) -> RunMode {
        self.current().mode
    }

    /// Switches to `mode` and returns the new state.
    pub(crate) fn set(&self, mode: RunMode) -> RunState {
        let mut previous = RunMode::Stopped;
        self.tx.send_modify(|state| {
            previous = state.mode;
            state.mode = mode;
            state.epoch += 1;
        });

        if previous != mode {
            tracing::info!(target: "runtime::pacing", from = %previous, to = %mode, "run mode changed");
            self.events
                .publish(Event::Lifecycle(LifecycleEvent::RunModeChanged { mode }));
        }
        self.current()
    }

    /// Switches to `mode` only if no transition happened since `epoch`.
    pub(crate) fn set_if(&self, epoch: u64, mode: RunMode) -> bool {
        if self.current().epoch != epoch {
            return false;
        }
        self.set(mode);
        true
    }

    /// Sleeps for `duration` unless the run state moves away from
    /// `expected` first.
    pub(crate) async fn pause(&self, duration: Duration, expected: RunState) -> Result<()> {
        self.watch().pause(duration, expected).await
    }

    /// Detached observer. It does not keep the control alive; once the
    /// control is dropped every pause fails.
    pub(crate) fn watch(&self) -> RunWatch {
        RunWatch {
            rx: self.tx.subscribe(),
        }
    }
}

pub(crate) struct RunWatch {
    rx: watch::Receiver<RunState>,
}

impl RunWatch {
    pub(crate) async fn pause(&mut self, duration: Duration, expected: RunState) -> Result<()> {
        if *self.rx.borrow_and_update() != expected {
            return Err(interrupted(expected));
        }
        if duration.is_zero() {
            return Ok(());
        }

        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = self.rx.changed() => {
                    if changed.is_err() || *self.rx.borrow_and_update() != expected {
                        return Err(interrupted(expected));
                    }
                }
            }
        }
    }
}

fn interrupted(expected: RunState) -> RuntimeError {
    match expected.mode {
        RunMode::Previewing => RuntimeError::PreviewAborted,
        _ => RuntimeError::Cancelled,
    }
}
