//! Runtime orchestration for the robot arena simulation.
//!
//! This crate wires the pure rules of `game-core` into a paced, cancellable
//! runtime. Consumers embed [`Runtime`] to load levels, drive the robot
//! through the Action API, and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, its configuration and builder
//! - [`api`] exposes the Action API, errors and the script abstraction
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`pacing`] holds the run mode and cancellable delays
//! - `workers` keeps the NPC loop internal to the crate
pub mod api;
pub mod events;
pub mod pacing;
mod preview;
pub mod runtime;
mod session;

mod workers;

pub use api::{ActionScript, Result, RuntimeError, ScriptOutcome, run_script};
pub use events::{
    Event, EventBus, GameStateEvent, LifecycleEvent, Notification, NotificationKind, PreviewFrame,
    Topic,
};
pub use pacing::RunMode;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
