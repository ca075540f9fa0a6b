//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need (a renderer to game state and previews, a toast layer
//! to notifications).

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{
    GameStateEvent, LifecycleEvent, Notification, NotificationKind, PreviewFrame,
};
