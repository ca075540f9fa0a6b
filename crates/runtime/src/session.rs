//! The loaded level and its canonical entity state.

use std::sync::Arc;

use game_core::{EntitiesState, GameEngine, Level};

use crate::events::{Event, EventBus, GameStateEvent, Notification};

/// Canonical state of the level currently in play.
pub(crate) struct ActiveLevel {
    pub level: Arc<Level>,
    pub state: EntitiesState,
    /// Set the first time the win condition holds; cleared by reset.
    pub completed: bool,
}

impl ActiveLevel {
    pub fn new(level: Arc<Level>) -> Self {
        let state = level.initial_state();
        Self {
            level,
            state,
            completed: false,
        }
    }

    /// Rebuilds entities from the level template.
    pub fn reset(&mut self) {
        self.state = self.level.initial_state();
        self.completed = false;
    }

    pub fn engine(&mut self) -> GameEngine<'_> {
        GameEngine::new(&self.level, &mut self.state)
    }

    pub fn publish_state(&self, events: &EventBus) {
        events.publish(Event::GameState(GameStateEvent::StateChanged {
            state: Box::new(self.state.clone()),
        }));
    }

    pub fn publish_coins(&self, events: &EventBus) {
        events.publish(Event::GameState(GameStateEvent::CoinsUpdated {
            collected: self.state.collected_count(),
            total: self.level.total_coins(),
        }));
    }

    /// Latches completion the first time the objective holds.
    pub fn check_completion(&mut self, events: &EventBus) {
        if self.completed || !self.level.win_condition().is_satisfied(&self.state) {
            return;
        }
        self.completed = true;

        tracing::info!(target: "runtime::session", level = self.level.id(), "level complete");
        events.publish(Event::GameState(GameStateEvent::LevelCompleted {
            level_id: self.level.id().to_owned(),
        }));
        events.publish(Event::Notification(Notification::level_complete()));
    }
}

/// Everything guarded by the session lock.
#[derive(Default)]
pub(crate) struct Session {
    pub active: Option<ActiveLevel>,
}
