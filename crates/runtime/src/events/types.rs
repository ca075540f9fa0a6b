//! Event types for different topics.

use std::time::Duration;

use game_core::{EnemyState, EntitiesState};
use serde::{Deserialize, Serialize};

use crate::pacing::RunMode;

/// Events related to canonical game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// Published after every mutating action, tick, load and reset.
    StateChanged { state: Box<EntitiesState> },

    CoinsUpdated { collected: usize, total: usize },

    /// First satisfaction of the win condition in this run.
    LevelCompleted { level_id: String },
}

/// Category of a timed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    BackAttack,
    EnemyDefeated,
    HealthRestored,
    LevelComplete,
    RobotDefeated,
    Message,
}

/// Timed text for the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    /// How long the text should stay visible.
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            duration,
        }
    }

    pub fn back_attack() -> Self {
        Self::new(
            NotificationKind::BackAttack,
            "Back attack! +3 damage",
            Duration::from_secs(2),
        )
    }

    pub fn enemy_defeated() -> Self {
        Self::new(
            NotificationKind::EnemyDefeated,
            "Enemy defeated!",
            Duration::from_secs(2),
        )
    }

    pub fn health_restored() -> Self {
        Self::new(
            NotificationKind::HealthRestored,
            "Health restored!",
            Duration::from_secs(2),
        )
    }

    pub fn level_complete() -> Self {
        Self::new(
            NotificationKind::LevelComplete,
            "Level Complete!",
            Duration::from_secs(5),
        )
    }

    pub fn robot_defeated() -> Self {
        Self::new(
            NotificationKind::RobotDefeated,
            "Game Over! You were defeated!",
            Duration::from_secs(5),
        )
    }
}

/// One step of a behaviour preview, carrying the scratch enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewFrame {
    pub cycle: u32,
    pub enemy_index: usize,
    pub enemies: Vec<EnemyState>,
}

/// Run-mode and level lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    RunModeChanged { mode: RunMode },
    LevelLoaded { level_id: String },
    Reset { level_id: String },
}
