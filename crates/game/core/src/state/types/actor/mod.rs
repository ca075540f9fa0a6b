//! Robot and enemy records.

use super::{Direction, EnemyId, Position};
use crate::behavior::EnemyAction;
use crate::config::GameConfig;

/// The player-controlled robot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotState {
    pub position: Position,
    pub direction: Direction,
    /// Real-valued health; enemy hits are fractional.
    pub health: f64,
}

impl RobotState {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
            health: GameConfig::ROBOT_MAX_HEALTH,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// The cell the robot is facing.
    pub fn front(&self) -> Position {
        self.position.step(self.direction)
    }
}

/// A scripted opponent.
///
/// Defeated enemies stay in the list with `health <= 0` and are ignored by
/// collision, AI and targeting.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyState {
    pub id: EnemyId,
    pub position: Position,
    pub direction: Direction,
    pub health: f64,
    /// Cyclic behaviour script.
    pub behavior: Vec<EnemyAction>,
    /// Index of the next primitive to execute.
    pub play_head: usize,
}

impl EnemyState {
    pub fn new(
        id: EnemyId,
        position: Position,
        direction: Direction,
        behavior: Vec<EnemyAction>,
    ) -> Self {
        Self {
            id,
            position,
            direction,
            health: GameConfig::ENEMY_MAX_HEALTH,
            behavior,
            play_head: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// The cell the enemy is facing.
    pub fn front(&self) -> Position {
        self.position.step(self.direction)
    }

    /// The cell directly behind the enemy.
    pub fn back(&self) -> Position {
        self.position.step(self.direction.reversed())
    }

    /// Next scripted primitive, if the script is non-empty.
    pub fn current_action(&self) -> Option<EnemyAction> {
        self.behavior.get(self.play_head).copied()
    }

    /// Moves the play-head forward, wrapping at the end of the script.
    pub fn advance_play_head(&mut self) {
        if !self.behavior.is_empty() {
            self.play_head = (self.play_head + 1) % self.behavior.len();
        }
    }
}
