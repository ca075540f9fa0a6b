//! Mutable per-run entity state.
//!
//! [`EntitiesState`] owns the robot, the enemy roster, the collected-coin set
//! and the defeat counter. It is always rebuilt from a [`LevelDefinition`] by
//! value, so a reset never observes mutations from a previous run. Runtime
//! layers clone or query this state but mutate it exclusively through the
//! engine.
pub mod types;

use std::collections::BTreeSet;

pub use types::{Direction, EnemyId, EnemyState, Position, RobotState, Rotation};

use crate::level::LevelDefinition;

/// Canonical snapshot of everything that changes during a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    pub robot: RobotState,
    /// Enemies in fixed list order. Defeated entries are kept.
    pub enemies: Vec<EnemyState>,
    /// Coins picked up this run. Never shrinks within a run.
    pub collected_coins: BTreeSet<Position>,
    pub defeated_enemies: u32,
}

impl EntitiesState {
    /// Builds fresh state from a level template.
    ///
    /// Every field is copied out of the template: the robot starts at full
    /// health, every enemy at full health with its play-head at zero.
    pub fn from_level(level: &LevelDefinition) -> Self {
        let robot = RobotState::new(level.robot_start.position, level.robot_start.direction);
        let enemies = level
            .enemies
            .iter()
            .map(|template| {
                EnemyState::new(
                    template.id,
                    template.position,
                    template.direction,
                    template.behavior.clone(),
                )
            })
            .collect();

        Self {
            robot,
            enemies,
            collected_coins: BTreeSet::new(),
            defeated_enemies: 0,
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &EnemyState> {
        self.enemies.iter().filter(|enemy| enemy.is_alive())
    }

    /// Index of the living enemy standing on `position`.
    pub fn living_enemy_at(&self, position: Position) -> Option<usize> {
        self.enemies
            .iter()
            .position(|enemy| enemy.is_alive() && enemy.position == position)
    }

    pub fn is_enemy_at(&self, position: Position) -> bool {
        self.living_enemy_at(position).is_some()
    }

    /// First orthogonal neighbour of the robot (up, right, down, left) that
    /// holds a living enemy.
    pub fn adjacent_enemy_direction(&self) -> Option<Direction> {
        self.robot
            .position
            .neighbours()
            .find(|(_, cell)| self.is_enemy_at(*cell))
            .map(|(direction, _)| direction)
    }

    pub fn is_enemy_adjacent(&self) -> bool {
        self.adjacent_enemy_direction().is_some()
    }

    /// Nearest living enemy by Euclidean distance; ties go to the earlier
    /// entry in list order.
    pub fn nearest_enemy(&self) -> Option<&EnemyState> {
        let origin = self.robot.position;
        self.living_enemies().fold(None, |best: Option<&EnemyState>, enemy| match best {
            Some(current)
                if current.position.distance_squared(origin)
                    <= enemy.position.distance_squared(origin) =>
            {
                Some(current)
            }
            _ => Some(enemy),
        })
    }

    pub fn collected_count(&self) -> usize {
        self.collected_coins.len()
    }
}
