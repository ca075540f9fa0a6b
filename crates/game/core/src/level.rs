//! Level templates and their validated, playable form.
//!
//! A [`LevelDefinition`] is authored data (usually RON). [`Level`] pairs it
//! with the parsed [`WorldMap`] after checking that every entity starts on a
//! walkable cell. The definition is the reset template: entity state is
//! always rebuilt from it by value.

use crate::behavior::EnemyAction;
use crate::env::WorldMap;
use crate::error::LevelError;
use crate::state::{Direction, EnemyId, EntitiesState, Position};

/// Where and how the robot starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotStart {
    pub position: Position,
    pub direction: Direction,
}

/// Spawn template for one enemy. Enemies always spawn at full health.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyId,
    pub position: Position,
    pub direction: Direction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: Vec<EnemyAction>,
}

/// Level objective. Unset subgoals are vacuously satisfied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WinCondition {
    pub required_coins: Option<u32>,
    pub required_enemies: Option<u32>,
    pub goal: Option<Position>,
}

/// Authored level data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hint: Option<String>,
    /// Character rows: `#` wall, `.` or space floor, `H` health restore.
    pub map: Vec<String>,
    pub robot_start: RobotStart,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemies: Vec<EnemyTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub coins: Vec<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub win_condition: WinCondition,
}

impl LevelDefinition {
    /// Parses the map and validates entity placement.
    pub fn build(self) -> Result<Level, LevelError> {
        Level::new(self)
    }
}

/// A validated level: template plus parsed geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    definition: LevelDefinition,
    map: WorldMap,
}

impl Level {
    pub fn new(definition: LevelDefinition) -> Result<Self, LevelError> {
        let map = WorldMap::parse(definition.map.as_slice())?;

        let start = definition.robot_start.position;
        if !map.is_walkable(start) {
            return Err(LevelError::RobotStartBlocked { position: start });
        }

        let mut occupied = vec![start];
        for enemy in &definition.enemies {
            if !map.is_walkable(enemy.position) {
                return Err(LevelError::EnemyStartBlocked {
                    id: enemy.id,
                    position: enemy.position,
                });
            }
            if occupied.contains(&enemy.position) {
                return Err(LevelError::EnemyStartOccupied {
                    id: enemy.id,
                    position: enemy.position,
                });
            }
            occupied.push(enemy.position);
        }

        if let Some(position) = definition.coins.iter().find(|coin| !map.is_walkable(**coin)) {
            return Err(LevelError::CoinBlocked {
                position: *position,
            });
        }

        if let Some(goal) = definition.win_condition.goal
            && !map.is_walkable(goal)
        {
            return Err(LevelError::GoalBlocked { position: goal });
        }

        Ok(Self { definition, map })
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn win_condition(&self) -> &WinCondition {
        &self.definition.win_condition
    }

    pub fn coins(&self) -> &[Position] {
        &self.definition.coins
    }

    pub fn total_coins(&self) -> usize {
        self.definition.coins.len()
    }

    pub fn is_coin(&self, position: Position) -> bool {
        self.definition.coins.contains(&position)
    }

    /// Fresh entity state copied out of the template.
    pub fn initial_state(&self) -> EntitiesState {
        EntitiesState::from_level(&self.definition)
    }
}
