//! Errors raised while building static level data.
//!
//! Gameplay itself never fails: blocked moves, missed attacks and unreachable
//! targets are ordinary outcomes reported through return values. Only
//! malformed level input is an error.

use crate::state::{EnemyId, Position};

/// Failure to parse a character grid into a [`crate::env::WorldMap`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell '{symbol}' at {position}")]
    UnknownCell { symbol: char, position: Position },
}

/// Failure to validate a level definition against its own map.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelError {
    #[error("invalid map: {0}")]
    Map(#[from] MapError),

    #[error("robot start {position} is not walkable")]
    RobotStartBlocked { position: Position },

    #[error("enemy {id} starts on non-walkable cell {position}")]
    EnemyStartBlocked { id: EnemyId, position: Position },

    #[error("enemy {id} shares its start cell {position} with another entity")]
    EnemyStartOccupied { id: EnemyId, position: Position },

    #[error("coin at {position} is not walkable")]
    CoinBlocked { position: Position },

    #[error("goal {position} is not walkable")]
    GoalBlocked { position: Position },
}
