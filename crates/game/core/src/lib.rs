//! Deterministic rules for the robot arena shared across the runtime and tools.
//!
//! `game-core` defines the canonical rules (map geometry, entity state, combat,
//! enemy behaviour, navigation and objectives) and exposes pure, synchronous
//! APIs. Nothing in this crate sleeps or spawns: pacing, cancellation and the
//! autonomous NPC loop belong to the `runtime` crate. All state mutation flows
//! through [`engine::GameEngine`].
pub mod behavior;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod level;
pub mod navigation;
pub mod objective;
pub mod state;

pub use behavior::{EnemyAction, NpcTurn, ScriptStep};
pub use combat::{AttackOutcome, AttackResult};
pub use config::{GameConfig, PacingConfig};
pub use engine::{EnemyStrike, GameEngine, MoveOutcome};
pub use env::{CellKind, WorldMap};
pub use error::{LevelError, MapError};
pub use level::{EnemyTemplate, Level, LevelDefinition, RobotStart, WinCondition};
pub use navigation::{EnemyOccupancy, find_path, turns_between};
pub use state::{
    Direction, EnemyId, EnemyState, EntitiesState, Position, RobotState, Rotation,
};
