mod actor;
mod common;

pub use actor::{EnemyState, RobotState};
pub use common::{Direction, EnemyId, Position, Rotation};
