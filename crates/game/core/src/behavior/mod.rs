//! Enemy decision making.
//!
//! An NPC tick selects at most one actor ([`select_actor`]). An engaged enemy
//! turns to the robot and strikes; otherwise the first living enemy advances
//! its cyclic script by one primitive ([`step_script`]).

use crate::env::WorldMap;
use crate::state::{Direction, EnemyState, EntitiesState, Position};

/// Scripted enemy primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EnemyAction {
    MoveForward,
    TurnLeft,
    TurnRight,
}

/// Which enemy acts during a tick, and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NpcTurn {
    /// No living enemies.
    Idle,
    /// The enemy at `index` runs its next script primitive.
    Scripted { index: usize },
    /// The enemy at `index` is engaged and attacks the robot.
    Strike { index: usize },
}

impl NpcTurn {
    pub fn is_strike(self) -> bool {
        matches!(self, NpcTurn::Strike { .. })
    }
}

/// Result of advancing one enemy's script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    /// Script is empty; nothing happened.
    Empty,
    Moved { from: Position, to: Position },
    Turned(Direction),
    /// Forward cell was blocked; the enemy adopted the given facing instead.
    Reoriented(Direction),
    /// Forward cell was blocked in every candidate direction.
    Stuck,
    /// Engaged enemies hold their ground on `MoveForward`.
    Held,
}

/// The robot stands on one of the enemy's three non-back neighbours.
pub fn is_engaged(enemy: &EnemyState, robot: Position) -> bool {
    enemy.is_alive() && enemy.position.is_adjacent(robot) && enemy.back() != robot
}

pub fn any_engaged(state: &EntitiesState) -> bool {
    let robot = state.robot.position;
    state.enemies.iter().any(|enemy| is_engaged(enemy, robot))
}

/// Picks the single actor for this tick: the first engaged enemy in list
/// order, else the first living one.
pub fn select_actor(state: &EntitiesState) -> NpcTurn {
    let robot = state.robot.position;
    if let Some(index) = state
        .enemies
        .iter()
        .position(|enemy| is_engaged(enemy, robot))
    {
        return NpcTurn::Strike { index };
    }

    state
        .enemies
        .iter()
        .position(EnemyState::is_alive)
        .map_or(NpcTurn::Idle, |index| NpcTurn::Scripted { index })
}

/// Turns `enemy` towards an orthogonally adjacent `target`. Non-adjacent
/// targets leave the facing unchanged.
pub fn face_towards(enemy: &mut EnemyState, target: Position) {
    if let Some(direction) = Direction::from_delta(enemy.position.delta_to(target)) {
        enemy.direction = direction;
    }
}

/// Executes the next primitive of enemy `index` and advances its play-head.
pub fn step_script(map: &WorldMap, state: &mut EntitiesState, index: usize) -> ScriptStep {
    let robot = state.robot.position;
    let Some(enemy) = state.enemies.get(index) else {
        return ScriptStep::Empty;
    };
    let Some(action) = enemy.current_action() else {
        return ScriptStep::Empty;
    };
    let engaged = is_engaged(enemy, robot);

    let step = match action {
        EnemyAction::MoveForward if engaged => ScriptStep::Held,
        EnemyAction::MoveForward => {
            let from = enemy.position;
            let to = enemy.front();
            if is_open(map, state, to) {
                state.enemies[index].position = to;
                ScriptStep::Moved { from, to }
            } else {
                match reorient_to_open_direction(map, state, index) {
                    Some(direction) => ScriptStep::Reoriented(direction),
                    None => ScriptStep::Stuck,
                }
            }
        }
        EnemyAction::TurnLeft => {
            let enemy = &mut state.enemies[index];
            enemy.direction = enemy.direction.rotated_left();
            ScriptStep::Turned(enemy.direction)
        }
        EnemyAction::TurnRight => {
            let enemy = &mut state.enemies[index];
            enemy.direction = enemy.direction.rotated_right();
            ScriptStep::Turned(enemy.direction)
        }
    };

    state.enemies[index].advance_play_head();
    step
}

/// Tries clockwise, then counter-clockwise, then the reverse facing, and
/// adopts the first one whose forward cell is open. Does not move.
pub fn reorient_to_open_direction(
    map: &WorldMap,
    state: &mut EntitiesState,
    index: usize,
) -> Option<Direction> {
    let enemy = state.enemies.get(index)?;
    let position = enemy.position;
    let current = enemy.direction;

    let open = [
        current.rotated_right(),
        current.rotated_left(),
        current.reversed(),
    ]
    .into_iter()
    .find(|candidate| is_open(map, state, position.step(*candidate)))?;

    state.enemies[index].direction = open;
    Some(open)
}

fn is_open(map: &WorldMap, state: &EntitiesState, cell: Position) -> bool {
    map.is_walkable(cell) && !state.is_enemy_at(cell)
}
