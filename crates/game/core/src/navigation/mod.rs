//! Breadth-first path search on the four-connected grid.
//!
//! Neighbours are expanded in the fixed order up, right, down, left, so ties
//! between equally short paths always resolve the same way. The search stops
//! as soon as the goal is dequeued.

use std::collections::VecDeque;

use crate::env::WorldMap;
use crate::state::{Direction, EntitiesState, Position, Rotation};

/// How living enemies affect the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyOccupancy {
    /// Cells holding a living enemy are impassable, except the goal itself.
    AvoidExceptGoal,
    /// Enemies are not obstacles; only walls are.
    Ignore,
}

/// Shortest sequence of unit steps from `start` to `goal`.
///
/// Returns `Some(vec![])` when already there and `None` when the goal is not
/// walkable or not reachable.
pub fn find_path(
    map: &WorldMap,
    state: &EntitiesState,
    start: Position,
    goal: Position,
    occupancy: EnemyOccupancy,
) -> Option<Vec<Direction>> {
    if start == goal {
        return Some(Vec::new());
    }
    if !map.is_walkable(goal) {
        return None;
    }
    let start_index = map.index(start)?;

    let passable = |cell: Position| -> bool {
        if !map.is_walkable(cell) {
            return false;
        }
        match occupancy {
            EnemyOccupancy::Ignore => true,
            EnemyOccupancy::AvoidExceptGoal => cell == goal || !state.is_enemy_at(cell),
        }
    };

    // parent[i] = (previous cell index, step taken to reach i)
    let mut parent: Vec<Option<(usize, Direction)>> = vec![None; map.cell_count()];
    let mut visited = vec![false; map.cell_count()];
    let mut queue = VecDeque::from([start]);
    visited[start_index] = true;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(reconstruct(map, &parent, start_index, goal));
        }
        let current_index = map.index(current)?;

        for (direction, next) in current.neighbours() {
            let Some(next_index) = map.index(next) else {
                continue;
            };
            if visited[next_index] || !passable(next) {
                continue;
            }
            visited[next_index] = true;
            parent[next_index] = Some((current_index, direction));
            queue.push_back(next);
        }
    }

    tracing::debug!(target: "game_core::navigation", %start, %goal, "no path");
    None
}

fn reconstruct(
    map: &WorldMap,
    parent: &[Option<(usize, Direction)>],
    start_index: usize,
    goal: Position,
) -> Vec<Direction> {
    let mut steps = Vec::new();
    let mut cursor = map.index(goal);
    while let Some(index) = cursor {
        if index == start_index {
            break;
        }
        match parent[index] {
            Some((previous, direction)) => {
                steps.push(direction);
                cursor = Some(previous);
            }
            None => break,
        }
    }
    steps.reverse();
    steps
}

/// Quarter turns needed to go from `current` to `target`.
///
/// A half turn goes right-right when facing right or up, left-left otherwise.
pub fn turns_between(current: Direction, target: Direction) -> &'static [Rotation] {
    const NONE: &[Rotation] = &[];
    const LEFT: &[Rotation] = &[Rotation::Left];
    const RIGHT: &[Rotation] = &[Rotation::Right];
    const RIGHT_RIGHT: &[Rotation] = &[Rotation::Right, Rotation::Right];
    const LEFT_LEFT: &[Rotation] = &[Rotation::Left, Rotation::Left];

    if current == target {
        NONE
    } else if current.rotated_left() == target {
        LEFT
    } else if current.rotated_right() == target {
        RIGHT
    } else if matches!(current, Direction::Right | Direction::Up) {
        RIGHT_RIGHT
    } else {
        LEFT_LEFT
    }
}
