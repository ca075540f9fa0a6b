//! Path-following built on the primitive actions.
//!
//! The search itself is [`game_core::find_path`]; this module replays the
//! resulting directions as turns and forward steps through the Action API,
//! so every step pays its delay and yields an NPC tick.

use tracing::debug;

use game_core::{Direction, EnemyOccupancy, Position, Rotation, find_path, turns_between};

use super::errors::{Result, RuntimeError};
use crate::pacing::RunMode;
use crate::runtime::Runtime;

impl Runtime {
    /// Walks to the cell at `(x, y)` relative to the map origin.
    ///
    /// Cells held by living enemies are avoided except the destination.
    /// Targets outside the map or on a wall are a script fault; an
    /// unreachable target is silently ignored.
    pub async fn move_to_position(&self, x: i32, y: i32) -> Result<()> {
        if self.inner.running_state("move_to_position").is_none() {
            return Ok(());
        }

        let path = {
            let session = self.inner.session.lock().await;
            let Some(active) = session.active.as_ref() else {
                return Ok(());
            };
            let map = active.level.map();
            let Some(target) = map
                .to_absolute(Position::new(x, y))
                .filter(|&target| map.is_walkable(target))
            else {
                return Err(RuntimeError::InvalidTarget { x, y });
            };

            let start = active.state.robot.position;
            let path = find_path(
                map,
                &active.state,
                start,
                target,
                EnemyOccupancy::AvoidExceptGoal,
            );
            debug!(target: "runtime::navigation", %start, %target, steps = path.as_ref().map(Vec::len), "move_to_position");
            path
        };

        match path {
            Some(steps) => self.follow(&steps, false).await,
            None => {
                debug!(target: "runtime::navigation", x, y, "no path to target");
                Ok(())
            }
        }
    }

    /// Walks towards the nearest living enemy and stops once any enemy is
    /// adjacent.
    pub async fn move_to_nearest_enemy(&self) -> Result<()> {
        if self.inner.running_state("move_to_nearest_enemy").is_none() {
            return Ok(());
        }

        let path = {
            let session = self.inner.session.lock().await;
            let Some(active) = session.active.as_ref() else {
                return Ok(());
            };
            let Some(target) = active.state.nearest_enemy().map(|enemy| enemy.position) else {
                debug!(target: "runtime::navigation", "no living enemy to approach");
                return Ok(());
            };

            let start = active.state.robot.position;
            find_path(
                active.level.map(),
                &active.state,
                start,
                target,
                EnemyOccupancy::Ignore,
            )
        };

        match path {
            Some(steps) => self.follow(&steps, true).await,
            None => {
                debug!(target: "runtime::navigation", "no path to nearest enemy");
                Ok(())
            }
        }
    }

    async fn follow(&self, steps: &[Direction], stop_when_adjacent: bool) -> Result<()> {
        for &direction in steps {
            if self.inner.run.mode() != RunMode::Running {
                debug!(target: "runtime::navigation", "path abandoned: game not running");
                return Ok(());
            }

            let facing = {
                let session = self.inner.session.lock().await;
                match session.active.as_ref() {
                    Some(active) => active.state.robot.direction,
                    None => return Ok(()),
                }
            };
            for rotation in turns_between(facing, direction) {
                match rotation {
                    Rotation::Left => self.turn_left().await?,
                    Rotation::Right => self.turn_right().await?,
                }
            }
            self.move_forward().await?;

            if stop_when_adjacent && self.is_enemy_adjacent().await {
                break;
            }
        }
        Ok(())
    }
}
