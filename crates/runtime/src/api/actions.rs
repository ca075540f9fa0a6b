//! Primitive robot actions and state queries.
//!
//! Each action mutates the canonical state under the session lock, releases
//! it, pays its pacing delay and then lets the NPCs take their tick. Calls
//! made while the game is not running are ignored.

use std::time::Duration;

use tracing::{debug, warn};

use game_core::{GameConfig, MoveOutcome, Position, Rotation};

use super::errors::Result;
use crate::events::{Event, Notification, NotificationKind};
use crate::pacing::RunMode;
use crate::runtime::Runtime;
use crate::workers;

impl Runtime {
    /// Steps the robot one cell forward.
    ///
    /// With a living enemy next to the robot the step turns into
    /// [`Self::face_enemy`] and returns at once.
    pub async fn move_forward(&self) -> Result<()> {
        let Some(started) = self.inner.running_state("move_forward") else {
            return Ok(());
        };

        let outcome = {
            let mut session = self.inner.session.lock().await;
            let Some(active) = session.active.as_mut() else {
                return Ok(());
            };
            let outcome = active.engine().advance_robot();
            debug!(target: "runtime::api", ?outcome, "move_forward");

            if let MoveOutcome::Moved {
                collected_coin,
                restored_health,
                ..
            } = outcome
            {
                if collected_coin {
                    active.publish_coins(&self.inner.events);
                }
                if restored_health {
                    self.inner
                        .events
                        .publish(Event::Notification(Notification::health_restored()));
                }
            }
            if outcome != MoveOutcome::Blocked {
                active.publish_state(&self.inner.events);
            }
            active.check_completion(&self.inner.events);
            outcome
        };

        if let MoveOutcome::FacedAdjacentEnemy(_) = outcome {
            return Ok(());
        }

        let delay = self.inner.pacing().player_move();
        self.inner.run.pause(delay, started).await?;
        workers::player_phase(&self.inner).await
    }

    pub async fn turn_left(&self) -> Result<()> {
        self.turn(Rotation::Left).await
    }

    pub async fn turn_right(&self) -> Result<()> {
        self.turn(Rotation::Right).await
    }

    async fn turn(&self, rotation: Rotation) -> Result<()> {
        let Some(started) = self.inner.running_state("turn") else {
            return Ok(());
        };

        let engaged = {
            let mut session = self.inner.session.lock().await;
            let Some(active) = session.active.as_mut() else {
                return Ok(());
            };
            let mut engine = active.engine();
            let facing = engine.rotate_robot(rotation);
            let engaged = engine.any_engaged();
            debug!(target: "runtime::api", ?rotation, ?facing, "turn");
            active.publish_state(&self.inner.events);
            engaged
        };

        let delay = self.inner.pacing().player_move();
        self.inner.run.pause(delay, started).await?;
        if self.inner.run.mode() == RunMode::Running || engaged {
            workers::player_phase(&self.inner).await?;
        }
        Ok(())
    }

    /// Attacks the cell in front of the robot. A miss still costs the
    /// attack delay and the NPC tick.
    pub async fn attack(&self) -> Result<()> {
        let Some(started) = self.inner.running_state("attack") else {
            return Ok(());
        };

        {
            let mut session = self.inner.session.lock().await;
            let Some(active) = session.active.as_mut() else {
                return Ok(());
            };
            let result = active.engine().robot_attack();
            debug!(target: "runtime::api", ?result, "attack");

            if result.is_hit() {
                if result.back_attack {
                    self.inner
                        .events
                        .publish(Event::Notification(Notification::back_attack()));
                }
                if result.defeated {
                    self.inner
                        .events
                        .publish(Event::Notification(Notification::enemy_defeated()));
                }
                active.publish_state(&self.inner.events);
            }
            active.check_completion(&self.inner.events);
        }

        let delay = self.inner.pacing().player_attack();
        self.inner.run.pause(delay, started).await?;
        workers::player_phase(&self.inner).await
    }

    /// Turns the robot towards an enemy: an adjacent one if any, otherwise
    /// the nearest along the dominant axis. Costs no time.
    pub async fn face_enemy(&self) -> Result<()> {
        if self.inner.running_state("face_enemy").is_none() {
            return Ok(());
        }

        let mut session = self.inner.session.lock().await;
        let Some(active) = session.active.as_mut() else {
            return Ok(());
        };
        match active.engine().face_enemy() {
            Some(direction) => {
                debug!(target: "runtime::api", ?direction, "face_enemy");
                active.publish_state(&self.inner.events);
            }
            None => debug!(target: "runtime::api", "face_enemy: no living enemy"),
        }
        Ok(())
    }

    /// Shows `text` for `seconds` and, while running, holds the script for a
    /// quarter of that time.
    pub async fn say_message(&self, text: impl Into<String>, seconds: f64) -> Result<()> {
        let display = Duration::try_from_secs_f64(seconds).unwrap_or_default();
        self.inner.events.publish(Event::Notification(Notification::new(
            NotificationKind::Message,
            text,
            display,
        )));

        let state = self.inner.run.current();
        if state.mode != RunMode::Running {
            return Ok(());
        }
        let delay = self.inner.pacing().message(seconds);
        self.inner.run.pause(delay, state).await
    }

    pub async fn is_enemy_adjacent(&self) -> bool {
        self.inner
            .session
            .lock()
            .await
            .active
            .as_ref()
            .is_some_and(|active| active.state.is_enemy_adjacent())
    }

    /// Absolute x of the nearest living enemy, or -1.
    pub async fn enemy_x(&self) -> i32 {
        self.nearest_enemy().await.map_or(-1, |position| position.x)
    }

    /// Absolute y of the nearest living enemy, or -1.
    pub async fn enemy_y(&self) -> i32 {
        self.nearest_enemy().await.map_or(-1, |position| position.y)
    }

    async fn nearest_enemy(&self) -> Option<Position> {
        let session = self.inner.session.lock().await;
        let active = session.active.as_ref()?;
        active.state.nearest_enemy().map(|enemy| enemy.position)
    }

    /// Robot position relative to the map origin, or (0, 0) before a level
    /// is loaded.
    pub async fn position(&self) -> Position {
        let session = self.inner.session.lock().await;
        match session.active.as_ref() {
            Some(active) => active.level.map().to_relative(active.state.robot.position),
            None => {
                warn!(target: "runtime::api", "position queried before a level was loaded");
                Position::ORIGIN
            }
        }
    }

    pub async fn x_position(&self) -> i32 {
        self.position().await.x
    }

    pub async fn y_position(&self) -> i32 {
        self.position().await.y
    }

    pub async fn player_health(&self) -> f64 {
        self.inner
            .session
            .lock()
            .await
            .active
            .as_ref()
            .map_or(0.0, |active| active.state.robot.health)
    }

    pub fn player_max_health(&self) -> f64 {
        GameConfig::ROBOT_MAX_HEALTH
    }
}
