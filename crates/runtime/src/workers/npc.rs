//! NPC ticks and the autonomous NPC loop.
//!
//! A tick lets at most one enemy act. Ticks run with the runtime's tick gate
//! held, whether they come from the repeating loop or from the tick that
//! follows a player action, so the two never interleave.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_core::{EnemyStrike, NpcTurn};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, Notification};
use crate::pacing::{RunMode, RunState};
use crate::runtime::Inner;

/// What a finished tick asks of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TickReport {
    /// Suspension before the next tick may run.
    pub pace: Duration,
    /// The robot fell during this tick; the game is already stopped.
    pub defeated: bool,
}

impl TickReport {
    const IDLE: Self = Self {
        pace: Duration::ZERO,
        defeated: false,
    };
}

/// Runs one NPC tick. The caller holds the tick gate.
pub(crate) async fn run_tick(inner: &Inner) -> Result<TickReport> {
    let started = inner.run.current();
    let pacing = inner.pacing();

    let turn = {
        let mut session = inner.session.lock().await;
        let Some(active) = session.active.as_mut() else {
            return Ok(TickReport::IDLE);
        };
        if started.mode != RunMode::Running || !active.state.robot.is_alive() {
            return Ok(TickReport::IDLE);
        }

        let (turn, step) = active.engine().begin_npc_tick();
        debug!(target: "runtime::worker", ?turn, ?step, "npc tick");
        if turn != NpcTurn::Idle {
            active.publish_state(&inner.events);
        }
        turn
    };

    match turn {
        NpcTurn::Idle => Ok(TickReport::IDLE),
        NpcTurn::Scripted { .. } => Ok(TickReport {
            pace: pacing.enemy_move(),
            defeated: false,
        }),
        NpcTurn::Strike { index } => {
            inner.run.pause(pacing.enemy_telegraph(), started).await?;

            let mut session = inner.session.lock().await;
            let Some(active) = session.active.as_mut() else {
                return Ok(TickReport::IDLE);
            };

            match active.engine().resolve_enemy_strike(index) {
                EnemyStrike::Missed => {
                    debug!(target: "runtime::worker", index, "enemy strike missed");
                }
                EnemyStrike::Hit { remaining } => {
                    debug!(target: "runtime::worker", index, remaining, "enemy strike hit");
                    active.publish_state(&inner.events);
                }
                EnemyStrike::RobotDefeated => {
                    info!(target: "runtime::worker", index, "robot defeated");
                    active.publish_state(&inner.events);
                    drop(session);

                    inner
                        .events
                        .publish(Event::Notification(Notification::robot_defeated()));
                    inner.run.set(RunMode::Stopped);
                    return Ok(TickReport {
                        pace: Duration::ZERO,
                        defeated: true,
                    });
                }
            }

            Ok(TickReport {
                pace: pacing.enemy_attack(),
                defeated: false,
            })
        }
    }
}

/// The NPC tick that follows a player action.
///
/// Pauses the autonomous loop, ticks once, waits out the pace, then hands
/// control back to a fresh loop.
pub(crate) async fn player_phase(inner: &Arc<Inner>) -> Result<()> {
    let _gate = inner.tick_gate.lock().await;
    inner.cancel_npc_loop().await;

    let report = run_tick(inner).await?;
    if report.defeated {
        return Err(RuntimeError::Cancelled);
    }

    let state = inner.run.current();
    inner.run.pause(report.pace, state).await?;

    inner.respawn_npc_loop(report.pace);
    Ok(())
}

/// Spawns the repeating NPC task.
///
/// The task holds the runtime weakly and exits once the mode leaves
/// `Running`, the robot falls, or the runtime is dropped.
pub(crate) fn spawn_npc_loop(inner: &Arc<Inner>, initial_delay: Duration) -> JoinHandle<()> {
    let weak = Arc::downgrade(inner);
    let mut watch = inner.run.watch();

    tokio::spawn(async move {
        let mut delay = initial_delay;
        loop {
            let Some(state) = current_running_state(&weak) else {
                break;
            };
            if watch.pause(delay, state).await.is_err() {
                break;
            }

            let Some(inner) = weak.upgrade() else {
                break;
            };
            let _gate = inner.tick_gate.lock().await;
            if inner.run.current() != state {
                break;
            }

            match run_tick(&inner).await {
                Ok(report) if !report.defeated => delay = report.pace,
                Ok(_) => break,
                Err(err) => {
                    debug!(target: "runtime::worker", error = %err, "npc loop interrupted");
                    break;
                }
            }
        }
        debug!(target: "runtime::worker", "npc loop finished");
    })
}

fn current_running_state(weak: &Weak<Inner>) -> Option<RunState> {
    let inner = weak.upgrade()?;
    let state = inner.run.current();
    (state.mode == RunMode::Running).then_some(state)
}
