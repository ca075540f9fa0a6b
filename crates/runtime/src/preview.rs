//! Non-mutating preview of enemy behaviour.
//!
//! The preview steps enemy scripts on a scratch copy of the entities and
//! publishes a frame per step. Canonical state is never touched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use game_core::GameEngine;

use crate::api::{Result, RuntimeError};
use crate::events::{Event, PreviewFrame};
use crate::pacing::RunMode;
use crate::runtime::{Inner, Runtime};

/// Clears the scratch frame and hands the mode back when a preview ends,
/// however it ends.
struct PreviewGuard<'a> {
    inner: &'a Inner,
    epoch: u64,
}

impl Drop for PreviewGuard<'_> {
    fn drop(&mut self) {
        self.inner.set_preview_frame(None);
        // A later transition (start, stop, reset) already owns the mode.
        if self.inner.run.set_if(self.epoch, RunMode::Stopped)
            && let Some(handle) = self.inner.take_npc_task()
        {
            handle.abort();
        }
    }
}

impl Runtime {
    /// Plays every living enemy's script `cycles` times on a scratch copy.
    ///
    /// Enemies step one at a time with the enemy-move pace in between; an
    /// enemy has finished a cycle once its play-head wraps back to zero.
    /// Returns [`RuntimeError::PreviewAborted`] when interrupted.
    pub async fn preview_enemy_movement(&self, cycles: u32) -> Result<()> {
        let inner: &Inner = &self.inner;
        inner.stop().await;

        let Some((level, mut scratch)) = ({
            let session = inner.session.lock().await;
            session
                .active
                .as_ref()
                .map(|active| (Arc::clone(&active.level), active.state.clone()))
        }) else {
            warn!(target: "runtime::preview", "preview ignored: no level loaded");
            return Ok(());
        };

        let previewing = inner.run.set(RunMode::Previewing);
        let _guard = PreviewGuard {
            inner,
            epoch: previewing.epoch,
        };
        inner.set_preview_frame(Some(scratch.clone()));
        info!(target: "runtime::preview", level = level.id(), cycles, "preview started");

        let pace = inner.pacing().enemy_move();
        let count = scratch.enemies.len();

        for cycle in 0..cycles {
            let mut finished: Vec<bool> = scratch
                .enemies
                .iter()
                .map(|enemy| !enemy.is_alive() || enemy.behavior.is_empty())
                .collect();

            while finished.iter().any(|done| !done) {
                for index in 0..count {
                    if finished[index] {
                        continue;
                    }
                    if inner.run.current() != previewing {
                        return Err(RuntimeError::PreviewAborted);
                    }

                    let step = GameEngine::new(&level, &mut scratch).preview_step(index);
                    let enemy = &scratch.enemies[index];
                    debug!(target: "runtime::preview", cycle, index, ?step, "preview step");
                    if enemy.play_head == 0 || !enemy.is_alive() {
                        finished[index] = true;
                    }

                    inner.set_preview_frame(Some(scratch.clone()));
                    inner.events.publish(Event::Preview(PreviewFrame {
                        cycle,
                        enemy_index: index,
                        enemies: scratch.enemies.clone(),
                    }));

                    inner.run.pause(pace, previewing).await?;
                }
            }
        }

        info!(target: "runtime::preview", "preview finished");
        Ok(())
    }

    /// Interrupts a running preview. Has no effect in any other mode.
    pub fn abort_preview(&self) {
        if self.inner.run.mode() == RunMode::Previewing {
            self.inner.run.set(RunMode::Stopped);
        }
    }
}
