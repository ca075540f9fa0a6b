//! Command-line front end for the robot arena.
//!
//! ```text
//! ArenaConfig ─→ Runtime ─→ Program (ActionScript) ─→ RunReport
//! ```
//!
//! The binary loads a level and a text program, optionally previews the
//! enemy scripts, then runs the program against the live game and prints
//! the final board.

pub mod config;
pub mod program;
pub mod report;

pub use config::{ArenaConfig, LevelSource};
pub use program::{Program, ProgramError, Statement};
pub use report::{RunReport, render_board};

use anyhow::{Context, Result};
use runtime::{Runtime, run_script};

/// Runs `program` on the runtime's loaded level and reports the result.
///
/// With `preview` set, the enemy scripts are shown for that many cycles on
/// a scratch copy first. The game is stopped before returning.
pub async fn play(runtime: &Runtime, program: &Program, preview: Option<u32>) -> Result<RunReport> {
    let level = runtime.level().await.context("No level loaded")?;

    if let Some(cycles) = preview {
        tracing::info!(cycles, "previewing enemy movement");
        runtime.preview_enemy_movement(cycles).await?;
    }

    runtime.start_game().await;
    let outcome = run_script(runtime, program).await;
    let completed = runtime.is_level_completed().await;
    runtime.stop_game().await;

    let state = runtime
        .snapshot()
        .await
        .context("Game state disappeared during the run")?;
    Ok(RunReport::new(&level, &state, outcome, completed))
}
