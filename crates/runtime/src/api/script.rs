//! Asynchronous abstraction for robot programs.
//!
//! Runtime users plug in [`ActionScript`] implementations so a program can
//! come from a text file, an editor, or a test fixture. [`run_script`]
//! separates voluntary stops from genuine faults.
use async_trait::async_trait;
use tracing::{info, warn};

use super::errors::{Result, RuntimeError};
use crate::runtime::Runtime;

/// A program that drives the robot through the Action API.
///
/// Implementations issue one action at a time and propagate errors with `?`
/// so that a stop interrupts them at the next suspension.
#[async_trait]
pub trait ActionScript: Send + Sync {
    async fn run(&self, runtime: &Runtime) -> Result<()>;
}

/// How a script run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    Completed,
    /// The game was stopped, reset or defeated underneath the script.
    Stopped(RuntimeError),
    Faulted(RuntimeError),
}

/// Runs `script` to completion and classifies the result.
pub async fn run_script(runtime: &Runtime, script: &dyn ActionScript) -> ScriptOutcome {
    match script.run(runtime).await {
        Ok(()) => {
            info!(target: "runtime::script", "script completed");
            ScriptOutcome::Completed
        }
        Err(err) if err.is_cancellation() => {
            info!(target: "runtime::script", reason = %err, "script stopped");
            ScriptOutcome::Stopped(err)
        }
        Err(err) => {
            warn!(target: "runtime::script", error = %err, "script failed");
            ScriptOutcome::Faulted(err)
        }
    }
}
