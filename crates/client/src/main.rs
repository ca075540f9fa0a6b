//! `arena` binary: run a robot program against a level.
//!
//! ```bash
//! arena programs/level1.txt
//! ARENA_LEVEL=level2 ARENA_INSTANT=1 arena my_program.txt
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arena_client::{ArenaConfig, Program, play};
use runtime::{Event, Runtime, ScriptOutcome, Topic};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ArenaConfig::from_env();
    let program_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.program.clone())
        .context("Usage: arena <program-file> (or set ARENA_PROGRAM)")?;

    let program = Program::load(&program_path)?;
    let level = config.level.load()?;
    tracing::info!(level = level.id(), name = level.name(), "level loaded");
    if let Some(hint) = &level.definition().hint {
        tracing::info!("hint: {hint}");
    }

    let runtime = Runtime::builder()
        .config(config.runtime_config()?)
        .level(level)
        .build();

    let printer = tokio::spawn(print_notifications(runtime.clone()));
    let report = play(&runtime, &program, config.preview_cycles).await;
    printer.abort();

    let report = report?;
    println!("{report}");

    if let ScriptOutcome::Faulted(err) = &report.outcome {
        bail!("program failed: {err}");
    }
    Ok(())
}

async fn print_notifications(runtime: Runtime) {
    let mut events = runtime.subscribe(Topic::Notification);
    loop {
        match events.recv().await {
            Ok(Event::Notification(note)) => println!("[{}] {}", note.kind, note.text),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification stream lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
