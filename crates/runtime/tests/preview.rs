use std::time::Duration;

use game_content::LevelCatalog;
use game_core::{Level, Position};
use runtime::{Event, RunMode, Runtime, RuntimeError, Topic};

fn level1() -> Level {
    LevelCatalog::builtin().unwrap().current().clone()
}

fn runtime() -> Runtime {
    Runtime::builder()
        .autonomous_npcs(false)
        .level(level1())
        .build()
}

#[tokio::test(start_paused = true)]
async fn preview_leaves_canonical_state_untouched() {
    let runtime = runtime();
    let mut frames = runtime.subscribe(Topic::Preview);
    let before = runtime.snapshot().await.unwrap();

    runtime.preview_enemy_movement(1).await.unwrap();

    assert_eq!(runtime.snapshot().await.unwrap(), before);
    assert_eq!(runtime.run_mode(), RunMode::Stopped);

    let mut positions = Vec::new();
    while let Ok(Event::Preview(frame)) = frames.try_recv() {
        positions.push(frame.enemies[0].position);
    }
    // eight script steps: down twice, turn around, up twice, turn around
    assert_eq!(positions.len(), 8);
    assert_eq!(positions[0], Position::new(5, 2));
    assert_eq!(positions[1], Position::new(5, 3));
    assert_eq!(positions[7], Position::new(5, 1));
}

#[tokio::test(start_paused = true)]
async fn snapshot_follows_the_scratch_copy_while_previewing() {
    let runtime = runtime();
    let canonical = runtime.snapshot().await.unwrap();

    let preview = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.preview_enemy_movement(2).await })
    };
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(runtime.run_mode(), RunMode::Previewing);
    let scratch = runtime.snapshot().await.unwrap();
    assert_eq!(scratch.enemies[0].position, Position::new(5, 2));

    preview.await.unwrap().unwrap();
    assert_eq!(runtime.snapshot().await.unwrap(), canonical);
}

#[tokio::test(start_paused = true)]
async fn abort_preview_interrupts_and_restores() {
    let runtime = runtime();
    let before = runtime.snapshot().await.unwrap();

    let preview = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.preview_enemy_movement(3).await })
    };
    tokio::time::sleep(Duration::from_millis(1_200)).await;
    runtime.abort_preview();

    assert_eq!(preview.await.unwrap(), Err(RuntimeError::PreviewAborted));
    assert_eq!(runtime.run_mode(), RunMode::Stopped);
    assert_eq!(runtime.snapshot().await.unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn start_game_takes_over_from_a_preview() {
    let runtime = runtime();

    let preview = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.preview_enemy_movement(3).await })
    };
    tokio::time::sleep(Duration::from_millis(700)).await;
    runtime.start_game().await;

    assert_eq!(preview.await.unwrap(), Err(RuntimeError::PreviewAborted));
    assert_eq!(runtime.run_mode(), RunMode::Running);
    runtime.stop_game().await;
}

#[tokio::test(start_paused = true)]
async fn preview_stops_a_running_game() {
    let runtime = runtime();
    runtime.start_game().await;
    runtime.preview_enemy_movement(0).await.unwrap();
    assert_eq!(runtime.run_mode(), RunMode::Stopped);
}

#[test]
fn abort_outside_preview_is_ignored() {
    let runtime = runtime();
    runtime.abort_preview();
    assert_eq!(runtime.run_mode(), RunMode::Stopped);
}
