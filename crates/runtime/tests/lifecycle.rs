use std::time::Duration;

use game_content::LevelCatalog;
use game_core::{
    Direction, EnemyId, EnemyTemplate, Level, LevelDefinition, Position, RobotStart, WinCondition,
};
use runtime::{
    Event, LifecycleEvent, NotificationKind, RunMode, Runtime, RuntimeConfig, RuntimeError, Topic,
};

fn builtin(id: &str) -> Level {
    LevelCatalog::builtin()
        .unwrap()
        .get(id)
        .cloned()
        .unwrap()
}

fn duel() -> Level {
    LevelDefinition {
        id: "duel".into(),
        name: "Duel".into(),
        description: String::new(),
        hint: None,
        map: vec!["#####".into(), "#...#".into(), "#####".into()],
        robot_start: RobotStart {
            position: Position::new(1, 1),
            direction: Direction::Right,
        },
        enemies: vec![EnemyTemplate {
            id: EnemyId(1),
            position: Position::new(2, 1),
            direction: Direction::Left,
            behavior: vec![],
        }],
        coins: vec![],
        win_condition: WinCondition {
            goal: Some(Position::new(3, 1)),
            ..WinCondition::default()
        },
    }
    .build()
    .unwrap()
}

fn manual(level: Level) -> Runtime {
    Runtime::builder()
        .autonomous_npcs(false)
        .level(level)
        .build()
}

#[tokio::test(start_paused = true)]
async fn reset_restores_template_and_is_idempotent() {
    let level = builtin("level1");
    let initial = level.initial_state();
    let runtime = manual(level);

    runtime.start_game().await;
    runtime.move_forward().await.unwrap();
    runtime.move_to_nearest_enemy().await.unwrap();
    runtime.attack().await.unwrap();
    assert_ne!(runtime.snapshot().await.unwrap(), initial);

    runtime.reset().await;
    let first = runtime.snapshot().await.unwrap();
    runtime.reset().await;
    let second = runtime.snapshot().await.unwrap();

    assert_eq!(first, initial);
    assert_eq!(second, initial);
    assert_eq!(first.robot.health, 6.0);
    assert!(first.enemies.iter().all(|enemy| enemy.health == 2.0 && enemy.play_head == 0));
    assert!(first.collected_coins.is_empty());
    assert_eq!(first.defeated_enemies, 0);
    assert_eq!(runtime.run_mode(), RunMode::Stopped);
    assert!(!runtime.is_level_completed().await);
}

#[tokio::test(start_paused = true)]
async fn load_level_replaces_the_level_and_publishes() {
    let runtime = manual(builtin("level1"));
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    runtime.start_game().await;
    runtime.load_level(builtin("level2")).await;

    assert_eq!(runtime.run_mode(), RunMode::Stopped);
    assert_eq!(runtime.level().await.unwrap().id(), "level2");
    assert_eq!(runtime.snapshot().await.unwrap().enemies.len(), 2);

    let mut loaded = false;
    while let Ok(event) = lifecycle.try_recv() {
        if let Event::Lifecycle(LifecycleEvent::LevelLoaded { level_id }) = event {
            loaded = level_id == "level2";
        }
    }
    assert!(loaded);
}

#[tokio::test(start_paused = true)]
async fn relative_positions_use_the_map_origin() {
    let runtime = manual(builtin("level2"));
    assert_eq!(runtime.x_position().await, 0);
    assert_eq!(runtime.y_position().await, 0);

    runtime.start_game().await;
    runtime.turn_right().await.unwrap();
    runtime.move_forward().await.unwrap();
    assert_eq!(runtime.position().await, Position::new(0, 1));
}

#[tokio::test(start_paused = true)]
async fn stop_game_cancels_a_suspended_action() {
    let runtime = manual(duel());
    runtime.start_game().await;

    let driver = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.turn_left().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    runtime.stop_game().await;

    assert_eq!(driver.await.unwrap(), Err(RuntimeError::Cancelled));
    assert_eq!(runtime.run_mode(), RunMode::Stopped);
    // the turn itself had already landed; the enemy never got its tick
    let state = runtime.snapshot().await.unwrap();
    assert_eq!(state.robot.direction, Direction::Up);
    assert_eq!(state.robot.health, 6.0);
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_an_enemy_telegraph() {
    let runtime = manual(duel());
    runtime.start_game().await;

    let driver = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.turn_left().await })
    };
    // player delay is over, the strike is winding up
    tokio::time::sleep(Duration::from_millis(450)).await;
    runtime.reset().await;

    assert_eq!(driver.await.unwrap(), Err(RuntimeError::Cancelled));
    assert_eq!(runtime.snapshot().await.unwrap(), duel().initial_state());
}

#[tokio::test(start_paused = true)]
async fn autonomous_loop_ticks_until_stopped() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig::default())
        .level(builtin("level1"))
        .build();
    let start = runtime.snapshot().await.unwrap().enemies[0].clone();

    runtime.start_game().await;
    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let moved = runtime.snapshot().await.unwrap().enemies[0].clone();
    assert_ne!(moved.position, start.position);
    assert!(moved.play_head > 0);

    runtime.stop_game().await;
    let frozen = runtime.snapshot().await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(runtime.snapshot().await.unwrap(), frozen);
}

#[tokio::test(start_paused = true)]
async fn autonomous_strikes_defeat_an_idle_robot() {
    let runtime = Runtime::builder().level(duel()).build();
    let mut notifications = runtime.subscribe(Topic::Notification);

    runtime.start_game().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(runtime.run_mode(), RunMode::Stopped);
    assert!(runtime.player_health().await <= 0.0);

    let mut defeated = false;
    while let Ok(event) = notifications.try_recv() {
        if let Event::Notification(notification) = event {
            defeated |= notification.kind == NotificationKind::RobotDefeated;
        }
    }
    assert!(defeated);

    // actions after defeat are ignored
    runtime.move_forward().await.unwrap();
    assert_eq!(
        runtime.snapshot().await.unwrap().robot.position,
        Position::new(1, 1)
    );
}

#[tokio::test(start_paused = true)]
async fn start_game_is_a_no_op_while_running() {
    let runtime = manual(duel());
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    runtime.start_game().await;
    runtime.start_game().await;

    let mut changes = 0;
    while let Ok(event) = lifecycle.try_recv() {
        if matches!(event, Event::Lifecycle(LifecycleEvent::RunModeChanged { .. })) {
            changes += 1;
        }
    }
    assert_eq!(changes, 1);
}
