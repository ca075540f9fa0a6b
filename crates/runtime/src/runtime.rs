//! High-level runtime orchestrator.
//!
//! [`Runtime`] is a cheap, cloneable handle over shared state: the loaded
//! level, the run-mode channel, the tick gate that serialises NPC ticks and
//! the single autonomous NPC task. The Action API lives in [`crate::api`];
//! this module owns configuration, construction and the lifecycle
//! (`load_level`, `reset`, `start_game`, `stop_game`).

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use game_core::{EntitiesState, GameConfig, Level};

use crate::events::{Event, EventBus, LifecycleEvent, Topic};
use crate::pacing::{RunControl, RunMode, RunState};
use crate::session::{ActiveLevel, Session};
use crate::workers;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    /// Spawn the repeating NPC task while running (default: true).
    /// When disabled, enemies act only on the tick that follows each
    /// player action.
    pub autonomous_npcs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            autonomous_npcs: true,
        }
    }
}

pub(crate) struct Inner {
    pub config: RuntimeConfig,
    pub session: Mutex<Session>,
    /// Held for the duration of every NPC tick.
    pub tick_gate: Mutex<()>,
    pub run: RunControl,
    npc_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    preview_frame: std::sync::Mutex<Option<EntitiesState>>,
    pub events: EventBus,
}

impl Inner {
    fn new(config: RuntimeConfig, active: Option<ActiveLevel>) -> Self {
        let events = EventBus::with_capacity(config.event_buffer_size);
        Self {
            run: RunControl::new(events.clone()),
            session: Mutex::new(Session { active }),
            tick_gate: Mutex::new(()),
            npc_task: std::sync::Mutex::new(None),
            preview_frame: std::sync::Mutex::new(None),
            events,
            config,
        }
    }

    pub fn pacing(&self) -> &game_core::PacingConfig {
        &self.config.game_config.pacing
    }

    pub fn take_npc_task(&self) -> Option<JoinHandle<()>> {
        self.npc_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Stores a freshly spawned loop. Must be called with the tick gate held
    /// and after the previous handle has been taken.
    pub fn store_npc_task(&self, handle: JoinHandle<()>) {
        let previous = self
            .npc_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Aborts the autonomous loop, if any, and waits for it to finish.
    /// Callers hold the tick gate, so the loop is never mid-tick here.
    pub async fn cancel_npc_loop(&self) {
        let Some(handle) = self.take_npc_task() else {
            return;
        };
        handle.abort();
        match handle.await {
            Ok(()) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(target: "runtime::worker", error = %err, "npc loop terminated abnormally"),
        }
    }

    /// Respawns the autonomous loop if the game is still running.
    pub fn respawn_npc_loop(self: &Arc<Self>, initial_delay: Duration) {
        if !self.config.autonomous_npcs || self.run.mode() != RunMode::Running {
            return;
        }
        self.store_npc_task(workers::spawn_npc_loop(self, initial_delay));
    }

    pub fn preview_frame(&self) -> Option<EntitiesState> {
        self.preview_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_preview_frame(&self, frame: Option<EntitiesState>) {
        *self
            .preview_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = frame;
    }

    /// Current state when actions are allowed, otherwise `None`.
    pub fn running_state(&self, action: &'static str) -> Option<RunState> {
        let state = self.run.current();
        if state.mode != RunMode::Running {
            warn!(target: "runtime::api", action, mode = %state.mode, "ignored: game is not running");
            return None;
        }
        Some(state)
    }

    pub async fn stop(&self) {
        self.run.set(RunMode::Stopped);
        let _gate = self.tick_gate.lock().await;
        self.cancel_npc_loop().await;
    }

    async fn rebuild(&self, level: Option<Level>) {
        self.stop().await;
        let _gate = self.tick_gate.lock().await;
        let mut session = self.session.lock().await;

        let event = match level {
            Some(level) => {
                let level_id = level.id().to_owned();
                info!(target: "runtime::lifecycle", level = %level_id, name = level.name(), "level loaded");
                session.active = Some(ActiveLevel::new(Arc::new(level)));
                LifecycleEvent::LevelLoaded { level_id }
            }
            None => {
                let Some(active) = session.active.as_mut() else {
                    debug!(target: "runtime::lifecycle", "reset ignored: no level loaded");
                    return;
                };
                active.reset();
                info!(target: "runtime::lifecycle", level = active.level.id(), "level reset");
                LifecycleEvent::Reset {
                    level_id: active.level.id().to_owned(),
                }
            }
        };

        if let Some(active) = session.active.as_ref() {
            active.publish_state(&self.events);
            active.publish_coins(&self.events);
        }
        self.events.publish(Event::Lifecycle(event));
    }
}

/// Main runtime handle.
///
/// Cloning is cheap; every clone drives the same game. Exactly one caller is
/// expected to issue actions at a time.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Arc<Inner>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(Inner::new(config, None)),
        }
    }

    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.inner.events.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn run_mode(&self) -> RunMode {
        self.inner.run.mode()
    }

    /// Replaces the level and rebuilds entities from its template.
    /// Stops the game first.
    pub async fn load_level(&self, level: Level) {
        self.inner.rebuild(Some(level)).await;
    }

    /// Stops the game and restores the loaded level's initial state.
    pub async fn reset(&self) {
        self.inner.rebuild(None).await;
    }

    /// Enters `Running` and starts the autonomous NPC loop.
    ///
    /// Interrupts a running preview. Does nothing without a level or when
    /// already running.
    pub async fn start_game(&self) {
        if self.inner.session.lock().await.active.is_none() {
            warn!(target: "runtime::lifecycle", "start ignored: no level loaded");
            return;
        }
        if self.inner.run.mode() == RunMode::Running {
            debug!(target: "runtime::lifecycle", "start ignored: already running");
            return;
        }

        self.inner.run.set(RunMode::Running);
        let _gate = self.inner.tick_gate.lock().await;
        self.inner.cancel_npc_loop().await;
        self.inner.respawn_npc_loop(Duration::ZERO);
    }

    /// Leaves `Running` (or `Previewing`), cancels the NPC loop and waits
    /// for it to terminate.
    pub async fn stop_game(&self) {
        self.inner.stop().await;
    }

    /// Whether a level has been loaded.
    pub async fn is_initialized(&self) -> bool {
        self.inner.session.lock().await.active.is_some()
    }

    /// The loaded level, shared with the session.
    pub async fn level(&self) -> Option<Arc<Level>> {
        self.inner
            .session
            .lock()
            .await
            .active
            .as_ref()
            .map(|active| Arc::clone(&active.level))
    }

    pub async fn is_level_completed(&self) -> bool {
        self.inner
            .session
            .lock()
            .await
            .active
            .as_ref()
            .is_some_and(|active| active.completed)
    }

    /// Read-only view for a renderer: the preview scratch while previewing,
    /// otherwise the canonical entities.
    pub async fn snapshot(&self) -> Option<EntitiesState> {
        if let Some(frame) = self.inner.preview_frame() {
            return Some(frame);
        }
        self.inner
            .session
            .lock()
            .await
            .active
            .as_ref()
            .map(|active| active.state.clone())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    level: Option<Level>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            level: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the game configuration
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    pub fn autonomous_npcs(mut self, enable: bool) -> Self {
        self.config.autonomous_npcs = enable;
        self
    }

    /// Level to load before the runtime is handed out
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Build the runtime. The game starts stopped.
    pub fn build(self) -> Runtime {
        let active = self.level.map(|level| {
            info!(target: "runtime::lifecycle", level = level.id(), "level loaded");
            ActiveLevel::new(Arc::new(level))
        });
        Runtime {
            inner: Arc::new(Inner::new(self.config, active)),
        }
    }
}
