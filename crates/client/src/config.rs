//! Client configuration structures and loaders.
use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use game_content::{ConfigLoader, LevelCatalog, LevelLoader, LoadResult};
use game_core::{GameConfig, Level, PacingConfig};
use runtime::RuntimeConfig;

/// Where the level comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelSource {
    /// Id of an embedded level.
    Builtin(String),
    /// RON file on disk.
    File(PathBuf),
}

impl LevelSource {
    /// Values ending in `.ron` or naming an existing file are paths;
    /// everything else is a built-in id.
    pub fn parse(value: &str) -> Self {
        let path = Path::new(value);
        if path.extension().is_some_and(|ext| ext == "ron") || path.is_file() {
            LevelSource::File(path.to_path_buf())
        } else {
            LevelSource::Builtin(value.to_owned())
        }
    }

    pub fn load(&self) -> LoadResult<Level> {
        match self {
            LevelSource::File(path) => LevelLoader::load(path),
            LevelSource::Builtin(id) => {
                let catalog = LevelCatalog::builtin()?;
                let known: Vec<&str> = catalog.levels().iter().map(Level::id).collect();
                catalog
                    .get(id)
                    .cloned()
                    .with_context(|| format!("Unknown level '{}' (built-in: {})", id, known.join(", ")))
            }
        }
    }
}

impl Default for LevelSource {
    fn default() -> Self {
        LevelSource::Builtin("level1".to_owned())
    }
}

/// Configuration required to run a program against a level.
#[derive(Clone, Debug, Default)]
pub struct ArenaConfig {
    pub level: LevelSource,
    pub program: Option<PathBuf>,
    /// TOML file with a `[pacing]` table.
    pub config_file: Option<PathBuf>,
    /// Zero every delay.
    pub instant: bool,
    /// Run the repeating NPC task in the background.
    pub autonomous_npcs: Option<bool>,
    /// Preview enemy behaviour this many cycles before the program starts.
    pub preview_cycles: Option<u32>,
}

impl ArenaConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_LEVEL` - Built-in level id or path to a `.ron` file (default: level1)
    /// - `ARENA_PROGRAM` - Program file, when not given on the command line
    /// - `ARENA_CONFIG` - TOML pacing configuration
    /// - `ARENA_INSTANT` - Skip all pacing delays (default: false)
    /// - `ARENA_AUTONOMOUS_NPCS` - Background NPC loop (default: true)
    /// - `ARENA_PREVIEW` - Preview cycles before the run (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = env::var("ARENA_LEVEL") {
            config.level = LevelSource::parse(&level);
        }

        config.program = env::var("ARENA_PROGRAM").ok().map(PathBuf::from);
        config.config_file = env::var("ARENA_CONFIG").ok().map(PathBuf::from);

        if let Some(instant) = read_env::<bool>("ARENA_INSTANT") {
            config.instant = instant;
        } else if env::var("ARENA_INSTANT").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.instant = true;
        }

        config.autonomous_npcs = read_env::<bool>("ARENA_AUTONOMOUS_NPCS");
        config.preview_cycles = read_env::<u32>("ARENA_PREVIEW");

        config
    }

    pub fn game_config(&self) -> LoadResult<GameConfig> {
        if self.instant {
            return Ok(GameConfig::with_pacing(PacingConfig::instant()));
        }
        match &self.config_file {
            Some(path) => ConfigLoader::load(path),
            None => Ok(GameConfig::default()),
        }
    }

    pub fn runtime_config(&self) -> LoadResult<RuntimeConfig> {
        let defaults = RuntimeConfig::default();
        Ok(RuntimeConfig {
            game_config: self.game_config()?,
            autonomous_npcs: self.autonomous_npcs.unwrap_or(defaults.autonomous_npcs),
            ..defaults
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
