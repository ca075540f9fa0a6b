//! Level definition loader.
//!
//! Reads a RON [`LevelDefinition`] and validates it into a playable
//! [`Level`].

use std::path::Path;

use game_core::{Level, LevelDefinition};

use crate::loaders::{LoadResult, read_file};

/// Loader for level definitions from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load and validate a level from a RON file.
    pub fn load(path: &Path) -> LoadResult<Level> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load level {}: {}", path.display(), e))
    }

    /// Parse and validate a level from RON source.
    pub fn parse(content: &str) -> LoadResult<Level> {
        let definition: LevelDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;

        let id = definition.id.clone();
        let level = definition
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid level '{}': {}", id, e))?;

        tracing::debug!(
            target: "game_content::level",
            id = level.id(),
            enemies = level.definition().enemies.len(),
            coins = level.total_coins(),
            "level loaded"
        );
        Ok(level)
    }
}
