//! Content factory for loading levels and configuration from a data
//! directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, Level};

use crate::loaders::{ConfigLoader, LevelLoader, LoadResult};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── levels/
///     ├── level1.ron
///     └── level2.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load a level from `levels/{level_id}.ron`.
    pub fn load_level(&self, level_id: &str) -> LoadResult<Level> {
        let path = self
            .data_dir
            .join("levels")
            .join(format!("{}.ron", level_id));
        LevelLoader::load(&path)
    }

    /// Load every `levels/*.ron` file, ordered by file name.
    pub fn load_levels(&self) -> LoadResult<Vec<Level>> {
        let dir = self.data_dir.join("levels");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| LevelLoader::load(path)).collect()
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r######"(
        id: "tiny",
        name: "Tiny",
        map: ["####", "#..#", "####"],
        robot_start: (position: (x: 1, y: 1), direction: Right),
    )"######;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_levels_and_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("levels")).unwrap();
        std::fs::write(dir.path().join("levels/b.ron"), TINY.replace("tiny", "b")).unwrap();
        std::fs::write(dir.path().join("levels/a.ron"), TINY.replace("tiny", "a")).unwrap();
        std::fs::write(dir.path().join("levels/notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("config.toml"), "[pacing]\nplayer_move_ms = 5\n").unwrap();

        let factory = ContentFactory::new(dir.path());
        let ids: Vec<String> = factory
            .load_levels()
            .unwrap()
            .iter()
            .map(|level| level.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(factory.load_level("b").unwrap().id(), "b");
        assert_eq!(factory.load_config().unwrap().pacing.player_move_ms, 5);
    }
}
