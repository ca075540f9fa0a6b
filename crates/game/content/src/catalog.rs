//! Ordered level progression.
//!
//! The built-in levels are embedded at compile time so a binary can run
//! without a data directory. A catalogue can also be built from any list of
//! levels (for example [`crate::ContentFactory::load_levels`]).

use game_core::Level;

use crate::loaders::{LevelLoader, LoadResult};

const BUILTIN: &[(&str, &str)] = &[
    ("level1", include_str!("../data/levels/level1.ron")),
    ("level2", include_str!("../data/levels/level2.ron")),
];

/// Levels in play order with a cursor on the current one.
#[derive(Clone, Debug)]
pub struct LevelCatalog {
    levels: Vec<Level>,
    current: usize,
}

impl LevelCatalog {
    /// Parses the embedded levels.
    pub fn builtin() -> LoadResult<Self> {
        let levels = BUILTIN
            .iter()
            .map(|(name, source)| {
                LevelLoader::parse(source)
                    .map_err(|e| anyhow::anyhow!("Built-in level {} is invalid: {}", name, e))
            })
            .collect::<LoadResult<Vec<_>>>()?;
        Self::from_levels(levels)
    }

    pub fn from_levels(levels: Vec<Level>) -> LoadResult<Self> {
        if levels.is_empty() {
            anyhow::bail!("Level catalogue is empty");
        }
        Ok(Self { levels, current: 0 })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id() == id)
    }

    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    /// Moves the cursor to `id`. Unknown ids leave the cursor unchanged.
    pub fn select(&mut self, id: &str) -> Option<&Level> {
        let index = self.levels.iter().position(|level| level.id() == id)?;
        self.current = index;
        Some(&self.levels[index])
    }

    /// Advances to the next level, if any.
    pub fn advance(&mut self) -> Option<&Level> {
        if !self.has_next() {
            return None;
        }
        self.current += 1;
        Some(&self.levels[self.current])
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.levels.len()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Position;

    #[test]
    fn builtin_levels_parse_in_order() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.current().id(), "level1");
        assert_eq!(catalog.levels()[1].id(), "level2");
    }

    #[test]
    fn level1_layout() {
        let catalog = LevelCatalog::builtin().unwrap();
        let level = catalog.get("level1").unwrap();
        assert_eq!(level.map().origin(), Position::new(1, 1));
        assert_eq!(level.total_coins(), 2);
        assert_eq!(level.win_condition().goal, Some(Position::new(7, 2)));
        assert_eq!(level.definition().enemies[0].behavior.len(), 8);
    }

    #[test]
    fn navigation_through_levels() {
        let mut catalog = LevelCatalog::builtin().unwrap();
        assert!(catalog.has_next());
        assert_eq!(catalog.advance().map(Level::id), Some("level2"));
        assert_eq!(catalog.index(), 1);
        assert!(!catalog.has_next());
        assert!(catalog.advance().is_none());

        assert!(catalog.select("missing").is_none());
        assert_eq!(catalog.index(), 1);
        assert_eq!(catalog.select("level1").map(Level::id), Some("level1"));
        assert_eq!(catalog.index(), 0);
    }

    #[test]
    fn empty_catalogue_is_rejected() {
        assert!(LevelCatalog::from_levels(Vec::new()).is_err());
    }
}
