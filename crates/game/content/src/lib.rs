//! Data-driven level content and loaders.
//!
//! This crate houses the built-in levels and provides loaders for RON/TOML
//! data files:
//! - Level definitions (map rows, robot start, enemies, coins, win condition)
//! - Game configuration (pacing, via TOML)
//!
//! All loaders use game-core types directly with serde for RON/TOML
//! deserialization. Levels are validated on load, so anything handed to the
//! runtime is already playable.

#[cfg(feature = "loaders")]
pub mod catalog;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use catalog::LevelCatalog;
#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LevelLoader, LoadResult};
