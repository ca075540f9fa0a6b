//! Static environment: grid geometry that never changes during a level.
mod map;

pub use map::{CellKind, WorldMap};
