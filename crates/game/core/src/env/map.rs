use crate::error::MapError;
use crate::state::Position;

/// Static classification of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    Wall,
    Floor,
    /// Walkable cell that refills the robot's health when entered.
    HealthRestore,
}

impl CellKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(CellKind::Wall),
            '.' | ' ' => Some(CellKind::Floor),
            'H' => Some(CellKind::HealthRestore),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Floor => '.',
            CellKind::HealthRestore => 'H',
        }
    }

    pub fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Immutable grid geometry for one level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldMap {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
    origin: Position,
}

impl WorldMap {
    /// Parses a character grid (`#` wall, `.`/space floor, `H` health restore).
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let expected = rows.first().ok_or(MapError::Empty)?.as_ref().chars().count();
        if expected == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(MapError::UnknownCell {
                    symbol,
                    position: Position::new(x as i32, y as i32),
                })?;
                cells.push(kind);
            }
        }

        let width = expected as u32;
        let height = rows.len() as u32;
        let origin = Self::floor_origin(width, height, &cells);

        Ok(Self {
            width,
            height,
            cells,
            origin,
        })
    }

    /// Reference cell for relative coordinates: the smallest x and the
    /// smallest y found independently over plain floor cells. Falls back to
    /// (0, 0) on maps without plain floor.
    fn floor_origin(width: u32, height: u32, cells: &[CellKind]) -> Position {
        let mut min_x = width as i32;
        let mut min_y = height as i32;
        for (index, kind) in cells.iter().enumerate() {
            if *kind == CellKind::Floor {
                min_x = min_x.min((index as u32 % width) as i32);
                min_y = min_y.min((index as u32 / width) as i32);
            }
        }

        if min_x == width as i32 {
            Position::ORIGIN
        } else {
            Position::new(min_x, min_y)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn cell(&self, position: Position) -> Option<CellKind> {
        self.index(position).map(|index| self.cells[index])
    }

    /// In bounds and not a wall.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.cell(position).is_some_and(CellKind::is_walkable)
    }

    /// Top-left walkable reference cell used for relative coordinates.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Converts a coordinate relative to [`Self::origin`] into an absolute
    /// one. `None` when the sum leaves the `i32` range.
    pub fn to_absolute(&self, relative: Position) -> Option<Position> {
        Some(Position::new(
            self.origin.x.checked_add(relative.x)?,
            self.origin.y.checked_add(relative.y)?,
        ))
    }

    /// Converts an absolute coordinate into one relative to [`Self::origin`].
    pub fn to_relative(&self, absolute: Position) -> Position {
        Position::new(absolute.x - self.origin.x, absolute.y - self.origin.y)
    }

    /// Dense index for per-cell bookkeeping (e.g. search visited sets).
    pub fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_and_walkability() {
        let map = WorldMap::parse(&["####", "#.H#", "# .#", "####"]).unwrap();

        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 4);
        assert_eq!(map.cell(Position::new(2, 1)), Some(CellKind::HealthRestore));
        assert_eq!(map.cell(Position::new(1, 2)), Some(CellKind::Floor));
        assert!(map.is_walkable(Position::new(2, 1)));
        assert!(!map.is_walkable(Position::new(0, 0)));
        assert!(!map.is_walkable(Position::new(-1, 1)));
        assert!(!map.is_walkable(Position::new(4, 1)));
        assert_eq!(map.cell(Position::new(9, 9)), None);
    }

    #[test]
    fn origin_takes_minimum_floor_coordinates_independently() {
        let map = WorldMap::parse(&["#####", "##H.#", "#..##", "#####"]).unwrap();
        // floor cells: (3,1), (1,2), (2,2); the H cell does not count
        assert_eq!(map.origin(), Position::new(1, 1));
        assert_eq!(map.to_absolute(Position::new(2, 0)), Some(Position::new(3, 1)));
        assert_eq!(map.to_absolute(Position::new(i32::MAX, 0)), None);
        assert_eq!(
            map.to_absolute(Position::new(0, i32::MIN)),
            Some(Position::new(1, i32::MIN + 1))
        );
        assert_eq!(map.to_relative(Position::new(3, 1)), Position::new(2, 0));
    }

    #[test]
    fn rejects_malformed_grids() {
        assert_eq!(WorldMap::parse::<&str>(&[]), Err(MapError::Empty));
        assert_eq!(
            WorldMap::parse(&["###", "#."]),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            WorldMap::parse(&["#x#"]),
            Err(MapError::UnknownCell {
                symbol: 'x',
                position: Position::new(1, 0)
            })
        );
    }
}
