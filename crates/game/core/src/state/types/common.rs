use std::fmt;

/// Identifier of an enemy as authored in the level definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
///
/// `x` grows to the right and `y` grows downward (row index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: Position) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Squared Euclidean distance. Orders identically to the true distance.
    pub fn distance_squared(self, other: Position) -> i64 {
        let (dx, dy) = self.delta_to(other);
        i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy)
    }

    /// The four orthogonal neighbours in search order (up, right, down, left).
    pub fn neighbours(self) -> impl Iterator<Item = (Direction, Position)> {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, self.step(direction)))
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        Direction::from_delta(self.delta_to(other)).is_some()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit facing on the four-connected grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Clockwise order starting at `Up`; also the neighbour search order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Maps a unit vector back to a direction. Anything else yields `None`.
    pub const fn from_delta(delta: (i32, i32)) -> Option<Direction> {
        match delta {
            (0, -1) => Some(Direction::Up),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            _ => None,
        }
    }

    /// 90° counter-clockwise: (dx, dy) -> (dy, -dx).
    pub const fn rotated_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// 90° clockwise: (dx, dy) -> (-dy, dx).
    pub const fn rotated_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub const fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn rotated(self, rotation: Rotation) -> Direction {
        match rotation {
            Rotation::Left => self.rotated_left(),
            Rotation::Right => self.rotated_right(),
        }
    }
}

/// A single quarter turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Rotation {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_match_vector_formulas() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(direction.rotated_left().delta(), (dy, -dx));
            assert_eq!(direction.rotated_right().delta(), (-dy, dx));
            assert_eq!(direction.reversed().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn from_delta_rejects_non_unit_vectors() {
        assert_eq!(Direction::from_delta((1, 0)), Some(Direction::Right));
        assert_eq!(Direction::from_delta((1, 1)), None);
        assert_eq!(Direction::from_delta((0, 0)), None);
        assert_eq!(Direction::from_delta((2, 0)), None);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!("down".parse::<Direction>().ok(), Some(Direction::Down));
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
