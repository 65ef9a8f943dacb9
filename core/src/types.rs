use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    /// Grids are stored with shape `(height, width)`, so rows come first.
    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// A cell coordinate on the board.
///
/// The `has_*` predicates answer whether the matching neighbor exists; the
/// directions that can run off the far edge take the board width or height.
/// The `*_of` getters do not clamp and must only be called after the matching
/// predicate returned `true`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn has_left(self) -> bool {
        self.x > 0
    }

    pub const fn has_right(self, width: Coord) -> bool {
        self.x < width.saturating_sub(1)
    }

    pub const fn has_up(self) -> bool {
        self.y > 0
    }

    pub const fn has_down(self, height: Coord) -> bool {
        self.y < height.saturating_sub(1)
    }

    pub const fn has_left_up(self) -> bool {
        self.has_left() && self.has_up()
    }

    pub const fn has_left_down(self, height: Coord) -> bool {
        self.has_left() && self.has_down(height)
    }

    pub const fn has_right_up(self, width: Coord) -> bool {
        self.has_right(width) && self.has_up()
    }

    pub const fn has_right_down(self, width: Coord, height: Coord) -> bool {
        self.has_right(width) && self.has_down(height)
    }

    pub const fn left_of(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    pub const fn right_of(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    pub const fn up_of(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    pub const fn down_of(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    pub const fn left_up_of(self) -> Self {
        Self::new(self.x - 1, self.y - 1)
    }

    pub const fn left_down_of(self) -> Self {
        Self::new(self.x - 1, self.y + 1)
    }

    pub const fn right_up_of(self) -> Self {
        Self::new(self.x + 1, self.y - 1)
    }

    pub const fn right_down_of(self) -> Self {
        Self::new(self.x + 1, self.y + 1)
    }

    /// Row-major linear index on a board `width` cells wide.
    pub const fn index(self, width: Coord) -> usize {
        self.y as usize * width as usize + self.x as usize
    }

    /// Inverse of [`Position::index`].
    pub const fn from_index(index: usize, width: Coord) -> Self {
        let width = width as usize;
        Self::new((index % width) as Coord, (index / width) as Coord)
    }

    /// Whether `other` is this position or one of its eight neighbors.
    pub const fn is_near(self, other: Position) -> bool {
        self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }

    /// Whether this position lies on a `width` x `height` board.
    pub const fn is_within(self, (width, height): Coord2) -> bool {
        self.x < width && self.y < height
    }

    pub fn neighbors(self, bounds: Coord2) -> NeighborIter {
        NeighborIter::new(self, bounds)
    }
}

impl From<Coord2> for Position {
    fn from((x, y): Coord2) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for Coord2 {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

/// Compass directions in the order neighbors are visited.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    LeftUp,
    Up,
    RightUp,
    Left,
    Right,
    LeftDown,
    Down,
    RightDown,
}

const DIRECTIONS: [Direction; 8] = [
    Direction::LeftUp,
    Direction::Up,
    Direction::RightUp,
    Direction::Left,
    Direction::Right,
    Direction::LeftDown,
    Direction::Down,
    Direction::RightDown,
];

/// Steps from `center` towards `direction`, returning a value only when it remains in bounds.
fn step(center: Position, direction: Direction, (width, height): Coord2) -> Option<Position> {
    use Direction::*;

    match direction {
        LeftUp if center.has_left_up() => Some(center.left_up_of()),
        Up if center.has_up() => Some(center.up_of()),
        RightUp if center.has_right_up(width) => Some(center.right_up_of()),
        Left if center.has_left() => Some(center.left_of()),
        Right if center.has_right(width) => Some(center.right_of()),
        LeftDown if center.has_left_down(height) => Some(center.left_down_of()),
        Down if center.has_down(height) => Some(center.down_of()),
        RightDown if center.has_right_down(width, height) => Some(center.right_down_of()),
        _ => None,
    }
}

/// The up-to-eight in-bounds neighbors of a cell. Every algorithm on the board
/// enumerates neighbors through this iterator.
#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DIRECTIONS.len() {
                return None;
            }

            let next_item = step(self.center, DIRECTIONS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
