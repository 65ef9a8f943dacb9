use core::cmp::Ordering;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use pointer::*;
pub use snapshot::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod pointer;
mod snapshot;
mod types;

/// Named board presets. Declaration order is the ranking used when comparing
/// configurations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

/// Board dimensions and mine count, classified into a [`Difficulty`].
///
/// Every constructor normalizes its input, so a `BoardConfig` always satisfies
/// `width >= MIN_WIDTH`, `height >= MIN_HEIGHT` and `mines <= width * height`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(from = "RawBoardConfig")]
pub struct BoardConfig {
    difficulty: Difficulty,
    size: Coord2,
    mines: CellCount,
}

impl BoardConfig {
    pub const MIN_WIDTH: Coord = 8;
    pub const MIN_HEIGHT: Coord = 1;
    pub const MIN_MINES: CellCount = 0;

    pub const BEGINNER: (Coord2, CellCount) = ((8, 8), 10);
    pub const INTERMEDIATE: (Coord2, CellCount) = ((16, 16), 40);
    pub const EXPERT: (Coord2, CellCount) = ((30, 16), 99);

    pub const fn from_difficulty(difficulty: Difficulty) -> Self {
        let (size, mines, difficulty) = match difficulty {
            Difficulty::Intermediate => (Self::INTERMEDIATE.0, Self::INTERMEDIATE.1, difficulty),
            Difficulty::Expert => (Self::EXPERT.0, Self::EXPERT.1, difficulty),
            // custom has no dimensions of its own
            Difficulty::Beginner | Difficulty::Custom => {
                (Self::BEGINNER.0, Self::BEGINNER.1, Difficulty::Beginner)
            }
        };
        Self {
            difficulty,
            size,
            mines,
        }
    }

    /// Clamps the dimensions to their minimums and the mine count into
    /// `[0, width * height]`, then classifies the result. Dimensions above
    /// `Coord::MAX` (65535) are capped there.
    pub fn new(width: i32, height: i32, mines: i32) -> Self {
        let mines = CellCount::try_from(mines.max(0)).unwrap_or(CellCount::MAX);
        Self::normalized(
            clamp_coord(width, Self::MIN_WIDTH),
            clamp_coord(height, Self::MIN_HEIGHT),
            mines,
        )
    }

    fn normalized(width: Coord, height: Coord, mines: CellCount) -> Self {
        let size = (width.max(Self::MIN_WIDTH), height.max(Self::MIN_HEIGHT));
        let mines = mines.clamp(Self::MIN_MINES, mult(size.0, size.1));
        let difficulty = match (size, mines) {
            Self::BEGINNER => Difficulty::Beginner,
            Self::INTERMEDIATE => Difficulty::Intermediate,
            Self::EXPERT => Difficulty::Expert,
            _ => Difficulty::Custom,
        };

        Self {
            difficulty,
            size,
            mines,
        }
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mines
    }

    pub const fn cell_count(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.cell_count() - self.mines
    }

    /// Shape of `ndarray` grids for this board: rows first.
    pub const fn nd_shape(&self) -> (usize, usize) {
        (self.size.1 as usize, self.size.0 as usize)
    }
}

fn clamp_coord(value: i32, min: Coord) -> Coord {
    Coord::try_from(value.max(min.into())).unwrap_or(Coord::MAX)
}

/// Wire form of [`BoardConfig`]. Any stored difficulty label is ignored and
/// the dimensions go through the same normalization as [`BoardConfig::new`].
#[derive(Deserialize)]
struct RawBoardConfig {
    size: Coord2,
    mines: CellCount,
}

impl From<RawBoardConfig> for BoardConfig {
    fn from(RawBoardConfig { size, mines }: RawBoardConfig) -> Self {
        Self::normalized(size.0, size.1, mines)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Beginner)
    }
}

impl From<Difficulty> for BoardConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::from_difficulty(difficulty)
    }
}

/// Named presets compare by difficulty alone; a custom board only equals
/// another custom board with the same dimensions and mine count.
impl PartialEq for BoardConfig {
    fn eq(&self, other: &Self) -> bool {
        use Difficulty::Custom;

        match (self.difficulty, other.difficulty) {
            (Custom, Custom) => self.size == other.size && self.mines == other.mines,
            (Custom, _) | (_, Custom) => false,
            (a, b) => a == b,
        }
    }
}

impl Eq for BoardConfig {}

/// Ranks by difficulty, then by area. Unequal boards of the same rank and
/// area are unordered.
impl PartialOrd for BoardConfig {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.difficulty.cmp(&other.difficulty) {
            Ordering::Equal => match self.cell_count().cmp(&other.cell_count()) {
                Ordering::Equal if self != other => None,
                ordering => Some(ordering),
            },
            ordering => Some(ordering),
        }
    }
}

/// Result of a flag/question mark request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Result of a reveal or chord. Outcomes merge with `|`, the most severe wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    const fn severity(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Revealed => 1,
            Self::Won => 2,
            Self::HitMine => 3,
        }
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.severity() > self.severity() { rhs } else { self }
    }
}
