use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates ({x}, {y})")]
    InvalidCoords { x: Coord, y: Coord },
    #[error("Cell string holds {actual} cells but the board has {expected}")]
    InvalidCellString { expected: CellCount, actual: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
