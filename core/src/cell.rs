use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
    Questioned,
}

/// One square of the board: what the player sees plus what lies underneath.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    state: CellState,
    has_mine: bool,
    adjacent_mines: u8,
}

/// Character code for the default cell, used when encoding.
pub const EMPTY_CELL_CODE: char = '.';

/// Fixture and save-file alphabet. Any character not listed decodes to the
/// default cell.
const CELL_CODES: [(char, CellState, bool); 7] = [
    ('d', CellState::Revealed, false),
    ('b', CellState::Hidden, true),
    ('x', CellState::Revealed, true),
    ('f', CellState::Flagged, false),
    ('c', CellState::Flagged, true),
    ('q', CellState::Questioned, false),
    ('r', CellState::Questioned, true),
];

impl Cell {
    pub const fn new(state: CellState, has_mine: bool) -> Self {
        Self {
            state,
            has_mine,
            adjacent_mines: 0,
        }
    }

    pub fn from_char(code: char) -> Self {
        CELL_CODES
            .iter()
            .find(|&&(c, _, _)| c == code)
            .map(|&(_, state, has_mine)| Self::new(state, has_mine))
            .unwrap_or_default()
    }

    pub fn to_char(self) -> char {
        CELL_CODES
            .iter()
            .find(|&&(_, state, has_mine)| state == self.state && has_mine == self.has_mine)
            .map(|&(c, _, _)| c)
            .unwrap_or(EMPTY_CELL_CODE)
    }

    pub const fn state(self) -> CellState {
        self.state
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// Questioned cells can still be pressed; revealed and flagged ones cannot.
    pub const fn is_pressable(self) -> bool {
        !matches!(self.state, CellState::Revealed | CellState::Flagged)
    }

    pub fn press(&mut self) {
        if self.state != CellState::Flagged {
            self.state = CellState::Revealed;
        }
    }

    pub fn unpress(&mut self) {
        if self.state == CellState::Revealed {
            self.state = CellState::Hidden;
        }
    }

    /// Advances the mark cycle: hidden, flagged, questioned (when enabled), hidden.
    pub fn alt_press(&mut self, questions_enabled: bool) {
        use CellState::*;

        self.state = match self.state {
            Hidden => Flagged,
            Flagged if questions_enabled => Questioned,
            Flagged => Hidden,
            Questioned => Hidden,
            Revealed => Revealed,
        };
    }

    pub fn clear_question(&mut self) {
        if self.state == CellState::Questioned {
            self.state = CellState::Hidden;
        }
    }

    pub fn set_mine(&mut self, has_mine: bool) {
        self.has_mine = has_mine;
    }

    pub fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub fn add_adjacent_mine(&mut self) {
        self.adjacent_mines += 1;
    }
}
