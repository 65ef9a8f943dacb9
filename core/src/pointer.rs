use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PointerButtons: u8 {
        const LEFT  = 1;
        const RIGHT = 1 << 1;
    }
}

/// What the pointer is currently over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hover {
    #[default]
    Nothing,
    Cell(Position),
    /// The new game button (the face).
    NewGame,
}

/// Game clock owned by the host. Only the pointer adapter starts and stops it.
pub trait Stopwatch {
    fn elapsed_ms(&self) -> u64;
    fn start(&mut self);
    fn stop(&mut self);
}

/// Turns raw pointer presses and releases into engine calls.
///
/// Left release opens the hovered cell, or chords it while the right button is
/// held. Right press cycles the mark unless the left button is held, and right
/// release chords when it is. The tracker holds no engine; every call that can
/// change the board borrows one along with the host clock.
///
/// Mutating calls return whether anything on the board changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerTracker {
    hover: Hover,
    buttons: PointerButtons,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTracker {
    pub const fn new() -> Self {
        Self {
            hover: Hover::Nothing,
            buttons: PointerButtons::empty(),
        }
    }

    pub const fn hovered(&self) -> Hover {
        self.hover
    }

    pub const fn buttons(&self) -> PointerButtons {
        self.buttons
    }

    pub fn hover(&mut self, target: Hover) {
        self.hover = target;
    }

    pub fn leave(&mut self) {
        self.hover = Hover::Nothing;
    }

    pub fn left_press(&mut self) {
        self.buttons.insert(PointerButtons::LEFT);
    }

    pub fn left_release<R: MineRng>(
        &mut self,
        engine: &mut BoardEngine<R>,
        clock: &mut impl Stopwatch,
    ) -> Result<bool> {
        engine.update_time(clock.elapsed_ms());
        let was_active = engine.state().is_active();

        let result = match self.hover {
            Hover::Cell(pos) => {
                let outcome = if self.buttons.contains(PointerButtons::RIGHT) {
                    engine.chord_reveal(pos)
                } else {
                    engine.reveal(pos)
                };

                let state = engine.state();
                if state.is_active() && !was_active {
                    clock.start();
                } else if state == EngineState::Lost || (state == EngineState::Won && was_active) {
                    clock.stop();
                }
                outcome.map(RevealOutcome::has_update)
            }
            Hover::NewGame => {
                engine.new_game();
                clock.stop();
                Ok(true)
            }
            Hover::Nothing => Ok(false),
        };

        self.buttons.remove(PointerButtons::LEFT);
        result
    }

    pub fn right_press<R: MineRng>(
        &mut self,
        engine: &mut BoardEngine<R>,
        clock: &mut impl Stopwatch,
    ) -> Result<bool> {
        self.buttons.insert(PointerButtons::RIGHT);
        engine.update_time(clock.elapsed_ms());

        match self.hover {
            Hover::Cell(pos) if !self.buttons.contains(PointerButtons::LEFT) => {
                Ok(engine.cycle_mark(pos)?.has_update())
            }
            _ => Ok(false),
        }
    }

    pub fn right_release<R: MineRng>(
        &mut self,
        engine: &mut BoardEngine<R>,
        clock: &mut impl Stopwatch,
    ) -> Result<bool> {
        let result = match self.hover {
            Hover::Cell(pos) if self.buttons.contains(PointerButtons::LEFT) => {
                let outcome = engine.chord_reveal(pos);
                if engine.is_finished() {
                    clock.stop();
                }
                outcome.map(RevealOutcome::has_update)
            }
            _ => Ok(false),
        };

        self.buttons.remove(PointerButtons::RIGHT);
        result
    }

    /// Whether `pos` should be drawn sunken: the hovered cell while the left
    /// button is held, plus its neighborhood when both buttons are.
    pub fn is_pressed<R: MineRng>(&self, engine: &BoardEngine<R>, pos: Position) -> bool {
        let Hover::Cell(hovered) = self.hover else {
            return false;
        };
        if engine.is_finished() || !self.buttons.contains(PointerButtons::LEFT) {
            return false;
        }
        let Ok(cell) = engine.cell(pos) else {
            return false;
        };

        matches!(cell.state(), CellState::Hidden | CellState::Questioned)
            && (hovered == pos
                || (self.buttons.contains(PointerButtons::RIGHT) && hovered.is_near(pos)))
    }

    /// Face hint: the left button is held over a cell that would open.
    pub fn is_anxious<R: MineRng>(&self, engine: &BoardEngine<R>) -> bool {
        let Hover::Cell(hovered) = self.hover else {
            return false;
        };

        !engine.is_finished()
            && self.buttons.contains(PointerButtons::LEFT)
            && engine
                .cell(hovered)
                .is_ok_and(|cell| matches!(cell.state(), CellState::Hidden | CellState::Questioned))
    }

    /// Face hint: the new game button is held down.
    pub fn is_new_game_pressed(&self) -> bool {
        self.hover == Hover::NewGame && self.buttons.contains(PointerButtons::LEFT)
    }
}
