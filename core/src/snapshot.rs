use serde::{Deserialize, Serialize};

use crate::*;

/// Everything needed to resume a game, with the grid kept in its cell string
/// form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub config: BoardConfig,
    pub questions_enabled: bool,
    pub state: EngineState,
    pub elapsed_ms: u64,
    pub cells: String,
}

impl BoardSnapshot {
    pub fn from_engine<R: MineRng>(engine: &BoardEngine<R>) -> Self {
        Self {
            config: engine.config(),
            questions_enabled: engine.questions_enabled(),
            state: engine.state(),
            elapsed_ms: engine.elapsed_ms(),
            cells: engine.cell_string(),
        }
    }

    pub fn restore_with_rng<R: MineRng>(&self, rng: R) -> Result<BoardEngine<R>> {
        BoardEngine::from_cells_with_rng(
            self.config,
            self.questions_enabled,
            self.state,
            self.elapsed_ms,
            &self.cells,
            rng,
        )
    }
}

impl<R: MineRng> BoardEngine<R> {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_engine(self)
    }
}

impl BoardEngine<SeededRng> {
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self> {
        snapshot.restore_with_rng(SeededRng::from_entropy())
    }
}
