use super::*;

/// Shuffles the mines over every cell except the last one, then swaps the
/// start cell with that never-shuffled last slot. The last slot always starts
/// empty while there are fewer mines than cells, so the start cell ends up safe.
#[derive(Debug)]
pub struct SafeStartGenerator<R> {
    rng: R,
    start: Position,
}

impl<R: MineRng> SafeStartGenerator<R> {
    pub fn new(rng: R, start: Position) -> Self {
        Self { rng, start }
    }
}

impl<R: MineRng> MinefieldGenerator for SafeStartGenerator<R> {
    fn generate(mut self, config: BoardConfig) -> Array2<bool> {
        let total_cells = config.cell_count() as usize;
        let mine_count = config.mine_count() as usize;

        // a full board has no safe cell to offer
        if mine_count >= total_cells {
            log::warn!(
                "Minefield is full ({} mines on {} cells), start cell cannot be safe",
                mine_count,
                total_cells
            );
            return Array2::from_elem(config.nd_shape(), true);
        }

        let mut mines: Array2<bool> = Array2::default(config.nd_shape());
        {
            let cells = mines.as_slice_mut().expect("layout should be standard");
            cells[..mine_count].fill(true);

            // Fisher-Yates over [0, total_cells - 2], the last cell stays put
            let last = total_cells - 1;
            for i in (1..last).rev() {
                let j = self.rng.below(i + 1);
                cells.swap(i, j);
            }

            cells.swap(self.start.index(config.width()), last);
        }

        log::debug!(
            "Placed {} mines on {}x{} with safe start at {:?}",
            mine_count,
            config.width(),
            config.height(),
            self.start
        );
        mines
    }
}
