use core::num::Saturating;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Active (first reveal places the mines)
/// - Active -> Won
/// - Active -> Lost
/// - any -> Ready (new game)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No mines placed yet, clock not running
    Ready,
    /// Mines placed, clock running
    Active,
    /// Every safe cell revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Owns the grid and runs the game: lazy mine placement, flood-fill reveal,
/// chording, marking, and win detection.
///
/// The engine never reads a clock; the host feeds elapsed time through
/// [`BoardEngine::update_time`]. All mutators must be called one at a time.
#[derive(Clone, Debug)]
pub struct BoardEngine<R = SeededRng> {
    config: BoardConfig,
    grid: Array2<Cell>,
    state: EngineState,
    questions_enabled: bool,
    flag_count: Saturating<CellCount>,
    cells_remaining: i64,
    elapsed_ms: u64,
    /// Flood fill work-list membership; all `false` between calls.
    queued: Array2<bool>,
    rng: R,
}

impl BoardEngine<SeededRng> {
    /// Engine seeded from system entropy.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_rng(config, SeededRng::from_entropy())
    }

    pub fn from_seed(config: BoardConfig, seed: u64) -> Self {
        Self::with_rng(config, SeededRng::new(seed))
    }

    pub fn from_cells(
        config: BoardConfig,
        questions_enabled: bool,
        state: EngineState,
        elapsed_ms: u64,
        cells: &str,
    ) -> Result<Self> {
        Self::from_cells_with_rng(
            config,
            questions_enabled,
            state,
            elapsed_ms,
            cells,
            SeededRng::from_entropy(),
        )
    }
}

impl Default for BoardEngine<SeededRng> {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl<R: MineRng> BoardEngine<R> {
    pub fn with_rng(config: BoardConfig, rng: R) -> Self {
        Self {
            config,
            grid: Array2::default(config.nd_shape()),
            state: Default::default(),
            questions_enabled: false,
            flag_count: Saturating(0),
            cells_remaining: config.safe_cell_count().into(),
            elapsed_ms: 0,
            queued: Array2::default(config.nd_shape()),
            rng,
        }
    }

    /// Rebuilds a board from its cell string, one character per cell in
    /// row-major order (see [`Cell::from_char`]). Mine placement is skipped,
    /// the cells already say where the mines are.
    pub fn from_cells_with_rng(
        config: BoardConfig,
        questions_enabled: bool,
        state: EngineState,
        elapsed_ms: u64,
        cells: &str,
        rng: R,
    ) -> Result<Self> {
        let actual = cells.chars().count();
        if actual != config.cell_count() as usize {
            return Err(GameError::InvalidCellString {
                expected: config.cell_count(),
                actual,
            });
        }

        let mut engine = Self::with_rng(config, rng);
        engine.questions_enabled = questions_enabled;
        engine.state = state;
        engine.elapsed_ms = elapsed_ms;

        for (cell, code) in engine.grid.iter_mut().zip(cells.chars()) {
            *cell = Cell::from_char(code);
            match (cell.state(), cell.has_mine()) {
                (CellState::Flagged, _) => engine.flag_count += 1,
                (CellState::Revealed, false) => engine.cells_remaining -= 1,
                _ => {}
            }
        }
        engine.recompute_adjacent_mines();

        log::debug!(
            "Loaded {:?} board {}x{} with {} flags, {} cells remaining",
            state,
            config.width(),
            config.height(),
            engine.flag_count,
            engine.cells_remaining
        );
        Ok(engine)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn questions_enabled(&self) -> bool {
        self.questions_enabled
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count.0
    }

    /// Mines not yet accounted for by a flag; negative when over-flagged.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mine_count()) - i64::from(self.flag_count.0)
    }

    pub fn cells_remaining(&self) -> i64 {
        self.cells_remaining
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn timer_seconds(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Checked cell lookup for callers that have not validated coordinates.
    pub fn cell(&self, pos: impl Into<Position>) -> Result<&Cell> {
        let pos = self.validate(pos.into())?;
        Ok(&self.grid[pos.to_nd_index()])
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> &[Cell] {
        self.grid.as_slice().expect("layout should be standard")
    }

    pub fn cell_string(&self) -> String {
        self.grid.iter().map(|cell| cell.to_char()).collect()
    }

    pub fn set_questions_enabled(&mut self, questions_enabled: bool) {
        if self.questions_enabled == questions_enabled {
            return;
        }
        if !questions_enabled {
            self.grid.iter_mut().for_each(Cell::clear_question);
        }
        self.questions_enabled = questions_enabled;
    }

    /// Records the host clock reading; ignored unless the game is running.
    pub fn update_time(&mut self, elapsed_ms: u64) {
        if self.state.is_active() {
            self.elapsed_ms = elapsed_ms;
        }
    }

    /// Starts over with the same configuration.
    pub fn new_game(&mut self) {
        self.grid.fill(Cell::default());
        self.state = EngineState::Ready;
        self.flag_count = Saturating(0);
        self.cells_remaining = self.config.safe_cell_count().into();
        self.elapsed_ms = 0;
        log::debug!("New game on {:?}", self.config);
    }

    /// Starts over with `config`, reallocating the grid only when the
    /// dimensions change.
    pub fn new_game_with(&mut self, config: BoardConfig) {
        if config.size() != self.config.size() {
            log::debug!("Resizing board from {:?} to {:?}", self.config.size(), config.size());
            self.grid = Array2::default(config.nd_shape());
            self.queued = Array2::default(config.nd_shape());
        }
        self.config = config;
        self.new_game();
    }

    /// Plain click. The first one places the mines around a guaranteed safe
    /// start. Flagged cells and finished games are left alone.
    pub fn reveal(&mut self, pos: impl Into<Position>) -> Result<RevealOutcome> {
        let pos = self.validate(pos.into())?;

        if self.state.is_finished() || self[pos].state() == CellState::Flagged {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.is_ready() {
            self.place_mines(pos);
            self.state = EngineState::Active;
            log::debug!("Game started at {:?}", pos);
        }

        let outcome = self.press_cell(pos);
        Ok(outcome | self.try_win())
    }

    /// Cycles flag and question marks on a cell. Never changes the game state.
    pub fn cycle_mark(&mut self, pos: impl Into<Position>) -> Result<MarkOutcome> {
        let pos = self.validate(pos.into())?;

        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let questions_enabled = self.questions_enabled;
        let cell = &mut self.grid[pos.to_nd_index()];
        let before = cell.state();
        cell.alt_press(questions_enabled);
        let after = cell.state();

        if before == CellState::Flagged {
            self.flag_count -= 1;
        }
        if after == CellState::Flagged {
            self.flag_count += 1;
        }

        Ok(if before == after {
            MarkOutcome::NoChange
        } else {
            MarkOutcome::Changed
        })
    }

    /// Area click on a revealed cell whose flagged neighbors match its mine
    /// count: presses every neighbor at once. Wrong flags can still lose the game.
    pub fn chord_reveal(&mut self, pos: impl Into<Position>) -> Result<RevealOutcome> {
        let pos = self.validate(pos.into())?;

        if self.state.is_finished() || !self.can_chord(pos) {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = self.press_cell(pos);
        for neighbor in pos.neighbors(self.size()) {
            outcome = outcome | self.press_cell(neighbor);
        }
        Ok(outcome | self.try_win())
    }

    /// Whether the cell is revealed and surrounded by exactly as many flags as
    /// it has adjacent mines. Out-of-range positions are never chordable.
    pub fn can_chord(&self, pos: impl Into<Position>) -> bool {
        let Ok(pos) = self.validate(pos.into()) else {
            return false;
        };
        let cell = self[pos];

        cell.state() == CellState::Revealed
            && self.count_neighbors(pos, |neighbor| neighbor.state() == CellState::Flagged)
                == cell.adjacent_mines()
    }

    fn press_cell(&mut self, pos: Position) -> RevealOutcome {
        let cell = &mut self.grid[pos.to_nd_index()];
        if !cell.is_pressable() {
            return RevealOutcome::NoChange;
        }

        if cell.has_mine() {
            cell.press();
            self.state = EngineState::Lost;
            log::debug!("Hit mine at {:?}", pos);
            RevealOutcome::HitMine
        } else {
            self.flood_reveal(pos);
            RevealOutcome::Revealed
        }
    }

    /// Reveals `start` and, through every zero cell reached, its neighbors.
    /// Iterative with an explicit stack; `queued` marks cells on the stack so
    /// none is counted twice. A popped cell is revealed and never pressable
    /// again, so its mark is cleared right away.
    fn flood_reveal(&mut self, start: Position) {
        let size = self.size();
        let mut stack = vec![start];
        self.queued[start.to_nd_index()] = true;

        while let Some(pos) = stack.pop() {
            self.queued[pos.to_nd_index()] = false;
            let cell = &mut self.grid[pos.to_nd_index()];
            cell.press();
            self.cells_remaining -= 1;
            let adjacent_mines = cell.adjacent_mines();
            log::trace!("Flood opened cell at {:?}, mine count: {}", pos, adjacent_mines);

            if adjacent_mines != 0 {
                continue;
            }

            for neighbor in pos.neighbors(size) {
                let index = neighbor.to_nd_index();
                if !self.queued[index] && self.grid[index].is_pressable() {
                    self.queued[index] = true;
                    stack.push(neighbor);
                }
            }
        }
    }

    fn place_mines(&mut self, start: Position) {
        for cell in self.grid.iter_mut() {
            cell.set_mine(false);
            cell.unpress();
        }

        let mines = SafeStartGenerator::new(&mut self.rng, start).generate(self.config);
        for (cell, &has_mine) in self.grid.iter_mut().zip(mines.iter()) {
            cell.set_mine(has_mine);
        }

        self.cells_remaining = self.config.safe_cell_count().into();
        self.recompute_adjacent_mines();
    }

    fn recompute_adjacent_mines(&mut self) {
        let size = self.size();
        self.grid.iter_mut().for_each(|cell| cell.set_adjacent_mines(0));

        for index in 0..self.grid.len() {
            let pos = Position::from_index(index, size.0);
            if !self.grid[pos.to_nd_index()].has_mine() {
                continue;
            }
            for neighbor in pos.neighbors(size) {
                self.grid[neighbor.to_nd_index()].add_adjacent_mine();
            }
        }
    }

    fn count_neighbors(&self, pos: Position, predicate: impl Fn(Cell) -> bool) -> u8 {
        pos.neighbors(self.size())
            .filter(|&neighbor| predicate(self[neighbor]))
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    fn try_win(&mut self) -> RevealOutcome {
        if self.state.is_active() && self.cells_remaining <= 0 {
            self.state = EngineState::Won;
            log::debug!("Won after {} ms", self.elapsed_ms);
            return RevealOutcome::Won;
        }
        RevealOutcome::NoChange
    }

    fn validate(&self, pos: Position) -> Result<Position> {
        if pos.is_within(self.size()) {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoords { x: pos.x, y: pos.y })
        }
    }
}

/// Unchecked lookup: panics when `pos` is off the board.
impl<R> Index<Position> for BoardEngine<R> {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.grid[pos.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, VecDeque};

    const PLAYING: [&str; 8] = [
        ".bdddddd", "bdbddddd", "bbdddddd", "dddddddd", "dddddddd", "ddddddbb", "dddddb.b",
        "dddddb..",
    ];

    const ONE_LEFT: [&str; 8] = [
        ".bdddddd", "bdbddddd", "bbdddddd", "dddddddd", "dddddddd", "ddddddbb", "dddddbdb",
        "dddddbdd",
    ];

    const CHORDABLE: [&str; 8] = [
        "df..dc..", "b....c..", "........", "b....c..", "b...cdc.", "...c....", "...db...",
        "........",
    ];

    fn fixture(rows: &[&str]) -> BoardEngine {
        BoardEngine::from_cells(
            BoardConfig::from(Difficulty::Beginner),
            true,
            EngineState::Active,
            30_000,
            &rows.concat(),
        )
        .unwrap()
    }

    fn state_at(engine: &BoardEngine, x: Coord, y: Coord) -> CellState {
        engine[Position::new(x, y)].state()
    }

    fn mine_count<R: MineRng>(engine: &BoardEngine<R>) -> usize {
        engine.cells().iter().filter(|cell| cell.has_mine()).count()
    }

    /// Mines scattered by index picks, independent of the engine's placement.
    fn random_cells(config: BoardConfig, seed: u64) -> String {
        let mut rng = SeededRng::new(seed);
        let total = config.cell_count() as usize;
        let mut cells = vec!['.'; total];
        let mut placed = 0;
        while placed < config.mine_count() {
            let index = rng.below(total);
            if cells[index] == '.' {
                cells[index] = 'b';
                placed += 1;
            }
        }
        cells.into_iter().collect()
    }

    /// Breadth-first search over the whole grid: the zero region containing
    /// `start` plus its numbered border.
    fn flood_oracle(engine: &BoardEngine, start: Position) -> BTreeSet<(Coord, Coord)> {
        let mut opened: BTreeSet<Coord2> = BTreeSet::from([start.into()]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(pos) = to_visit.pop_front() {
            if engine[pos].adjacent_mines() != 0 {
                continue;
            }
            for neighbor in pos.neighbors(engine.size()) {
                if opened.insert(neighbor.into()) {
                    to_visit.push_back(neighbor);
                }
            }
        }
        opened
    }

    fn revealed_positions(engine: &BoardEngine) -> BTreeSet<(Coord, Coord)> {
        let width = engine.config().width();
        engine
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.state() == CellState::Revealed)
            .map(|(index, _)| Position::from_index(index, width).into())
            .collect()
    }

    #[test]
    fn new_engine_is_ready_without_mines() {
        let engine = BoardEngine::from_seed(BoardConfig::default(), 1);

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.cells().len(), 64);
        assert_eq!(mine_count(&engine), 0);
        assert_eq!(engine.cells_remaining(), 54);
        assert_eq!(engine.mines_left(), 10);
        assert!(!engine.questions_enabled());
    }

    #[test]
    fn fixture_rejects_wrong_length() {
        let result = BoardEngine::from_cells(
            BoardConfig::default(),
            false,
            EngineState::Active,
            0,
            &"d".repeat(63),
        );

        assert_eq!(
            result.err(),
            Some(GameError::InvalidCellString {
                expected: 64,
                actual: 63
            })
        );
    }

    #[test]
    fn fixture_counts_flags_and_remaining_cells() {
        let engine = fixture(&CHORDABLE);

        assert_eq!(engine.flag_count(), 7);
        assert_eq!(engine.mines_left(), 3);
        assert_eq!(engine.cells_remaining(), 50);
        assert_eq!(engine.timer_seconds(), 30);
        assert_eq!(engine[Position::new(4, 0)].adjacent_mines(), 2);
    }

    #[test]
    fn fixture_round_trips_through_cell_string() {
        let engine = fixture(&CHORDABLE);

        assert_eq!(engine.cell_string(), CHORDABLE.concat());
    }

    #[test]
    fn reveal_presses_only_the_released_cell() {
        let mut engine = fixture(&PLAYING);
        assert_eq!(engine.cells_remaining(), 4);

        let outcome = engine.reveal((7, 7)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(state_at(&engine, 0, 0), CellState::Hidden);
        assert_eq!(state_at(&engine, 7, 7), CellState::Revealed);
        assert_eq!(engine.cells_remaining(), 3);
        assert_eq!(engine.state(), EngineState::Active);
    }

    #[test]
    fn revealing_last_safe_cell_wins() {
        let mut engine = fixture(&ONE_LEFT);

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.cells_remaining(), 0);
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut engine = fixture(&PLAYING);

        let outcome = engine.reveal((1, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(state_at(&engine, 1, 0), CellState::Revealed);
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(state_at(&engine, 0, 0), CellState::Hidden);
    }

    #[test]
    fn flagged_cells_cannot_be_revealed() {
        let mut engine = BoardEngine::from_seed(BoardConfig::default(), 5);
        engine.cycle_mark((3, 3)).unwrap();

        assert_eq!(engine.reveal((3, 3)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(mine_count(&engine), 0);
    }

    #[test]
    fn chording_a_matched_cell_opens_its_neighbors() {
        let mut engine = fixture(&CHORDABLE);
        assert!(engine.can_chord((4, 0)));

        let outcome = engine.chord_reveal((4, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(engine.cells_remaining(), 33);
    }

    #[test]
    fn chording_an_unmatched_cell_changes_nothing() {
        let mut engine = fixture(&CHORDABLE);
        let before = engine.cell_string();

        for (x, y) in [(3, 6), (2, 0), (2, 5)] {
            assert!(!engine.can_chord((x, y)));
            assert_eq!(engine.chord_reveal((x, y)).unwrap(), RevealOutcome::NoChange);
        }

        assert_eq!(engine.cells_remaining(), 50);
        assert_eq!(engine.cell_string(), before);
    }

    #[test]
    fn consecutive_chords_accumulate() {
        let mut engine = fixture(&CHORDABLE);

        engine.chord_reveal((4, 0)).unwrap();
        engine.chord_reveal((5, 4)).unwrap();

        assert_eq!(engine.cells_remaining(), 29);
    }

    #[test]
    fn chord_reveals_exactly_the_pressable_neighbors() {
        let mut engine = fixture(&CHORDABLE);
        let center = Position::new(5, 4);
        let pressable: Vec<_> = center
            .neighbors(engine.size())
            .filter(|&pos| engine[pos].is_pressable())
            .collect();

        engine.chord_reveal(center).unwrap();

        assert_eq!(engine.cells_remaining(), 50 - pressable.len() as i64);
        for pos in pressable {
            assert_eq!(engine[pos].state(), CellState::Revealed);
        }
    }

    #[test]
    fn chord_with_a_misplaced_flag_hits_a_mine() {
        let mut engine = fixture(&CHORDABLE);

        let outcome = engine.chord_reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(state_at(&engine, 0, 1), CellState::Revealed);
    }

    #[test]
    fn first_reveal_is_always_safe() {
        let configs = [
            BoardConfig::from(Difficulty::Beginner),
            BoardConfig::from(Difficulty::Expert),
            BoardConfig::new(8, 2, 15),
        ];

        for config in configs {
            for seed in 0..100 {
                let (width, height) = config.size();
                let start = Position::new(seed as Coord % width, seed as Coord % height);
                let mut engine = BoardEngine::from_seed(config, seed);

                let outcome = engine.reveal(start).unwrap();

                assert_ne!(outcome, RevealOutcome::HitMine, "{config:?} seed {seed}");
                assert!(!engine[start].has_mine());
                assert_eq!(mine_count(&engine), config.mine_count() as usize);
            }
        }
    }

    #[test]
    fn full_board_explodes_on_first_reveal() {
        let mut engine = BoardEngine::from_seed(BoardConfig::new(8, 1, 8), 0);

        let outcome = engine.reveal((3, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
    }

    #[test]
    fn empty_board_wins_on_first_reveal() {
        let mut engine = BoardEngine::from_seed(BoardConfig::new(8, 3, 0), 0);

        let outcome = engine.reveal((3, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(engine.cells().iter().all(|cell| cell.state() == CellState::Revealed));
    }

    #[test]
    fn flood_fill_matches_breadth_first_oracle() {
        let config = BoardConfig::new(20, 12, 30);
        let mut checked = 0;

        for seed in 0..40 {
            let cells = random_cells(config, seed);
            let mut engine =
                BoardEngine::from_cells(config, false, EngineState::Active, 0, &cells).unwrap();
            let Some(start) = (0..config.cell_count() as usize)
                .map(|index| Position::from_index(index, config.width()))
                .find(|&pos| !engine[pos].has_mine() && engine[pos].adjacent_mines() == 0)
            else {
                continue;
            };

            let expected = flood_oracle(&engine, start);
            engine.reveal(start).unwrap();

            assert_eq!(revealed_positions(&engine), expected, "seed {seed}");
            assert_eq!(
                engine.cells_remaining(),
                i64::from(config.safe_cell_count()) - expected.len() as i64
            );
            checked += 1;
        }

        assert!(checked > 0);
    }

    #[test]
    fn win_fires_only_when_no_safe_cell_remains() {
        for seed in 0..20 {
            let mut engine = BoardEngine::from_seed(BoardConfig::new(10, 6, 8), seed);
            let width = engine.config().width();

            while !engine.is_finished() {
                let pos = (0..engine.cells().len())
                    .map(|index| Position::from_index(index, width))
                    .find(|&pos| engine[pos].state() == CellState::Hidden && !engine[pos].has_mine())
                    .unwrap();

                engine.reveal(pos).unwrap();

                let hidden_safe = engine
                    .cells()
                    .iter()
                    .filter(|cell| !cell.has_mine() && cell.state() != CellState::Revealed)
                    .count();
                assert_eq!(engine.state() == EngineState::Won, hidden_safe == 0);
                assert_eq!(engine.cells_remaining(), hidden_safe as i64);
            }

            assert_eq!(engine.state(), EngineState::Won);
        }
    }

    #[test]
    fn chord_merges_neighbor_outcomes() {
        // (5,4) opens cleanly, then the misplaced flag at (1,0) makes the
        // chord around (0,0) hit a mine among otherwise safe neighbors
        let mut engine = fixture(&CHORDABLE);
        assert_eq!(engine.chord_reveal((5, 4)).unwrap(), RevealOutcome::Revealed);

        let outcome = engine.chord_reveal((0, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(state_at(&engine, 1, 1), CellState::Revealed);
    }

    #[test]
    fn revealing_a_revealed_cell_changes_nothing() {
        let mut engine = fixture(&PLAYING);

        assert_eq!(engine.reveal((2, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.cells_remaining(), 4);
    }

    #[test]
    fn adjacent_counts_match_a_direct_scan() {
        let config = BoardConfig::new(13, 9, 30);
        for seed in 0..10 {
            let engine = BoardEngine::from_cells(
                config,
                false,
                EngineState::Active,
                0,
                &random_cells(config, seed),
            )
            .unwrap();

            for index in 0..engine.cells().len() {
                let pos = Position::from_index(index, config.width());
                let expected = pos
                    .neighbors(engine.size())
                    .filter(|&neighbor| engine[neighbor].has_mine())
                    .count();
                assert_eq!(usize::from(engine[pos].adjacent_mines()), expected, "{pos:?}");
            }
        }
    }

    #[test]
    fn flood_scratch_is_clear_between_reveals() {
        let mut engine = fixture(&CHORDABLE);

        engine.chord_reveal((4, 0)).unwrap();
        assert!(engine.queued.iter().all(|&queued| !queued));
        engine.chord_reveal((5, 4)).unwrap();
        assert!(engine.queued.iter().all(|&queued| !queued));
        assert_eq!(engine.cells_remaining(), 29);

        engine.new_game_with(BoardConfig::new(20, 12, 30));
        assert_eq!(engine.queued.dim(), (12, 20));
        engine.reveal((10, 6)).unwrap();
        assert!(engine.queued.iter().all(|&queued| !queued));
    }

    #[test]
    fn same_seed_places_the_same_mines() {
        let config = BoardConfig::from(Difficulty::Expert);
        let mut first = BoardEngine::from_seed(config, 7);
        let mut second = BoardEngine::from_seed(config, 7);

        first.reveal((15, 8)).unwrap();
        second.reveal((15, 8)).unwrap();

        assert_eq!(first.cells(), second.cells());
        assert_eq!(first.cells_remaining(), second.cells_remaining());
    }

    #[test]
    fn marks_cycle_and_track_flag_count() {
        let mut engine = BoardEngine::from_seed(BoardConfig::default(), 2);

        assert_eq!(engine.cycle_mark((1, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.cycle_mark((1, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(state_at(&engine, 1, 1), CellState::Hidden);
        assert_eq!(engine.flag_count(), 0);

        engine.set_questions_enabled(true);
        engine.cycle_mark((1, 1)).unwrap();
        engine.cycle_mark((1, 1)).unwrap();
        assert_eq!(state_at(&engine, 1, 1), CellState::Questioned);
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn over_flagging_drives_mines_left_negative() {
        let mut engine = BoardEngine::from_seed(BoardConfig::default(), 3);

        for x in 0..8 {
            for y in 0..2 {
                engine.cycle_mark((x, y)).unwrap();
            }
        }

        assert_eq!(engine.flag_count(), 16);
        assert_eq!(engine.mines_left(), -6);
    }

    #[test]
    fn marks_are_ignored_on_revealed_cells_and_finished_games() {
        let mut engine = fixture(&PLAYING);
        assert_eq!(engine.cycle_mark((2, 0)).unwrap(), MarkOutcome::NoChange);

        engine.reveal((0, 1)).unwrap();
        assert_eq!(engine.cycle_mark((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn disabling_questions_clears_them() {
        let mut engine = fixture(&[
            "q.......", "r.......", "dddddddd", "dddddddd", "dddddddd", "dddddddd", "dddddddd",
            "dddddddd",
        ]);

        engine.set_questions_enabled(true);
        assert_eq!(state_at(&engine, 0, 0), CellState::Questioned);

        engine.set_questions_enabled(false);

        assert_eq!(state_at(&engine, 0, 0), CellState::Hidden);
        assert_eq!(state_at(&engine, 0, 1), CellState::Hidden);
        assert!(engine[Position::new(0, 1)].has_mine());
        assert!(!engine.questions_enabled());
    }

    #[test]
    fn time_only_advances_while_active() {
        let mut engine = fixture(&PLAYING);
        engine.update_time(45_999);
        assert_eq!(engine.elapsed_ms(), 45_999);
        assert_eq!(engine.timer_seconds(), 45);

        engine.reveal((1, 0)).unwrap();
        engine.update_time(60_000);
        assert_eq!(engine.elapsed_ms(), 45_999);

        let mut ready = BoardEngine::from_seed(BoardConfig::default(), 4);
        ready.update_time(1_000);
        assert_eq!(ready.elapsed_ms(), 0);
    }

    #[test]
    fn new_game_clears_everything() {
        let mut engine = fixture(&CHORDABLE);
        engine.chord_reveal((4, 0)).unwrap();

        engine.new_game();

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.cells_remaining(), 54);
        assert!(engine.cells().iter().all(|&cell| cell == Cell::default()));
    }

    #[test]
    fn new_game_with_resizes_only_on_new_dimensions() {
        let mut engine = BoardEngine::from_seed(BoardConfig::default(), 6);
        engine.reveal((0, 0)).unwrap();

        engine.new_game_with(BoardConfig::from(Difficulty::Expert));
        assert_eq!(engine.cells().len(), 480);
        assert_eq!(engine.size(), (30, 16));
        assert_eq!(engine.cells_remaining(), 381);

        engine.new_game_with(BoardConfig::new(30, 16, 10));
        assert_eq!(engine.config().difficulty(), Difficulty::Custom);
        assert_eq!(engine.cells().len(), 480);
        assert_eq!(engine.cells_remaining(), 470);
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn checked_lookup_rejects_out_of_range() {
        let engine = BoardEngine::from_seed(BoardConfig::default(), 0);

        assert!(engine.cell((7, 7)).is_ok());
        assert_eq!(
            engine.cell((8, 0)).err(),
            Some(GameError::InvalidCoords { x: 8, y: 0 })
        );
    }

    #[test]
    fn mutators_reject_out_of_range() {
        let mut engine = BoardEngine::from_seed(BoardConfig::default(), 0);

        assert!(engine.reveal((0, 8)).is_err());
        assert!(engine.cycle_mark((9, 9)).is_err());
        assert!(engine.chord_reveal((100, 0)).is_err());
        assert!(!engine.can_chord((100, 0)));
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    #[should_panic]
    fn unchecked_lookup_panics_out_of_range() {
        let engine = BoardEngine::from_seed(BoardConfig::default(), 0);

        let cell = engine[Position::new(8, 8)];
        assert_eq!(cell.state(), CellState::Hidden);
    }

    #[test]
    fn scripted_rng_controls_placement() {
        /// Never moves anything, leaving the mines in the first cells.
        struct NoShuffle;

        impl MineRng for NoShuffle {
            fn below(&mut self, bound: usize) -> usize {
                bound - 1
            }
        }

        let mut engine = BoardEngine::with_rng(BoardConfig::new(8, 2, 2), NoShuffle);

        engine.reveal((7, 1)).unwrap();

        assert!(engine[Position::new(0, 0)].has_mine());
        assert!(engine[Position::new(1, 0)].has_mine());
        assert_eq!(mine_count(&engine), 2);
        // the two cells below the mines border no zero cell
        assert_eq!(engine.cells_remaining(), 2);
        assert_eq!(engine[Position::new(0, 1)].state(), CellState::Hidden);
        assert_eq!(engine[Position::new(1, 1)].state(), CellState::Hidden);
        assert_eq!(engine.state(), EngineState::Active);
    }
}
