//! Engine facade: owns the worker pool and the persistent transposition
//! table by value and exposes the whole public search API. Two front-ends
//! can share one engine by reference or hold one each; there is no global
//! state.

use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::search::{
    find_best_move_parallel, reconstruct_pv, FixedTt, MoveResult, SearchLimits, Searcher,
    TranspositionTable, WorkerPool, TT_CAPACITY,
};
use crate::state::{GameState, GameStatus};
use crate::types::{BoardSize, Cell, Move, Pos};

/// Search-depth presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[inline]
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    pub board_size: BoardSize,
    /// Default search depth when the caller does not pass one explicitly.
    pub max_depth: u8,
    /// Worker threads; None auto-detects (hardware parallelism - 1).
    pub threads: Option<usize>,
    /// Seed for the Zobrist schedule and the random opening reply.
    pub seed: u64,
    /// Default per-move wall-clock budget; None means unbounded.
    pub time_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::Nineteen,
            max_depth: Difficulty::Medium.depth(),
            threads: None,
            seed: 0x00C0_FFEE,
            time_ms: None,
        }
    }
}

pub struct Engine {
    pool: WorkerPool,
    tt: FixedTt,
    /// Perspective the persistent table's values were stored from.
    tt_side: Option<Cell>,
    config: EngineConfig,
}

impl Engine {
    /// Build an engine: worker pool plus the persistent transposition
    /// table. Either allocation failing reports `ResourceExhausted`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let pool = WorkerPool::new(config.threads)?;
        let tt = FixedTt::try_with_capacity_pow2(TT_CAPACITY)?;
        Ok(Self {
            pool,
            tt,
            tt_side: None,
            config,
        })
    }

    pub fn with_defaults() -> Result<Self, EngineError> {
        Self::new(EngineConfig::default())
    }

    #[inline]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.size()
    }

    /// Fresh state using the configured board size and seed.
    pub fn create_state(&self) -> GameState {
        GameState::new(self.config.board_size, self.config.seed)
    }

    /// Fresh state with explicit size and seed (the HTTP front-end rebuilds
    /// one per request).
    pub fn create_state_with(&self, size: BoardSize, seed: u64) -> GameState {
        GameState::new(size, seed)
    }

    pub fn apply_move(&self, state: &mut GameState, pos: Pos, side: Cell) -> Result<(), EngineError> {
        state.apply_move(pos, side)
    }

    pub fn undo_move(&self, state: &mut GameState) -> Result<Move, EngineError> {
        state.undo_move()
    }

    pub fn game_status(&self, state: &mut GameState) -> GameStatus {
        state.status()
    }

    /// Principal variation for the most recently searched side, followed
    /// through the persistent table. Empty before any search.
    pub fn principal_variation(&self, state: &mut GameState, max_len: usize) -> Vec<Move> {
        match self.tt_side {
            Some(side) => reconstruct_pv(state, &self.tt, side, max_len),
            None => Vec::new(),
        }
    }

    /// Search with the configured defaults for depth and time budget.
    pub fn find_move(&mut self, state: &mut GameState, side: Cell) -> Result<MoveResult, EngineError> {
        self.find_best_move(state, side, self.config.max_depth, self.config.time_ms)
    }

    /// Best next move for `side` within the depth/time budget.
    ///
    /// Dispatch: the opening (fewer than two stones) and any search with a
    /// wall-clock deadline run sequentially; everything else fans the root
    /// out over the worker pool.
    pub fn find_best_move(
        &mut self,
        state: &mut GameState,
        side: Cell,
        max_depth: u8,
        deadline_ms: Option<u64>,
    ) -> Result<MoveResult, EngineError> {
        if !side.is_stone() {
            return Err(EngineError::IllegalMove {
                pos: Pos::new(-1, -1),
            });
        }
        if state.status() != GameStatus::InProgress {
            return Err(EngineError::GameOver);
        }

        // Stored values are from the root side's perspective; a side flip
        // invalidates the whole table.
        if self.tt_side != Some(side) {
            self.tt.clear();
            self.tt_side = Some(side);
        }

        let start = Instant::now();
        let limits = SearchLimits {
            max_depth,
            time_ms: deadline_ms,
        };

        let outcome = if state.stone_count() < 2 || deadline_ms.is_some() {
            let deadline = deadline_ms.map(|ms| start + Duration::from_millis(ms));
            Searcher::new(&mut self.tt, side, deadline, None).run(state, limits)
        } else {
            find_best_move_parallel(&self.pool, &mut self.tt, state, side, limits)
        };

        // An in-progress game always has a legal move, so the search always
        // produces a result.
        let result = outcome.ok_or(EngineError::GameOver)?;
        info!(
            "search done: move ({}, {}) score {} depth {} nodes {} timed_out {} in {:.0?}",
            result.mv.pos.x,
            result.mv.pos.y,
            result.score,
            result.depth_reached,
            result.nodes_evaluated,
            result.timed_out,
            start.elapsed()
        );
        Ok(result)
    }
}
