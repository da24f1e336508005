//! Position state: the board plus every cache the search relies on, all
//! kept coherent under make/unmake.
//!
//! Caches carried alongside the board:
//! - incrementally XOR-maintained Zobrist hash,
//! - winner flags for both sides behind a validity bit,
//! - per-cell counts of stones within the interest radius, so candidate
//!   generation is a filter instead of a board scan and the set shrinks
//!   correctly when a move is unmade,
//! - the move history backing the public undo operation. The search's
//!   make/unmake pair leaves the history untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::EngineError;
use crate::hash::{recompute, ZobristTable};
use crate::types::{BoardSize, Cell, Move, Pos, INTEREST_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Win(Cell),
    Draw,
}

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    keys: Arc<ZobristTable>,
    zobrist: u64,
    seed: u64,
    interest: Vec<u16>,
    winner_cache: [bool; 2],
    winner_cache_valid: bool,
    history: Vec<Move>,
}

impl GameState {
    pub fn new(size: BoardSize, seed: u64) -> Self {
        let board = Board::new(size);
        let keys = Arc::new(ZobristTable::new(size, seed));
        let zobrist = recompute(&board, &keys);
        Self {
            interest: vec![0; size.cells()],
            board,
            keys,
            zobrist,
            seed,
            winner_cache: [false; 2],
            winner_cache_valid: false,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn size(&self) -> BoardSize {
        self.board.size()
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.board.stone_count()
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Shared read-only key schedule; clones reuse it through the Arc.
    #[inline]
    pub fn zobrist_keys(&self) -> &Arc<ZobristTable> {
        &self.keys
    }

    /// Place a stone and update every cache. Search-internal: the caller
    /// guarantees validity; public callers go through `apply_move`.
    pub(crate) fn make_move(&mut self, pos: Pos, side: Cell) {
        debug_assert!(side.is_stone());
        debug_assert!(self.board.is_empty(pos));
        self.board.set(pos, side);
        self.zobrist ^= self.keys.key(side, pos);
        self.winner_cache_valid = false;
        self.bump_interest(pos, 1);
    }

    /// Exact inverse of `make_move`; the caller is responsible for matched
    /// make/unmake pairing.
    pub(crate) fn unmake_move(&mut self, pos: Pos, side: Cell) {
        debug_assert!(self.board.at(pos) == side);
        self.board.set(pos, Cell::Empty);
        self.zobrist ^= self.keys.key(side, pos);
        self.winner_cache_valid = false;
        self.bump_interest(pos, -1);
    }

    fn bump_interest(&mut self, pos: Pos, delta: i32) {
        let n = self.board.side();
        let min_x = (pos.x - INTEREST_RADIUS).max(0);
        let max_x = (pos.x + INTEREST_RADIUS).min(n - 1);
        let min_y = (pos.y - INTEREST_RADIUS).max(0);
        let max_y = (pos.y + INTEREST_RADIUS).min(n - 1);
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                let idx = (x * n + y) as usize;
                let count = i32::from(self.interest[idx]) + delta;
                debug_assert!(count >= 0);
                self.interest[idx] = count as u16;
            }
        }
    }

    /// Validated placement that records history for `undo_move`.
    pub fn apply_move(&mut self, pos: Pos, side: Cell) -> Result<(), EngineError> {
        if !side.is_stone() || !self.board.is_empty(pos) {
            return Err(EngineError::IllegalMove { pos });
        }
        self.make_move(pos, side);
        self.history.push(Move::new(pos, side));
        Ok(())
    }

    /// Remove the most recent applied move and return it.
    pub fn undo_move(&mut self) -> Result<Move, EngineError> {
        let mv = self.history.pop().ok_or(EngineError::NothingToUndo)?;
        self.unmake_move(mv.pos, mv.side);
        Ok(mv)
    }

    /// Cached win check; recomputed for both sides when stale.
    pub fn winner(&mut self, side: Cell) -> bool {
        if !self.winner_cache_valid {
            self.winner_cache = [
                self.board.has_five(Cell::Cross),
                self.board.has_five(Cell::Naught),
            ];
            self.winner_cache_valid = true;
        }
        self.winner_cache[side.index()]
    }

    pub fn status(&mut self) -> GameStatus {
        if self.winner(Cell::Cross) {
            GameStatus::Win(Cell::Cross)
        } else if self.winner(Cell::Naught) {
            GameStatus::Win(Cell::Naught)
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Empty squares worth searching: within the interest radius of some
    /// stone, or the central 5x5 region on an empty board. Row-major order;
    /// the move ordering re-sorts by priority.
    pub fn enumerate_candidates(&self) -> Vec<Pos> {
        let n = self.board.side();
        if self.board.stone_count() == 0 {
            let center = Pos::new(n / 2, n / 2);
            let mut out = Vec::with_capacity(25);
            for x in (center.x - 2).max(0)..=(center.x + 2).min(n - 1) {
                for y in (center.y - 2).max(0)..=(center.y + 2).min(n - 1) {
                    out.push(Pos::new(x, y));
                }
            }
            return out;
        }

        let mut out = Vec::with_capacity(64);
        for x in 0..n {
            for y in 0..n {
                let pos = Pos::new(x, y);
                if self.interest[(x * n + y) as usize] > 0 && self.board.is_empty(pos) {
                    out.push(pos);
                }
            }
        }
        out
    }
}
