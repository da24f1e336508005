//! Zobrist hashing.
//!
//! A position hashes to a fixed base token XORed with one precomputed
//! random key per (side, occupied cell). The schedule is generated once
//! per state from a caller-supplied seed and shared read-only across
//! search clones; the
//! running hash is maintained incrementally by XOR on make/unmake.
//! `recompute` exists to initialize the hash and to cross-check the
//! incremental updates in tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::board::Board;
use crate::types::{BoardSize, Cell, Pos};

// Domain tag folded into every hash. The fixed-size table uses key 0 as
// its empty-slot sentinel, so no reachable position may hash to 0; without
// this token the empty board would.
const DOM_BASE: u64 = 0xB0A2_1D5E_5EED_0001;

#[derive(Debug)]
pub struct ZobristTable {
    side: i32,
    // Keys for both sides, laid out [side][x * n + y].
    keys: Vec<u64>,
}

impl ZobristTable {
    pub fn new(size: BoardSize, seed: u64) -> Self {
        let n = size.cells();
        let mut rng = Pcg64::seed_from_u64(seed);
        let keys = (0..2 * n).map(|_| rng.gen::<u64>()).collect();
        Self {
            side: size.side(),
            keys,
        }
    }

    #[inline]
    pub fn key(&self, side: Cell, pos: Pos) -> u64 {
        debug_assert!(side.is_stone());
        let cell = (pos.x * self.side + pos.y) as usize;
        self.keys[side.index() * (self.side * self.side) as usize + cell]
    }
}

/// Full recomputation from board contents; order-independent by XOR.
/// Starts from the base token, which make/unmake's incremental XOR updates
/// preserve.
pub fn recompute(board: &Board, keys: &ZobristTable) -> u64 {
    let n = board.side();
    let mut hash = DOM_BASE;
    for x in 0..n {
        for y in 0..n {
            let pos = Pos::new(x, y);
            let cell = board.at(pos);
            if cell.is_stone() {
                hash ^= keys.key(cell, pos);
            }
        }
    }
    hash
}
