use std::hash::BuildHasherDefault;

use hashbrown::HashMap;

use crate::error::EngineError;
use crate::types::Pos;

type FastHasher = BuildHasherDefault<ahash::AHasher>;

/// Bound type for alpha-beta aware entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Value is a lower bound (search failed high).
    Lower,
    /// Value is an upper bound (search failed low).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    pub value: i32,
    /// Remaining search depth when stored.
    pub depth: u8,
    pub flag: Bound,
    pub best: Option<Pos>,
}

pub trait TranspositionTable {
    /// Windowed probe: returns the stored value only when the stored depth
    /// suffices and the bound flag admits it for the (alpha, beta) window.
    fn probe(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32>;

    /// Best-move retrieval for ordering; allowed even when the stored value
    /// is not usable for the current window.
    fn best_move(&self, key: u64) -> Option<Pos>;

    /// Depth-preferred store: overwrite iff incoming depth >= resident
    /// depth, or the slot is empty.
    fn store(&mut self, key: u64, entry: TtEntry);

    fn clear(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn window_admits(entry: &TtEntry, alpha: i32, beta: i32) -> bool {
    match entry.flag {
        Bound::Exact => true,
        Bound::Lower => entry.value >= beta,
        Bound::Upper => entry.value <= alpha,
    }
}

/// Fixed-size direct-mapped transposition table.
/// - Capacity must be a power of two
/// - Index = (key as usize) & mask
/// - Stores the full 64-bit key for verification
pub struct FixedTt {
    mask: usize,
    keys: Vec<u64>,
    entries: Vec<TtEntry>,
    count: usize,
}

const EMPTY_ENTRY: TtEntry = TtEntry {
    value: 0,
    depth: 0,
    flag: Bound::Exact,
    best: None,
};

impl FixedTt {
    /// Fallible construction so an oversized table surfaces as
    /// `ResourceExhausted` instead of an abort.
    pub fn try_with_capacity_pow2(cap_pow2: usize) -> Result<Self, EngineError> {
        assert!(
            cap_pow2.is_power_of_two(),
            "TT capacity must be a power of two"
        );
        let mut keys: Vec<u64> = Vec::new();
        keys.try_reserve_exact(cap_pow2)
            .map_err(|_| EngineError::ResourceExhausted)?;
        keys.resize(cap_pow2, 0);

        let mut entries: Vec<TtEntry> = Vec::new();
        entries
            .try_reserve_exact(cap_pow2)
            .map_err(|_| EngineError::ResourceExhausted)?;
        entries.resize(cap_pow2, EMPTY_ENTRY);

        Ok(Self {
            mask: cap_pow2 - 1,
            keys,
            entries,
            count: 0,
        })
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        // Low bits; Zobrist keys are well-mixed.
        (key as usize) & self.mask
    }

    #[inline]
    fn lookup(&self, key: u64) -> Option<&TtEntry> {
        let idx = self.index(key);
        (self.keys[idx] == key).then(|| &self.entries[idx])
    }
}

impl TranspositionTable for FixedTt {
    fn probe(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        self.lookup(key)
            .filter(|e| e.depth >= depth && window_admits(e, alpha, beta))
            .map(|e| e.value)
    }

    fn best_move(&self, key: u64) -> Option<Pos> {
        self.lookup(key).and_then(|e| e.best)
    }

    fn store(&mut self, key: u64, entry: TtEntry) {
        let idx = self.index(key);
        let slot_key = self.keys[idx];
        if slot_key == 0 {
            self.keys[idx] = key;
            self.entries[idx] = entry;
            self.count += 1;
            return;
        }
        // Same position or a colliding one: depth-preferred either way.
        if entry.depth >= self.entries[idx].depth {
            self.keys[idx] = key;
            self.entries[idx] = entry;
        }
    }

    fn clear(&mut self) {
        for k in &mut self.keys {
            *k = 0;
        }
        for e in &mut self.entries {
            *e = EMPTY_ENTRY;
        }
        self.count = 0;
    }

    fn len(&self) -> usize {
        self.count
    }
}

/// Hash-map table with the same replacement policy. Used for parity tests
/// against `FixedTt` and as the private per-task table in the parallel
/// driver, where a fixed slab per clone would be wasteful.
#[derive(Debug, Default)]
pub struct MapTt {
    map: HashMap<u64, TtEntry, FastHasher>,
}

impl MapTt {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(cap, FastHasher::default()),
        }
    }
}

impl TranspositionTable for MapTt {
    fn probe(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        self.map
            .get(&key)
            .filter(|e| e.depth >= depth && window_admits(e, alpha, beta))
            .map(|e| e.value)
    }

    fn best_move(&self, key: u64) -> Option<Pos> {
        self.map.get(&key).and_then(|e| e.best)
    }

    fn store(&mut self, key: u64, entry: TtEntry) {
        match self.map.get_mut(&key) {
            Some(old) => {
                if entry.depth >= old.depth {
                    *old = entry;
                }
            }
            None => {
                self.map.insert(key, entry);
            }
        }
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
