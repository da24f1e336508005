use serde::{Deserialize, Serialize};

use crate::types::Move;

pub mod killers;
pub mod minimax;
pub mod movegen;
pub mod parallel;
pub mod pool;
pub mod tt;

pub use killers::KillerTable;
pub use minimax::{reconstruct_pv, Searcher};
pub use parallel::find_best_move_parallel;
pub use pool::WorkerPool;
pub use tt::{Bound, FixedTt, MapTt, TranspositionTable, TtEntry};

/// Default transposition table capacity (power of two, >= 1e5 entries).
pub const TT_CAPACITY: usize = 1 << 17;

#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: u8,
    /// Wall-clock budget for the whole search; None means unbounded.
    pub time_ms: Option<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_ms: None,
        }
    }
}

/// Outcome of a completed search. A result is always a complete, legal
/// move; deadline expiry only shows up as `timed_out` plus a shallower
/// `depth_reached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub mv: Move,
    pub score: i32,
    pub depth_reached: u8,
    pub nodes_evaluated: u64,
    pub timed_out: bool,
    pub winning_move: bool,
}
