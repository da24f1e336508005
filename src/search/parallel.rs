//! Root-parallel search driver.
//!
//! The root candidates are ordered once, the strongest P are fanned out
//! over the worker pool (one cloned state per task, each with its own
//! private table), and the rest are searched sequentially on the caller's
//! thread with the alpha floor the batch established. Cross-task
//! communication is limited to a monotonically raised best-score/alpha
//! pair, a sticky stop flag, and a node counter - none of which affect
//! correctness, only pruning.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::bounded;
use log::debug;

use crate::eval::{LOSE_SCORE, WIN_SCORE};
use crate::state::GameState;
use crate::types::{Cell, Move, Pos};

use super::killers::KillerTable;
use super::minimax::Searcher;
use super::movegen::{is_winning_move, ordered_candidates};
use super::pool::WorkerPool;
use super::tt::{Bound, MapTt, TranspositionTable, TtEntry};
use super::{MoveResult, SearchLimits};

/// Cap on concurrently evaluated root moves.
const MAX_PARALLEL_ROOT: usize = 8;

struct SharedSearch {
    best_score: AtomicI32,
    alpha: AtomicI32,
    stop: AtomicBool,
    nodes: AtomicU64,
}

impl SharedSearch {
    fn new() -> Self {
        Self {
            best_score: AtomicI32::new(LOSE_SCORE - 1),
            alpha: AtomicI32::new(LOSE_SCORE - 1),
            stop: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
        }
    }
}

/// Monotonic publication: only ever raises the stored value.
fn raise(cell: &AtomicI32, value: i32) {
    let mut current = cell.load(Ordering::Relaxed);
    while value > current {
        match cell.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(observed) => current = observed,
        }
    }
}

/// Search one root move on a cloned state. Returns None when the task was
/// aborted or timed out; the driver treats that as "incomplete", never as
/// a score.
fn evaluate_root_move(
    state: &mut GameState,
    side: Cell,
    mv: Pos,
    depth: u8,
    shared: &SharedSearch,
) -> Option<i32> {
    if shared.stop.load(Ordering::Relaxed) {
        return None;
    }
    state.make_move(mv, side);

    let mut tt = MapTt::default();
    let alpha = shared.alpha.load(Ordering::Relaxed);
    let mut searcher = Searcher::new(&mut tt, side, None, Some(&shared.stop));
    let score = searcher.minimax(state, depth - 1, alpha, WIN_SCORE + 1, false, mv);

    shared.nodes.fetch_add(searcher.nodes(), Ordering::Relaxed);
    if searcher.timed_out() {
        return None;
    }
    raise(&shared.best_score, score);
    raise(&shared.alpha, score);
    Some(score)
}

/// Root-parallel `find_best_move`. The caller has already ruled out the
/// sequential-only cases (opening, wall-clock timeout, finished game).
pub fn find_best_move_parallel(
    pool: &WorkerPool,
    tt: &mut dyn TranspositionTable,
    state: &mut GameState,
    side: Cell,
    limits: SearchLimits,
) -> Option<MoveResult> {
    debug_assert!(limits.time_ms.is_none());

    let depth = limits.max_depth.max(1);
    let killers = KillerTable::default();
    let moves = ordered_candidates(state, side, &killers, depth);

    if moves.is_empty() {
        // Dense board with no interesting square left; the sequential path
        // carries the any-empty-cell fallback.
        return Searcher::new(tt, side, None, None).run(state, limits);
    }

    if moves.len() == 1 {
        let pos = moves[0].pos;
        let winning = is_winning_move(state, pos, side);
        return Some(MoveResult {
            mv: Move::new(pos, side),
            score: if winning { WIN_SCORE } else { 0 },
            depth_reached: 0,
            nodes_evaluated: 0,
            timed_out: false,
            winning_move: winning,
        });
    }

    let parallel = moves.len().min(pool.size()).min(MAX_PARALLEL_ROOT);
    let shared = Arc::new(SharedSearch::new());

    let mut replies = Vec::with_capacity(parallel);
    for m in &moves[..parallel] {
        let mv = m.pos;
        let mut clone = state.clone();
        let shared = Arc::clone(&shared);
        let (tx, rx) = bounded(1);
        pool.execute(move || {
            let outcome = evaluate_root_move(&mut clone, side, mv, depth, &shared);
            // The clone is released before the result is published.
            drop(clone);
            let _ = tx.send(outcome);
        });
        replies.push(rx);
    }

    // Collect in submission order so equal scores resolve to the move the
    // ordering ranked first.
    let mut best: Option<(Pos, i32)> = None;
    for (m, rx) in moves[..parallel].iter().zip(&replies) {
        if let Ok(Some(score)) = rx.recv() {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((m.pos, score));
            }
        }
    }

    // Remaining candidates run on the caller's thread, seeded with the
    // alpha floor the batch established.
    let mut seq_nodes = 0u64;
    if moves.len() > parallel {
        let mut searcher = Searcher::new(tt, side, None, Some(&shared.stop));
        for m in &moves[parallel..] {
            if shared.stop.load(Ordering::Relaxed) {
                break;
            }
            let alpha = shared.alpha.load(Ordering::Relaxed);
            state.make_move(m.pos, side);
            let score = searcher.minimax(state, depth - 1, alpha, WIN_SCORE + 1, false, m.pos);
            state.unmake_move(m.pos, side);
            if searcher.timed_out() {
                break;
            }
            raise(&shared.best_score, score);
            raise(&shared.alpha, score);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((m.pos, score));
            }
        }
        seq_nodes = searcher.nodes();
    }

    let timed_out = shared.stop.load(Ordering::Relaxed);
    let nodes = shared.nodes.load(Ordering::Relaxed) + seq_nodes;

    if let Some((pos, score)) = best {
        // Root anchor so the principal variation can be followed later.
        tt.store(
            state.zobrist(),
            TtEntry {
                value: score,
                depth,
                flag: Bound::Exact,
                best: Some(pos),
            },
        );
    }

    let result = match best {
        Some((pos, score)) => MoveResult {
            mv: Move::new(pos, side),
            score,
            depth_reached: depth,
            nodes_evaluated: nodes,
            timed_out,
            winning_move: score >= WIN_SCORE,
        },
        // Every task came back incomplete: fall back to the top-ordered
        // candidate rather than returning no move.
        None => MoveResult {
            mv: Move::new(moves[0].pos, side),
            score: 0,
            depth_reached: 0,
            nodes_evaluated: nodes,
            timed_out,
            winning_move: false,
        },
    };

    debug!(
        "parallel root: {} candidates, {} tasks, nodes {}, best ({}, {}) score {}",
        moves.len(),
        parallel,
        nodes,
        result.mv.pos.x,
        result.mv.pos.y,
        result.score
    );
    Some(result)
}
