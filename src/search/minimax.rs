//! Sequential alpha-beta minimax with iterative deepening.
//!
//! Scores are always from the root side's perspective; the minimizing
//! levels play the opponent. Win values are depth-adjusted (WIN + depth)
//! so faster wins and slower losses order correctly. The deadline is
//! cooperative: every node checks it, the flag is sticky, and a depth
//! interrupted mid-iteration is never trusted - the caller keeps the last
//! fully completed depth.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::debug;
use rand::Rng;

use crate::eval::{position_score_incremental, LOSE_SCORE, WIN_SCORE};
use crate::rng::rng_for_reply;
use crate::state::GameState;
use crate::types::{Cell, Move, Pos};

use super::killers::KillerTable;
use super::movegen::{fast_threat, is_winning_move, ordered_candidates, PRIORITY_FLOOR};
use super::tt::{Bound, TranspositionTable, TtEntry};
use super::{MoveResult, SearchLimits};

pub struct Searcher<'a> {
    tt: &'a mut dyn TranspositionTable,
    killers: KillerTable,
    root_side: Cell,
    deadline: Option<Instant>,
    stop: Option<&'a AtomicBool>,
    timed_out: bool,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(
        tt: &'a mut dyn TranspositionTable,
        root_side: Cell,
        deadline: Option<Instant>,
        stop: Option<&'a AtomicBool>,
    ) -> Self {
        Self {
            tt,
            killers: KillerTable::default(),
            root_side,
            deadline,
            stop,
            timed_out: false,
            nodes: 0,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Sticky deadline/stop check. Once true it stays true, and a local
    /// deadline expiry is published to the shared stop flag when present.
    fn check_timeout(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(stop) = self.stop {
            if stop.load(Ordering::Relaxed) {
                self.timed_out = true;
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.timed_out = true;
                if let Some(stop) = self.stop {
                    stop.store(true, Ordering::Relaxed);
                }
                return true;
            }
        }
        false
    }

    /// Alpha-beta minimax. `depth` is remaining depth, `last_move` the stone
    /// placed by the parent level (anchor for the incremental leaf eval).
    pub fn minimax(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        last_move: Pos,
    ) -> i32 {
        self.nodes += 1;

        if self.check_timeout() {
            return position_score_incremental(state.board(), self.root_side, last_move);
        }

        let key = state.zobrist();
        if let Some(value) = self.tt.probe(key, depth, alpha, beta) {
            return value;
        }

        if state.winner(self.root_side) {
            let value = WIN_SCORE + i32::from(depth);
            self.store(key, value, depth, Bound::Exact, None);
            return value;
        }
        if state.winner(self.root_side.other()) {
            let value = -(WIN_SCORE + i32::from(depth));
            self.store(key, value, depth, Bound::Exact, None);
            return value;
        }

        if depth == 0 {
            let value = position_score_incremental(state.board(), self.root_side, last_move);
            self.store(key, value, depth, Bound::Exact, None);
            return value;
        }

        let to_move = if maximizing {
            self.root_side
        } else {
            self.root_side.other()
        };
        let moves = ordered_candidates(state, to_move, &self.killers, depth);
        if moves.is_empty() {
            return 0;
        }

        let original_alpha = alpha;
        let original_beta = beta;
        let mut best: Option<Pos> = None;

        if maximizing {
            let mut max_eval = LOSE_SCORE - 1;
            let mut searched_any = false;
            for m in &moves {
                if self.check_timeout() {
                    return max_eval;
                }
                if depth > 2 && m.priority < PRIORITY_FLOOR {
                    continue;
                }
                searched_any = true;
                state.make_move(m.pos, to_move);
                let eval = self.minimax(state, depth - 1, alpha, beta, false, m.pos);
                state.unmake_move(m.pos, to_move);

                if eval > max_eval {
                    max_eval = eval;
                    best = Some(m.pos);
                }
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            if !searched_any {
                // The priority floor rejected every candidate; score the
                // node statically instead of trusting the sentinel.
                return position_score_incremental(state.board(), self.root_side, last_move);
            }
            let flag = if max_eval <= original_alpha {
                Bound::Upper
            } else if max_eval >= original_beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.store(key, max_eval, depth, flag, best);
            if max_eval >= original_beta {
                if let Some(pos) = best {
                    self.killers.store(depth, pos);
                }
            }
            max_eval
        } else {
            let mut min_eval = WIN_SCORE + 1;
            let mut searched_any = false;
            for m in &moves {
                if self.check_timeout() {
                    return min_eval;
                }
                if depth > 2 && m.priority < PRIORITY_FLOOR {
                    continue;
                }
                searched_any = true;
                state.make_move(m.pos, to_move);
                let eval = self.minimax(state, depth - 1, alpha, beta, true, m.pos);
                state.unmake_move(m.pos, to_move);

                if eval < min_eval {
                    min_eval = eval;
                    best = Some(m.pos);
                }
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            if !searched_any {
                return position_score_incremental(state.board(), self.root_side, last_move);
            }
            let flag = if min_eval <= original_alpha {
                Bound::Upper
            } else if min_eval >= original_beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.store(key, min_eval, depth, flag, best);
            if min_eval <= original_alpha {
                if let Some(pos) = best {
                    self.killers.store(depth, pos);
                }
            }
            min_eval
        }
    }

    #[inline]
    fn store(&mut self, key: u64, value: i32, depth: u8, flag: Bound, best: Option<Pos>) {
        self.tt.store(
            key,
            TtEntry {
                value,
                depth,
                flag,
                best,
            },
        );
    }

    /// Iterative-deepening driver. Returns None only when the position has
    /// no empty square at all; any other outcome carries a legal move.
    pub fn run(&mut self, state: &mut GameState, limits: SearchLimits) -> Option<MoveResult> {
        if state.stone_count() == 1 {
            return Some(self.opening_reply(state));
        }

        let side = self.root_side;

        // Checkmate shortcut: a verified immediate win skips the search.
        // The fast estimate only nominates; the probe applies the
        // exact-five rule so overlines cannot slip through.
        let mut probed = 0u64;
        for pos in state.enumerate_candidates() {
            if fast_threat(state.board(), pos, side) >= 100_000 {
                probed += 1;
                if is_winning_move(state, pos, side) {
                    debug!("immediate win at ({}, {})", pos.x, pos.y);
                    return Some(MoveResult {
                        mv: Move::new(pos, side),
                        score: WIN_SCORE,
                        depth_reached: 1,
                        nodes_evaluated: probed,
                        timed_out: false,
                        winning_move: true,
                    });
                }
            }
        }

        let mut best: Option<(Pos, i32, u8)> = None;
        // Standing fallback so even an instantly expiring deadline still
        // yields a sensible legal move.
        let mut fallback: Option<Pos> = state.enumerate_candidates().into_iter().next();

        for depth in 1..=limits.max_depth.max(1) {
            if self.check_timeout() {
                break;
            }
            let moves = ordered_candidates(state, side, &self.killers, depth);
            if moves.is_empty() {
                // Every interesting square is occupied; fall back to any
                // empty cell so a legal move is still returned.
                fallback = fallback.or_else(|| first_empty(state));
                break;
            }
            // Prefer the top-ordered candidate once one is known.
            fallback = Some(moves[0].pos);

            let mut depth_best: Option<(Pos, i32)> = None;
            let mut alpha = LOSE_SCORE - 1;
            let beta = WIN_SCORE + 1;

            for m in &moves {
                if self.check_timeout() {
                    break;
                }
                state.make_move(m.pos, side);
                let score = self.minimax(state, depth - 1, alpha, beta, false, m.pos);
                state.unmake_move(m.pos, side);
                if self.timed_out {
                    // Partial results at an unfinished depth are never
                    // trusted.
                    break;
                }
                if depth_best.map_or(true, |(_, s)| score > s) {
                    depth_best = Some((m.pos, score));
                }
                alpha = alpha.max(score);
            }

            if self.timed_out {
                break;
            }
            if let Some((pos, score)) = depth_best {
                debug!(
                    "depth {} best ({}, {}) score {} nodes {}",
                    depth, pos.x, pos.y, score, self.nodes
                );
                best = Some((pos, score, depth));
                // Root entry anchors principal-variation reconstruction.
                self.store(state.zobrist(), score, depth, Bound::Exact, Some(pos));
            }
        }

        if let Some((pos, score, depth)) = best {
            Some(MoveResult {
                mv: Move::new(pos, side),
                score,
                depth_reached: depth,
                nodes_evaluated: self.nodes,
                timed_out: self.timed_out,
                winning_move: score >= WIN_SCORE,
            })
        } else {
            // The deadline fired before depth 1 completed.
            let pos = fallback.or_else(|| first_empty(state))?;
            Some(MoveResult {
                mv: Move::new(pos, side),
                score: 0,
                depth_reached: 0,
                nodes_evaluated: self.nodes,
                timed_out: self.timed_out,
                winning_move: false,
            })
        }
    }

    /// Reply to the very first stone: a uniformly random empty square at
    /// Chebyshev distance 1 or 2 from it. No search involved.
    fn opening_reply(&mut self, state: &GameState) -> MoveResult {
        let board = state.board();
        let n = board.side();

        let mut anchor = Pos::new(n / 2, n / 2);
        'scan: for x in 0..n {
            for y in 0..n {
                if board.at(Pos::new(x, y)).is_stone() {
                    anchor = Pos::new(x, y);
                    break 'scan;
                }
            }
        }

        let mut options = Vec::with_capacity(24);
        for x in (anchor.x - 2).max(0)..=(anchor.x + 2).min(n - 1) {
            for y in (anchor.y - 2).max(0)..=(anchor.y + 2).min(n - 1) {
                let pos = Pos::new(x, y);
                let dist = pos.chebyshev(anchor);
                if (1..=2).contains(&dist) && board.is_empty(pos) {
                    options.push(pos);
                }
            }
        }

        let mut rng = rng_for_reply(state.seed(), state.zobrist());
        let pos = options[rng.gen_range(0..options.len())];
        MoveResult {
            mv: Move::new(pos, self.root_side),
            score: 0,
            depth_reached: 0,
            nodes_evaluated: 0,
            timed_out: false,
            winning_move: false,
        }
    }
}

fn first_empty(state: &GameState) -> Option<Pos> {
    let board = state.board();
    let n = board.side();
    for x in 0..n {
        for y in 0..n {
            let pos = Pos::new(x, y);
            if board.is_empty(pos) {
                return Some(pos);
            }
        }
    }
    None
}

/// Reconstruct the principal variation by following stored best moves,
/// alternating sides from `side`. Stops at `max_len` plies, at the first
/// position with no stored move, or when the line reaches a win. The state
/// is restored exactly before returning.
pub fn reconstruct_pv(
    state: &mut GameState,
    tt: &dyn TranspositionTable,
    side: Cell,
    max_len: usize,
) -> Vec<Move> {
    let mut pv: Vec<Move> = Vec::new();
    let mut to_move = side;

    while pv.len() < max_len {
        let Some(pos) = tt.best_move(state.zobrist()) else {
            break;
        };
        if !state.board().is_empty(pos) {
            break;
        }
        state.make_move(pos, to_move);
        pv.push(Move::new(pos, to_move));
        if state.winner(to_move) {
            break;
        }
        to_move = to_move.other();
    }

    for mv in pv.iter().rev() {
        state.unmake_move(mv.pos, mv.side);
    }
    pv
}
