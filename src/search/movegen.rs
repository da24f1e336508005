//! Candidate ordering.
//!
//! Priorities are a cheap heuristic blend, not an evaluation: immediate
//! wins first, blocks of the opponent's immediate win second, then killer
//! moves, then a center-bias plus fast-threat mix. Everything here is
//! deterministic so identically-seeded searches order identically.

use crate::board::Board;
use crate::state::GameState;
use crate::types::{Cell, Pos, DIRECTIONS, WIN_LENGTH};

use super::killers::KillerTable;

/// Candidates below this priority are skipped at depths above 2.
pub const PRIORITY_FLOOR: i32 = 10;

pub const IMMEDIATE_WIN_PRIORITY: i32 = 100_000;
pub const BLOCK_WIN_PRIORITY: i32 = 50_000;
pub const KILLER_BONUS: i32 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct ScoredMove {
    pub pos: Pos,
    pub priority: i32,
}

/// Categorical threat value of placing `side` at `pos`, as the maximum
/// over the four directions of the run that would result. Ordering only;
/// deliberately blind to gaps and blocking.
pub fn fast_threat(board: &Board, pos: Pos, side: Cell) -> i32 {
    let mut max_threat = 0;
    for dir in DIRECTIONS {
        let mut count = 1;
        for sign in [1, -1] {
            for k in 1..WIN_LENGTH {
                if board.at(pos.step(dir, sign * k)) == side {
                    count += 1;
                } else {
                    break;
                }
            }
        }
        let threat = match count {
            c if c >= WIN_LENGTH => 100_000,
            4 => 10_000,
            3 => 1_000,
            2 => 100,
            _ => 0,
        };
        max_threat = max_threat.max(threat);
    }
    max_threat
}

/// True win probe: actually places the stone and applies the exact-five
/// rule, so an overline never counts. The fast estimate alone would.
pub fn is_winning_move(state: &mut GameState, pos: Pos, side: Cell) -> bool {
    state.make_move(pos, side);
    let won = state.board().has_five(side);
    state.unmake_move(pos, side);
    won
}

/// Ordering priority for one candidate square.
pub fn priority(board: &Board, pos: Pos, side: Cell, killers: &KillerTable, depth: u8) -> i32 {
    let my_threat = fast_threat(board, pos, side);
    let opp_threat = fast_threat(board, pos, side.other());

    if my_threat >= 100_000 {
        return IMMEDIATE_WIN_PRIORITY;
    }
    if opp_threat >= 100_000 {
        return BLOCK_WIN_PRIORITY;
    }

    let n = board.side();
    let center = Pos::new(n / 2, n / 2);
    let mut priority = (n - pos.manhattan(center)).max(0);

    if killers.contains(depth, pos) {
        priority += KILLER_BONUS;
    }

    // Our opportunities weigh less than denying the opponent theirs.
    priority + my_threat / 10 + opp_threat / 5
}

/// Interesting empty squares scored and sorted by descending priority.
/// The sort is stable over the row-major enumeration, so ties resolve to
/// the lowest (x, y) and the whole ordering is deterministic.
pub fn ordered_candidates(
    state: &GameState,
    side: Cell,
    killers: &KillerTable,
    depth: u8,
) -> Vec<ScoredMove> {
    let board = state.board();
    let mut moves: Vec<ScoredMove> = state
        .enumerate_candidates()
        .into_iter()
        .map(|pos| ScoredMove {
            pos,
            priority: priority(board, pos, side, killers, depth),
        })
        .collect();
    moves.sort_by(|a, b| b.priority.cmp(&a.priority));
    moves
}
