//! Pattern-based static evaluation.
//!
//! Each stone is scored by classifying the line through it in all four
//! directions into a threat category, summing the category costs, and
//! adding bonuses for threatening combinations (e.g. a three and a four
//! crossing at one stone). The full-board score is the sum over own stones
//! minus the sum over opponent stones, short-circuited to ±WIN_SCORE when a
//! five is already on the board.

use crate::board::Board;
use crate::types::{Cell, Dir, Pos, DIRECTIONS, EVAL_RADIUS, WIN_LENGTH};

pub const WIN_SCORE: i32 = 1_000_000;
pub const LOSE_SCORE: i32 = -WIN_SCORE;

/// Length of the analysis window centered on the anchor stone.
pub const LINE_LEN: usize = (WIN_LENGTH * 2 - 1) as usize;
const CENTER: usize = (WIN_LENGTH - 1) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threat {
    None,
    NearEnemy,
    Two,
    BrokenThree,
    Three,
    BrokenFour,
    Four,
    StraightFour,
    Five,
}

impl Threat {
    #[inline]
    pub const fn cost(self) -> i32 {
        match self {
            Threat::None => 0,
            Threat::NearEnemy => 1,
            Threat::Two => 10,
            Threat::BrokenThree => 100,
            Threat::Three => 1_000,
            Threat::BrokenFour => 1_000,
            Threat::Four => 10_000,
            Threat::StraightFour => 100_000,
            Threat::Five => WIN_SCORE,
        }
    }
}

/// Bonus for two threats crossing at one stone. Symmetric in its arguments.
#[inline]
pub const fn combination_bonus(a: Threat, b: Threat) -> i32 {
    match (a, b) {
        (Threat::Three, Threat::Four) | (Threat::Four, Threat::Three) => 200_000,
        (Threat::Three, Threat::Three) => 50_000,
        (Threat::Three, Threat::BrokenThree) | (Threat::BrokenThree, Threat::Three) => 10_000,
        _ => 0,
    }
}

/// Classify the threat the center stone poses along one line.
///
/// The window is 2*W-1 cells with the anchor at the center; cells beyond
/// the board edge are passed in as Empty (they neither block nor extend).
pub fn classify_line(line: &[Cell; LINE_LEN], side: Cell) -> Threat {
    debug_assert!(side.is_stone());
    if line[CENTER] != side {
        return Threat::None;
    }
    let opponent = side.other();

    let mut left = 0usize;
    while left < CENTER && line[CENTER - 1 - left] == side {
        left += 1;
    }
    let mut right = 0usize;
    while CENTER + 1 + right < LINE_LEN && line[CENTER + 1 + right] == side {
        right += 1;
    }
    let count = (1 + left + right) as i32;

    let before = CENTER.checked_sub(left + 1).map(|i| line[i]);
    let after = line.get(CENTER + right + 1).copied();
    let left_blocked = before == Some(opponent);
    let right_blocked = after == Some(opponent);
    let left_open = before == Some(Cell::Empty);
    let right_open = after == Some(Cell::Empty);

    if count >= WIN_LENGTH {
        Threat::Five
    } else if count == 4 {
        if !left_blocked && !right_blocked {
            Threat::StraightFour
        } else {
            Threat::Four
        }
    } else if count == 3 {
        if !left_blocked && !right_blocked {
            Threat::Three
        } else {
            Threat::BrokenThree
        }
    } else if count == 2 {
        Threat::Two
    } else if left_open || right_open {
        Threat::NearEnemy
    } else {
        Threat::None
    }
}

#[inline]
fn extract_line(board: &Board, pos: Pos, dir: Dir, side: Cell) -> [Cell; LINE_LEN] {
    let mut line = [Cell::Empty; LINE_LEN];
    for (i, slot) in line.iter_mut().enumerate() {
        let k = i as i32 - CENTER as i32;
        *slot = board.at(pos.step(dir, k));
    }
    // The anchor is scored as the nominated side, which also lets the move
    // ordering probe empty candidate squares.
    line[CENTER] = side;
    line
}

/// Threat score of a single stone: four directional classifications plus
/// every pairwise combination bonus (at most 6 pairs).
pub fn cell_score(board: &Board, side: Cell, pos: Pos) -> i32 {
    if !board.in_bounds(pos) {
        return 0;
    }
    let mut threats = [Threat::None; 4];
    let mut total: i64 = 0;
    for (d, dir) in DIRECTIONS.iter().enumerate() {
        let line = extract_line(board, pos, *dir, side);
        let threat = classify_line(&line, side);
        threats[d] = threat;
        total += i64::from(threat.cost());
    }
    for i in 0..threats.len() {
        for j in (i + 1)..threats.len() {
            total += i64::from(combination_bonus(threats[i], threats[j]));
        }
    }
    // Bounded by 4 * Five + 6 * the largest combination bonus; fits i32.
    total as i32
}

/// Full-board evaluation from `side`'s perspective. Terminal positions
/// short-circuit to ±WIN_SCORE.
pub fn position_score(board: &Board, side: Cell) -> i32 {
    let opponent = side.other();
    if board.has_five(side) {
        return WIN_SCORE;
    }
    if board.has_five(opponent) {
        return LOSE_SCORE;
    }

    let n = board.side();
    let mut total: i64 = 0;
    for x in 0..n {
        for y in 0..n {
            total += scored_cell(board, side, opponent, Pos::new(x, y));
        }
    }
    clamp_score(total)
}

/// Leaf evaluation: identical to `position_score` but restricted to the
/// Chebyshev neighborhood of the last move. Placing a stone only changes
/// threats within a bounded radius.
pub fn position_score_incremental(board: &Board, side: Cell, last_move: Pos) -> i32 {
    let opponent = side.other();
    if board.has_five(side) {
        return WIN_SCORE;
    }
    if board.has_five(opponent) {
        return LOSE_SCORE;
    }

    let n = board.side();
    let min_x = (last_move.x - EVAL_RADIUS).max(0);
    let max_x = (last_move.x + EVAL_RADIUS).min(n - 1);
    let min_y = (last_move.y - EVAL_RADIUS).max(0);
    let max_y = (last_move.y + EVAL_RADIUS).min(n - 1);

    let mut total: i64 = 0;
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            total += scored_cell(board, side, opponent, Pos::new(x, y));
        }
    }
    clamp_score(total)
}

#[inline]
fn scored_cell(board: &Board, side: Cell, opponent: Cell, pos: Pos) -> i64 {
    let cell = board.at(pos);
    if cell == side {
        i64::from(cell_score(board, side, pos))
    } else if cell == opponent {
        -i64::from(cell_score(board, opponent, pos))
    } else {
        0
    }
}

/// Non-terminal scores stay strictly inside (LOSE_SCORE, WIN_SCORE) so a
/// pathological pile-up of combination bonuses can never masquerade as a
/// decided game.
#[inline]
fn clamp_score(total: i64) -> i32 {
    total.clamp(i64::from(LOSE_SCORE) + 1, i64::from(WIN_SCORE) - 1) as i32
}
