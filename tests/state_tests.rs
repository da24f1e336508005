use quintet::hash::recompute;
use quintet::{BoardSize, Cell, EngineError, GameState, GameStatus, Pos};

#[test]
fn fresh_state_hash_matches_recompute() {
    let state = GameState::new(BoardSize::Nineteen, 42);
    assert_eq!(state.zobrist(), recompute(state.board(), state.zobrist_keys()));
    // The base token keeps every reachable hash away from the fixed
    // table's empty-slot sentinel, the empty board included.
    assert_ne!(state.zobrist(), 0);
}

#[test]
fn incremental_hash_matches_recompute_during_play() {
    let mut state = GameState::new(BoardSize::Fifteen, 7);
    let script = [
        (Pos::new(7, 7), Cell::Cross),
        (Pos::new(7, 8), Cell::Naught),
        (Pos::new(8, 7), Cell::Cross),
        (Pos::new(6, 6), Cell::Naught),
    ];
    for (pos, side) in script {
        state.apply_move(pos, side).expect("legal move");
        assert_eq!(
            state.zobrist(),
            recompute(state.board(), state.zobrist_keys()),
            "cached hash diverged after ({}, {})",
            pos.x,
            pos.y
        );
    }
}

#[test]
fn apply_then_undo_restores_everything() {
    // I1: board, stone count, hash, candidates and status all return to
    // their initial values after a matched apply/undo sequence.
    let mut state = GameState::new(BoardSize::Nineteen, 99);
    state.apply_move(Pos::new(9, 9), Cell::Cross).expect("seed stone");

    let hash0 = state.zobrist();
    let stones0 = state.stone_count();
    let candidates0 = state.enumerate_candidates();

    let script = [
        (Pos::new(9, 10), Cell::Naught),
        (Pos::new(10, 10), Cell::Cross),
        (Pos::new(8, 8), Cell::Naught),
        (Pos::new(11, 11), Cell::Cross),
    ];
    for (pos, side) in script {
        state.apply_move(pos, side).expect("legal move");
    }
    for _ in 0..script.len() {
        state.undo_move().expect("history present");
    }

    assert_eq!(state.zobrist(), hash0, "hash not restored");
    assert_eq!(state.stone_count(), stones0, "stone count not restored");
    assert_eq!(
        state.enumerate_candidates(),
        candidates0,
        "interesting squares not restored"
    );
    assert_eq!(state.status(), GameStatus::InProgress);
}

#[test]
fn undo_five_stone_row_restores_initial_hash() {
    // S5: fill (7,0)..(7,4), undo five times, hash equals the initial one.
    let mut state = GameState::new(BoardSize::Fifteen, 1234);
    let hash0 = state.zobrist();
    for y in 0..5 {
        state.apply_move(Pos::new(7, y), Cell::Cross).expect("legal move");
    }
    assert_eq!(state.status(), GameStatus::Win(Cell::Cross));
    for _ in 0..5 {
        state.undo_move().expect("history present");
    }
    assert_eq!(state.zobrist(), hash0);
    assert_eq!(state.stone_count(), 0);
    assert_eq!(state.status(), GameStatus::InProgress);
}

#[test]
fn hash_is_independent_of_move_order() {
    // I3: the hash folds per-(side, cell) keys, so permutations agree.
    let mut a = GameState::new(BoardSize::Nineteen, 5);
    let mut b = GameState::new(BoardSize::Nineteen, 5);

    a.apply_move(Pos::new(3, 3), Cell::Cross).expect("legal");
    a.apply_move(Pos::new(4, 4), Cell::Naught).expect("legal");
    a.apply_move(Pos::new(5, 5), Cell::Cross).expect("legal");

    b.apply_move(Pos::new(5, 5), Cell::Cross).expect("legal");
    b.apply_move(Pos::new(3, 3), Cell::Cross).expect("legal");
    b.apply_move(Pos::new(4, 4), Cell::Naught).expect("legal");

    assert_eq!(a.zobrist(), b.zobrist());
}

#[test]
fn different_seeds_give_different_schedules() {
    let mut a = GameState::new(BoardSize::Nineteen, 1);
    let mut b = GameState::new(BoardSize::Nineteen, 2);
    a.apply_move(Pos::new(9, 9), Cell::Cross).expect("legal");
    b.apply_move(Pos::new(9, 9), Cell::Cross).expect("legal");
    assert_ne!(a.zobrist(), b.zobrist());
}

#[test]
fn illegal_moves_are_rejected_and_leave_state_unchanged() {
    let mut state = GameState::new(BoardSize::Fifteen, 0);
    state.apply_move(Pos::new(7, 7), Cell::Cross).expect("legal");
    let hash = state.zobrist();

    // Occupied.
    assert_eq!(
        state.apply_move(Pos::new(7, 7), Cell::Naught),
        Err(EngineError::IllegalMove { pos: Pos::new(7, 7) })
    );
    // Off-board.
    assert!(matches!(
        state.apply_move(Pos::new(15, 0), Cell::Cross),
        Err(EngineError::IllegalMove { .. })
    ));
    assert!(matches!(
        state.apply_move(Pos::new(-1, 3), Cell::Cross),
        Err(EngineError::IllegalMove { .. })
    ));
    // Empty is not a side.
    assert!(matches!(
        state.apply_move(Pos::new(0, 0), Cell::Empty),
        Err(EngineError::IllegalMove { .. })
    ));

    assert_eq!(state.zobrist(), hash);
    assert_eq!(state.stone_count(), 1);
}

#[test]
fn undo_on_fresh_state_reports_nothing_to_undo() {
    let mut state = GameState::new(BoardSize::Nineteen, 0);
    assert_eq!(state.undo_move(), Err(EngineError::NothingToUndo));
}

#[test]
fn empty_board_candidates_are_the_central_region() {
    let state = GameState::new(BoardSize::Nineteen, 0);
    let candidates = state.enumerate_candidates();
    assert_eq!(candidates.len(), 25);
    for pos in candidates {
        assert!((7..=11).contains(&pos.x) && (7..=11).contains(&pos.y));
    }
}

#[test]
fn candidates_stay_near_stones_and_skip_occupied_cells() {
    let mut state = GameState::new(BoardSize::Nineteen, 0);
    state.apply_move(Pos::new(9, 9), Cell::Cross).expect("legal");
    state.apply_move(Pos::new(9, 10), Cell::Naught).expect("legal");

    let candidates = state.enumerate_candidates();
    assert!(!candidates.is_empty());
    for pos in &candidates {
        assert!(state.board().is_empty(*pos));
        let near = pos.chebyshev(Pos::new(9, 9)) <= 2 || pos.chebyshev(Pos::new(9, 10)) <= 2;
        assert!(near, "candidate ({}, {}) is far from every stone", pos.x, pos.y);
    }
}

#[test]
fn winner_cache_tracks_make_and_undo() {
    let mut state = GameState::new(BoardSize::Fifteen, 3);
    for y in 0..4 {
        state.apply_move(Pos::new(7, y), Cell::Cross).expect("legal");
    }
    assert!(!state.winner(Cell::Cross));
    state.apply_move(Pos::new(7, 4), Cell::Cross).expect("legal");
    assert!(state.winner(Cell::Cross));
    state.undo_move().expect("history present");
    assert!(!state.winner(Cell::Cross));
}

#[test]
fn clones_share_the_key_schedule_and_diverge_independently() {
    let mut original = GameState::new(BoardSize::Nineteen, 77);
    original.apply_move(Pos::new(9, 9), Cell::Cross).expect("legal");

    let mut clone = original.clone();
    clone.apply_move(Pos::new(9, 10), Cell::Naught).expect("legal");

    // The original is untouched by the clone's move.
    assert_eq!(original.stone_count(), 1);
    assert_eq!(clone.stone_count(), 2);

    // Same schedule: applying the same move to the original converges to
    // the clone's hash.
    original.apply_move(Pos::new(9, 10), Cell::Naught).expect("legal");
    assert_eq!(original.zobrist(), clone.zobrist());
}
