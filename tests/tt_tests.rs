use quintet::search::killers::{KillerTable, MAX_SEARCH_DEPTH};
use quintet::search::{Bound, FixedTt, MapTt, TranspositionTable, TtEntry, TT_CAPACITY};
use quintet::Pos;

fn entry(value: i32, depth: u8, flag: Bound, best: Option<Pos>) -> TtEntry {
    TtEntry {
        value,
        depth,
        flag,
        best,
    }
}

#[test]
fn default_capacity_meets_the_floor() {
    assert!(TT_CAPACITY >= 100_000);
    assert!(TT_CAPACITY.is_power_of_two());
    let tt = FixedTt::try_with_capacity_pow2(TT_CAPACITY).expect("allocation");
    assert!(tt.is_empty());
}

#[test]
fn exact_entries_are_always_usable() {
    let mut tt = FixedTt::try_with_capacity_pow2(1 << 10).expect("allocation");
    let key = 0xDEAD_BEEF_u64;
    tt.store(key, entry(42, 3, Bound::Exact, Some(Pos::new(1, 2))));

    assert_eq!(tt.probe(key, 3, -100, 100), Some(42));
    assert_eq!(tt.probe(key, 2, -100, 100), Some(42), "shallower probes are fine");
    assert_eq!(tt.probe(key, 4, -100, 100), None, "deeper probes are not");
    assert_eq!(tt.best_move(key), Some(Pos::new(1, 2)));
    assert_eq!(tt.probe(key ^ 1, 1, -100, 100), None, "key mismatch");
}

#[test]
fn bound_flags_gate_the_window() {
    // I4: a Lower entry is usable only when it proves a beta cutoff, an
    // Upper entry only when it proves an alpha cutoff.
    let mut tt = FixedTt::try_with_capacity_pow2(1 << 10).expect("allocation");

    let lower_key = 11u64;
    tt.store(lower_key, entry(500, 4, Bound::Lower, None));
    assert_eq!(tt.probe(lower_key, 4, 0, 400), Some(500), "value >= beta");
    assert_eq!(tt.probe(lower_key, 4, 0, 600), None, "value < beta");

    let upper_key = 12u64;
    tt.store(upper_key, entry(-500, 4, Bound::Upper, None));
    assert_eq!(tt.probe(upper_key, 4, -400, 0), Some(-500), "value <= alpha");
    assert_eq!(tt.probe(upper_key, 4, -600, 0), None, "value > alpha");
}

#[test]
fn replacement_is_depth_preferred() {
    let mut tt = FixedTt::try_with_capacity_pow2(1 << 10).expect("allocation");
    let key = 77u64;

    tt.store(key, entry(1, 5, Bound::Exact, None));
    // Shallower store must not displace the deeper entry.
    tt.store(key, entry(2, 3, Bound::Exact, None));
    assert_eq!(tt.probe(key, 3, -10, 10), Some(1));

    // Equal depth replaces.
    tt.store(key, entry(3, 5, Bound::Exact, None));
    assert_eq!(tt.probe(key, 5, -10, 10), Some(3));
}

#[test]
fn colliding_keys_keep_the_deeper_entry() {
    let cap = 1 << 10;
    let mut tt = FixedTt::try_with_capacity_pow2(cap).expect("allocation");
    let a = 5u64;
    let b = a + cap as u64; // same slot, different key

    tt.store(a, entry(10, 6, Bound::Exact, None));
    tt.store(b, entry(20, 2, Bound::Exact, None));
    assert_eq!(tt.probe(a, 1, -100, 100), Some(10), "shallow collider lost");
    assert_eq!(tt.probe(b, 1, -100, 100), None);

    tt.store(b, entry(30, 8, Bound::Exact, None));
    assert_eq!(tt.probe(b, 1, -100, 100), Some(30), "deeper collider won");
    assert_eq!(tt.probe(a, 1, -100, 100), None);
}

#[test]
fn clear_empties_the_table() {
    let mut tt = FixedTt::try_with_capacity_pow2(1 << 10).expect("allocation");
    tt.store(9, entry(1, 1, Bound::Exact, None));
    assert_eq!(tt.len(), 1);
    tt.clear();
    assert!(tt.is_empty());
    assert_eq!(tt.probe(9, 1, -10, 10), None);
}

#[test]
fn fixed_and_map_tables_agree() {
    // Parity across the two implementations for a scripted workload.
    let mut fixed = FixedTt::try_with_capacity_pow2(1 << 12).expect("allocation");
    let mut map = MapTt::default();

    let script = [
        (101u64, entry(5, 2, Bound::Exact, Some(Pos::new(3, 3)))),
        (202u64, entry(-7, 4, Bound::Lower, None)),
        (101u64, entry(9, 1, Bound::Exact, None)), // shallower, ignored
        (303u64, entry(0, 3, Bound::Upper, Some(Pos::new(5, 5)))),
        (202u64, entry(11, 4, Bound::Exact, None)), // equal depth, replaces
    ];
    for (key, e) in script {
        fixed.store(key, e);
        map.store(key, e);
    }

    for key in [101u64, 202, 303, 404] {
        for depth in 0..5u8 {
            assert_eq!(
                fixed.probe(key, depth, -100, 100),
                map.probe(key, depth, -100, 100),
                "probe mismatch for key {key} depth {depth}"
            );
        }
        assert_eq!(fixed.best_move(key), map.best_move(key));
    }
}

#[test]
fn killer_table_holds_two_recent_moves_per_depth() {
    let mut killers = KillerTable::default();
    let a = Pos::new(1, 1);
    let b = Pos::new(2, 2);
    let c = Pos::new(3, 3);

    killers.store(3, a);
    killers.store(3, b);
    assert!(killers.contains(3, a));
    assert!(killers.contains(3, b));
    assert!(!killers.contains(2, a), "killers are per-depth");

    // Third entry evicts the oldest.
    killers.store(3, c);
    assert!(killers.contains(3, c));
    assert!(killers.contains(3, b));
    assert!(!killers.contains(3, a));
}

#[test]
fn killer_table_ignores_duplicates_and_deep_plies() {
    let mut killers = KillerTable::default();
    let a = Pos::new(4, 4);
    killers.store(2, a);
    killers.store(2, a);
    let b = Pos::new(5, 5);
    killers.store(2, b);
    // The duplicate store must not have evicted `a`.
    assert!(killers.contains(2, a));
    assert!(killers.contains(2, b));

    // Depths beyond the table are ignored, not a panic.
    killers.store((MAX_SEARCH_DEPTH + 5) as u8, a);
    assert!(!killers.contains((MAX_SEARCH_DEPTH + 5) as u8, a));
}
