use crate::types::Pos;

pub const MAX_KILLER_MOVES: usize = 2;
pub const MAX_SEARCH_DEPTH: usize = 10;

/// Per-ply killer moves: the most recent moves that caused a cutoff at a
/// given remaining depth, consulted during ordering. Bounded to two per
/// ply; new entries push to the front and the oldest falls off.
#[derive(Debug, Clone, Default)]
pub struct KillerTable {
    slots: [[Option<Pos>; MAX_KILLER_MOVES]; MAX_SEARCH_DEPTH + 1],
}

impl KillerTable {
    pub fn store(&mut self, depth: u8, pos: Pos) {
        let Some(row) = self.slots.get_mut(depth as usize) else {
            return;
        };
        if row.contains(&Some(pos)) {
            return;
        }
        for i in (1..MAX_KILLER_MOVES).rev() {
            row[i] = row[i - 1];
        }
        row[0] = Some(pos);
    }

    #[inline]
    pub fn contains(&self, depth: u8, pos: Pos) -> bool {
        self.slots
            .get(depth as usize)
            .is_some_and(|row| row.contains(&Some(pos)))
    }

    pub fn clear(&mut self) {
        self.slots = [[None; MAX_KILLER_MOVES]; MAX_SEARCH_DEPTH + 1];
    }
}
