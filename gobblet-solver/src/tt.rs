//! Transposition table keyed by Zobrist hash.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use gobblet_core::Move;

/// How a stored value relates to the true minimax value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The value is exact.
    Exact,
    /// The true value is at least the stored value (the node failed high).
    Lower,
    /// The true value is at most the stored value (the node failed low).
    Upper,
}

impl Bound {
    /// Classify a fail-soft search result against the window it was
    /// searched with.
    pub fn classify(value: i32, alpha: i32, beta: i32) -> Bound {
        if value <= alpha {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub value: i32,
    /// Remaining depth the value was searched to.
    pub depth: u32,
    pub bound: Bound,
    /// Best move found; `None` for leaves.
    pub best_move: Option<Move>,
}

/// Hash -> best known search result. Unbounded; its searcher empties it at
/// the start of each root search.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value and move usable for a search of `depth` with window
    /// (`alpha`, `beta`), if any.
    ///
    /// The entry must have been searched to exactly `depth`: a value from a
    /// deeper search has a different horizon and win bias, so it is only
    /// good for ordering (see [`TranspositionTable::best_move`]). Its bound
    /// must also settle the node: exact values always do, lower bounds only
    /// at or above `beta`, upper bounds only at or below `alpha`.
    pub fn lookup(&self, hash: u64, depth: u32, alpha: i32, beta: i32) -> Option<(i32, Option<Move>)> {
        let entry = self.entries.get(&hash)?;
        if entry.depth != depth {
            return None;
        }
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.value >= beta,
            Bound::Upper => entry.value <= alpha,
        };
        usable.then_some((entry.value, entry.best_move))
    }

    /// Record a result. An existing entry is only replaced by a strictly
    /// deeper one.
    pub fn store(&mut self, hash: u64, value: i32, depth: u32, bound: Bound, best_move: Option<Move>) {
        let entry = TtEntry {
            value,
            depth,
            bound,
            best_move,
        };
        match self.entries.entry(hash) {
            Entry::Occupied(mut slot) => {
                if depth > slot.get().depth {
                    slot.insert(entry);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    /// Stored best move regardless of depth, for move ordering.
    pub fn best_move(&self, hash: u64) -> Option<Move> {
        self.entries.get(&hash).and_then(|e| e.best_move)
    }

    pub fn get(&self, hash: u64) -> Option<&TtEntry> {
        self.entries.get(&hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
