//! Transposition table.
//!
//! Maps a canonical 64-bit state digest to a previously-visited tree node
//! plus the depth at which it was recorded, memoizing work when independent
//! move sequences converge to equivalent states. The table is rebuilt for
//! every top-level decision; entries never survive across `best_move` calls.

use crate::node::NodeId;
use std::collections::HashMap;

/// One memoized (state digest -> node) association.
#[derive(Clone, Copy, Debug)]
pub struct TranspositionEntry {
    /// The tree node the digest resolved to.
    pub node: NodeId,

    /// Search depth at which the entry was recorded.
    pub depth: usize,

    /// Score snapshot of the node at record time.
    pub score: f64,
}

impl TranspositionEntry {
    /// Whether this entry suffices for a walk with `remaining` depth budget.
    ///
    /// An entry recorded for a shallower remaining-search budget than the
    /// current walk still needs is insufficient and must not be reused.
    pub fn covers(&self, remaining: usize) -> bool {
        self.depth >= remaining
    }
}

/// Hash-keyed cache of transposition entries, one per digest.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TranspositionEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, hash: u64) -> Option<&TranspositionEntry> {
        self.entries.get(&hash)
    }

    /// Unconditional overwrite: newer stores win for the same digest.
    pub fn store(&mut self, hash: u64, entry: TranspositionEntry) {
        self.entries.insert(hash, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
