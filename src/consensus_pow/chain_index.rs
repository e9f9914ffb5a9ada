//! Chain index collaborator contract.
//!
//! The core never owns or mutates chain history; it only reads it
//! through this trait, which models the ancestor-skip-list lookup the
//! reference node keeps as a linked list with skip pointers. Production
//! implementations are free to back this with a skip-list, a vector
//! indexed by height, or a database cursor — the contract only demands
//! `O(log n)` or better and immutable snapshots.

use crate::consensus_pow::error::ConsensusError;

/// A read-only view of one historical block, exposing exactly what the
/// PoW core needs and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChainIndexEntry {
    pub height: i32,
    pub time: u32,
    pub bits: u32,
}

/// Ancestor lookup capability, injected rather than owned.
pub trait AncestorSource {
    /// The entry this lookup is rooted at: the chain tip under
    /// consideration.
    fn tip(&self) -> ChainIndexEntry;

    /// The entry at `height`, for `0 <= height <= self.tip().height`.
    /// Returns `None` if no such entry exists (height out of range, or
    /// a gap in a partial test fixture) — callers turn a `None` where
    /// an entry is expected to exist into a
    /// [`crate::consensus_pow::error::ConsensusError::MissingAncestor`].
    fn ancestor(&self, height: i32) -> Option<ChainIndexEntry>;
}

/// A simple, in-memory `AncestorSource` indexed by height, used by tests
/// and by any caller whose chain comfortably fits in memory. Real block
/// indexes should implement `AncestorSource` directly over their own
/// storage rather than copying into this type.
#[derive(Debug, Clone)]
pub struct VecChainIndex {
    entries: Vec<ChainIndexEntry>,
}

impl VecChainIndex {
    /// `entries` must be non-empty, sorted by height ascending, and
    /// contiguous starting at height 0 (genesis); this mirrors how a
    /// real block index is built incrementally.
    pub fn new(entries: Vec<ChainIndexEntry>) -> Result<Self, ConsensusError> {
        if entries.is_empty() {
            return Err(ConsensusError::EmptyChainIndex);
        }
        debug_assert!(
            entries.windows(2).all(|w| w[1].height == w[0].height + 1),
            "VecChainIndex requires contiguous heights"
        );
        debug_assert!(
            entries.first().map(|e| e.height) == Some(0),
            "VecChainIndex must start at height 0"
        );
        Ok(Self { entries })
    }
}

impl AncestorSource for VecChainIndex {
    fn tip(&self) -> ChainIndexEntry {
        // `new` rejects empty `entries`, so indexing the last element
        // can't panic.
        self.entries[self.entries.len() - 1]
    }

    fn ancestor(&self, height: i32) -> Option<ChainIndexEntry> {
        if height < 0 {
            return None;
        }
        self.entries.get(height as usize).copied()
    }
}
