//! Per-header PoW cache.
//!
//! A lazy value computed on first access and frozen thereafter, keyed
//! on the header's `Sha2d` hash. If a header is shared across threads,
//! the cache is guarded by a single lock around the
//! `(init_flag, cached_block_hash, cached_pow_hash)` tuple with
//! check-then-set discipline, matching how the node guards other
//! shared mutable state with `parking_lot::Mutex` elsewhere.

use parking_lot::Mutex;
use tracing::error;

use crate::consensus_pow::error::PowPrimitiveError;
use crate::consensus_pow::hash_engines::{compute_pow_hash, PowAlgo};
use crate::consensus_pow::header::Header;

struct CacheState {
    block_hash: [u8; 32],
    pow_hash: [u8; 32],
}

/// Memoizes one header's PoW hash. Not generic over algorithm: a cache
/// instance is bound to whichever `PowAlgo` first populates it, and any
/// later access under a different algorithm — or a header whose
/// `Sha2d` hash has drifted out from under the cache — is a fatal
/// invariant violation, because a header is supposed to be immutable
/// once cached.
pub struct PowCache {
    state: Mutex<Option<CacheState>>,
}

impl PowCache {
    pub fn new() -> Self {
        PowCache {
            state: Mutex::new(None),
        }
    }

    /// Return the cached PoW hash for `header` under `algo`, computing
    /// and storing it on first access.
    ///
    /// # Panics
    ///
    /// Panics if a previously cached entry's block hash no longer
    /// matches `header`'s current `Sha2d` hash — this indicates the
    /// "immutable" header was mutated after caching, a fatal assertion
    /// (memory corruption / invariant violation), not a recoverable
    /// error.
    pub fn get_or_compute(
        &self,
        header: &Header,
        algo: &PowAlgo<'_>,
    ) -> Result<[u8; 32], PowPrimitiveError> {
        let block_hash = header.sha2d();
        let mut guard = self.state.lock();

        if let Some(existing) = guard.as_ref() {
            if existing.block_hash != block_hash {
                error!(
                    cached = hex::encode(existing.block_hash),
                    current = hex::encode(block_hash),
                    "PoW cache block hash drifted: header was mutated after caching"
                );
            }
            assert_eq!(
                existing.block_hash, block_hash,
                "PoW cache block hash drifted: header was mutated after caching"
            );
            return Ok(existing.pow_hash);
        }

        let pow_hash = compute_pow_hash(header, algo)?;
        *guard = Some(CacheState {
            block_hash,
            pow_hash,
        });
        Ok(pow_hash)
    }
}

impl Default for PowCache {
    fn default() -> Self {
        Self::new()
    }
}
