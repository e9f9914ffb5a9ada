//! Error types for the PoW consensus core.
//!
//! `ConsensusError` covers recoverable, data-dependent outcomes a caller is
//! expected to handle. `PowPrimitiveError` wraps failures from the injected
//! hash collaborators (yespower / Argon2id / the custom hash); per the
//! design, a primitive failing is fatal to consensus validity, so these
//! are propagated to the top of the call rather than swallowed locally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("chain index has no ancestor at height {0}")]
    MissingAncestor(i32),

    #[error("retarget boundary height {height} underflows interval {interval}")]
    NegativeFirstHeight { height: i32, interval: i64 },

    #[error("chain index has no entries")]
    EmptyChainIndex,

    #[error("target arithmetic overflowed 256 bits")]
    ArithmeticOverflow,

    #[error("hash primitive failed: {0}")]
    Primitive(#[from] PowPrimitiveError),
}

/// A hash primitive (yespower, Argon2id, the custom hash) failed to
/// produce a digest. This is fatal: it indicates resource exhaustion or
/// a broken collaborator, not a disagreement about chain data, and two
/// nodes observing it must not attempt to carry on with divergent
/// partial results.
#[derive(Debug, Error)]
pub enum PowPrimitiveError {
    #[error("yespower primitive failed (algorithm={algo}): {reason}")]
    Yespower { algo: &'static str, reason: String },

    #[error("argon2id primitive failed: {0}")]
    Argon2id(String),

    #[error("custom hash primitive failed: {0}")]
    Custom(String),
}
