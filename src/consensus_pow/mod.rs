//! Proof-of-work consensus core: compact-target codec, legacy and LWMA-3
//! retargeting, the permitted-transition guard, PoW hash engines, and
//! verification. Stateless and reentrant (see module docs on each file
//! for the invariants that hold across calls).

pub mod arith256;
pub mod cache;
pub mod chain_index;
pub mod compact;
pub mod error;
pub mod hash_engines;
pub mod header;
pub mod params;
pub mod retarget_legacy;
pub mod retarget_lwma;
pub mod transition;
pub mod verifier;

pub use arith256::{mul_div, U256};
pub use cache::PowCache;
pub use chain_index::{AncestorSource, ChainIndexEntry, VecChainIndex};
pub use compact::{decode, encode, CompactTarget, DecodedTarget};
pub use error::{ConsensusError, PowPrimitiveError};
pub use hash_engines::{compute_pow_hash, CustomHashPrimitive, PowAlgo, YespowerParams, YespowerPrimitive};
pub use header::Header;
pub use params::{ConsensusParams, TransitionPolicy};
pub use retarget_legacy::{calculate_next_work_required, next_work_required_legacy};
pub use retarget_lwma::lwma3_next_work_required;
pub use transition::permitted_difficulty_transition;
pub use verifier::check_proof_of_work;
