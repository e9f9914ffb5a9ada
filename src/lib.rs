//! `vision-pow-consensus`: the proof-of-work consensus core extracted
//! from the VisionX node — compact-target codec, difficulty retargeting
//! (legacy and LWMA-3), the permitted-transition guard, PoW hash engine
//! dispatch, and header verification.
//!
//! Block storage, chain index traversal, networking, mempool, wallet,
//! RPC, and mining are explicitly out of scope; see [`consensus_pow`]
//! module docs for the collaborator contracts (chain index, hash
//! primitives) a host node is expected to supply.

pub mod consensus_pow;

pub use consensus_pow::{
    calculate_next_work_required, check_proof_of_work, compute_pow_hash, decode, encode,
    lwma3_next_work_required, mul_div, next_work_required_legacy, permitted_difficulty_transition,
    AncestorSource, ChainIndexEntry, CompactTarget, ConsensusError, ConsensusParams,
    CustomHashPrimitive, DecodedTarget, Header, PowAlgo, PowCache, PowPrimitiveError,
    TransitionPolicy, VecChainIndex, YespowerParams, YespowerPrimitive, U256,
};
