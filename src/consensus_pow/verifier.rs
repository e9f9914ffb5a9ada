//! PoW verifier (§4.6). Ported from `CheckProofOfWork` in
//! `original_source/src/pow.cpp`.

use crate::consensus_pow::arith256::U256;
use crate::consensus_pow::compact::{self, CompactTarget};
use crate::consensus_pow::params::ConsensusParams;

/// `check_proof_of_work(hash, bits, params) -> bool`.
///
/// `hash` is interpreted as a little-endian 256-bit integer, matching
/// how a block hash (itself the output of a hash function with no
/// inherent byte order) is compared against a target in the reference
/// implementation's `arith_uint256` construction.
pub fn check_proof_of_work(hash: &[u8; 32], bits: CompactTarget, params: &ConsensusParams) -> bool {
    let decoded = compact::decode(bits);

    if decoded.negative || decoded.target.is_zero() || decoded.overflow {
        return false;
    }
    if decoded.target > params.pow_limit_target() {
        return false;
    }

    let hash_value = U256::from_little_endian(hash);
    hash_value <= decoded.target
}
