//! Fixed-precision 256-bit unsigned arithmetic.
//!
//! Targets are non-negative integers in `[0, 2^256)`. We reuse
//! `primitive_types::U256` rather than hand-roll a bignum — it's the
//! same crate the rest of the PoW-chain ecosystem reaches for, it
//! already implements wrapping/checked/saturating arithmetic and
//! little/big-endian byte conversion, and unsigned integer division in
//! Rust (and in `U256`) truncates toward zero, which matches the
//! rounding the retarget algorithms rely on.

use crate::consensus_pow::error::ConsensusError;

pub use primitive_types::U256;

/// Multiply `value` by `num` and divide by `den`, each performed as a
/// single 256-bit operation rather than folded into one expression, so
/// call sites can match a specified order of operations term by term
/// (the legacy retarget clamps before multiplying; LWMA divides each
/// term before the final multiply to avoid overflow).
///
/// Consensus parameters are expected to leave enough headroom that this
/// never overflows in practice, but a misconfigured network parameter
/// is caller data, not a programmer error, so overflow is reported as
/// an error rather than a panic.
pub fn mul_div(value: U256, num: u64, den: u64) -> Result<U256, ConsensusError> {
    debug_assert!(den != 0, "division by zero in mul_div");
    let scaled = value
        .checked_mul(U256::from(num))
        .ok_or(ConsensusError::ArithmeticOverflow)?;
    Ok(scaled / U256::from(den))
}
