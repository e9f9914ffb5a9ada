//! Compact target codec ("nBits").
//!
//! A compact target packs a 256-bit value into 32 bits as a tiny
//! floating-point number: an 8-bit size (byte count of the mantissa's
//! significant digits, offset by 3) and a 24-bit mantissa, the top bit
//! of which is a sign flag. Ported from
//! `arith_uint256::SetCompact`/`GetCompact` in `original_source/src/pow.cpp`.

use crate::consensus_pow::arith256::U256;

/// A compact-encoded target as it appears in a block header's `bits`
/// field. Opaque newtype so callers can't accidentally treat it as an
/// expanded target without going through [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CompactTarget(pub u32);

impl CompactTarget {
    pub fn new(bits: u32) -> Self {
        CompactTarget(bits)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CompactTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Result of decoding a compact target: the expanded 256-bit value plus
/// the two flags consensus code must check before trusting it. A decode
/// never fails outright — invalid bit patterns are represented by the
/// flags, exactly mirroring `arith_uint256::SetCompact`'s out-parameters
/// in the reference implementation, since rejecting a malformed header
/// is the caller's job, not the codec's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTarget {
    pub target: U256,
    pub negative: bool,
    pub overflow: bool,
}

impl DecodedTarget {
    /// True iff the target is usable as a consensus threshold: not
    /// negative, not zero, not overflowed. Range-against-`pow_limit` is
    /// the verifier's job, not the codec's.
    pub fn is_well_formed(&self) -> bool {
        !self.negative && !self.overflow && !self.target.is_zero()
    }
}

/// Decode(bits) → (target, negative, overflow).
pub fn decode(bits: CompactTarget) -> DecodedTarget {
    let bits = bits.0;
    let size = bits >> 24;
    let word = bits & 0x007f_ffff;

    let target = if size <= 3 {
        let shift = 8 * (3 - size);
        U256::from(word >> shift)
    } else {
        let shift = 8 * (size - 3);
        // A shift of 256 or more is out of range for U256; such bit
        // patterns are already caught by the overflow check below, so
        // the exact value doesn't matter for consensus purposes — only
        // that it's never used as a valid threshold.
        if shift >= 256 {
            U256::zero()
        } else {
            U256::from(word) << shift
        }
    };

    let negative = word != 0 && (bits & 0x0080_0000) != 0;
    let overflow =
        word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    DecodedTarget {
        target,
        negative,
        overflow,
    }
}

/// Encode(target) → bits.
///
/// Round-trip law: `encode(decode(b).target) == b` only when `b` is
/// itself a canonical encoding produced by `encode` — arbitrary
/// compact values with redundant trailing zero bytes or a negative
/// sign bit do not round-trip, by design.
pub fn encode(target: U256) -> CompactTarget {
    if target.is_zero() {
        return CompactTarget(0);
    }

    // Number of bytes needed to hold `target`'s significant bits.
    let mut size = (target.bits() as u32).div_ceil(8);

    let mut compact: u32 = if size <= 3 {
        let shift = 8 * (3 - size);
        (target.low_u32()) << shift
    } else {
        let shift = 8 * (size - 3);
        (target >> shift).low_u32()
    };

    // If the mantissa's top bit would be mistaken for the sign bit,
    // shift one more byte into the size field and drop the low byte.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }

    CompactTarget((size << 24) | (compact & 0x007f_ffff))
}
