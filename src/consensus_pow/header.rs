//! Block header data model and its bit-exact serialization.

use sha2::{Digest, Sha256};

use crate::consensus_pow::compact::CompactTarget;

/// An immutable 80-byte block header. Field order and widths are
/// consensus-critical — see [`Header::serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: i32,
    pub prev_hash: [u8; 32],
    pub merkle_root: [u8; 32],
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl Header {
    pub fn bits(&self) -> CompactTarget {
        CompactTarget(self.bits)
    }

    /// Serialize to 80 bytes: `version`(4 LE) ‖ `prev_hash`(32)
    /// ‖ `merkle_root`(32) ‖ `time`(4 LE) ‖ `bits`(4 LE) ‖ `nonce`(4 LE).
    pub fn serialize(&self) -> [u8; 80] {
        let mut out = [0u8; 80];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_hash);
        out[36..68].copy_from_slice(&self.merkle_root);
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// `GetHash`: SHA-256(SHA-256(header)). Used for block identity and
    /// as the PoW cache key — distinct from the PoW hash itself.
    pub fn sha2d(&self) -> [u8; 32] {
        let bytes = self.serialize();
        let once: [u8; 32] = Sha256::digest(bytes).into();
        Sha256::digest(once).into()
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Header(hash={}, ver=0x{:08x}, prev={}, merkle_root={}, time={}, bits={:#010x}, nonce={})",
            hex::encode(self.sha2d()),
            self.version,
            hex::encode(self.prev_hash),
            hex::encode(self.merkle_root),
            self.time,
            self.bits,
            self.nonce,
        )
    }
}
