//! Keccak-256 hashing. This is the legacy Keccak padding used by Ethereum
//! and its descendants, not the later NIST SHA3-256, hence pulling in the
//! `sha3` crate's `Keccak256` type rather than `Sha3_256`.

use seth_common::Hash;
use sha3::{Digest, Keccak256};

/// One-shot hash of a single buffer.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let out = hasher.finalize();
    Hash::from_bytes(&out)
}

/// Hashes the concatenation of several buffers without copying them into
/// one contiguous allocation first.
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for p in parts {
        hasher.update(p);
    }
    let out = hasher.finalize();
    Hash::from_bytes(&out)
}

/// Incremental hasher for callers that build up input piecemeal.
pub struct KeccakHasher(Keccak256);

impl Default for KeccakHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeccakHasher {
    pub fn new() -> Self {
        KeccakHasher(Keccak256::new())
    }

    pub fn write(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub fn finish(self) -> Hash {
        let out = self.0.finalize();
        Hash::from_bytes(&out)
    }
}
