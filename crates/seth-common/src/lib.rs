//! Primitive value types shared across the seth crates: fixed-size hashes
//! and addresses, and the arbitrary-precision integer used for amounts,
//! difficulty, timestamps and chain ids.

use std::fmt;

pub use num_bigint::BigInt;
pub use num_traits::{Signed, Zero};

pub const HASH_LENGTH: usize = 32;
pub const ADDRESS_LENGTH: usize = 20;

/// A 32-byte hash. Used for block hashes, state roots, transaction hashes
/// and trie node hashes alike -- the domain never distinguishes them by
/// type, only by where they are stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    pub const fn zero() -> Self {
        Hash([0u8; HASH_LENGTH])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LENGTH]
    }

    /// Builds a hash from a byte slice of any length. Longer slices are
    /// cropped to their rightmost 32 bytes; shorter ones are left-padded
    /// with zero, matching `common.BytesToHash` in the original node.
    pub fn from_bytes(b: &[u8]) -> Self {
        let mut out = [0u8; HASH_LENGTH];
        let b = if b.len() > HASH_LENGTH {
            &b[b.len() - HASH_LENGTH..]
        } else {
            b
        };
        out[HASH_LENGTH - b.len()..].copy_from_slice(b);
        Hash(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH_LENGTH]> for Hash {
    fn from(b: [u8; HASH_LENGTH]) -> Self {
        Hash(b)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// A 20-byte account address, derived as the low 20 bytes of the
/// Keccak-256 hash of an uncompressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn zero() -> Self {
        Address([0u8; ADDRESS_LENGTH])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Same left-pad / right-crop convention as [`Hash::from_bytes`].
    pub fn from_bytes(b: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LENGTH];
        let b = if b.len() > ADDRESS_LENGTH {
            &b[b.len() - ADDRESS_LENGTH..]
        } else {
            b
        };
        out[ADDRESS_LENGTH - b.len()..].copy_from_slice(b);
        Address(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(b: [u8; ADDRESS_LENGTH]) -> Self {
        Address(b)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}
