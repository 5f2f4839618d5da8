//! The byte-key schema the chain store indexes blocks under, grounded on
//! the original node's `headerPrefix`/`bodyPrefix`/... scheme. A single
//! byte per prefix keeps data kinds apart inside one shared KV namespace
//! without mixing in a reserved `i` byte the original avoids for its own
//! internal-iterator convention.

use crate::errors::ChainError;
use num_traits::ToPrimitive;
use seth_common::{BigInt, Hash};

pub const HEADER_PREFIX: &[u8] = b"h";
pub const BODY_PREFIX: &[u8] = b"b";
pub const TD_SUFFIX: &[u8] = b"t";
pub const NUM_SUFFIX: &[u8] = b"n";
pub const BLOCK_HASH_PREFIX: &[u8] = b"H";
pub const HEAD_BLOCK_KEY: &[u8] = b"LastBlock";
pub const CONFIG_PREFIX: &[u8] = b"seth-config-";

/// Converts a header's arbitrary-precision block number into the 8-byte
/// big-endian form every key in this schema is built from.
pub fn block_number_u64(n: &BigInt) -> Result<u64, ChainError> {
    n.to_u64()
        .ok_or_else(|| ChainError::NumberOutOfRange(n.to_string()))
}

pub fn encode_block_number(number: u64) -> [u8; 8] {
    number.to_be_bytes()
}

fn header_prefix_with_number(number: u64) -> Vec<u8> {
    let mut k = Vec::with_capacity(HEADER_PREFIX.len() + 8);
    k.extend_from_slice(HEADER_PREFIX);
    k.extend_from_slice(&encode_block_number(number));
    k
}

/// `h‖be64(n)‖hash`
pub fn header_key(number: u64, hash: Hash) -> Vec<u8> {
    let mut k = header_prefix_with_number(number);
    k.extend_from_slice(hash.as_bytes());
    k
}

/// `b‖be64(n)‖hash`
pub fn body_key(number: u64, hash: Hash) -> Vec<u8> {
    let mut k = Vec::with_capacity(BODY_PREFIX.len() + 8 + 32);
    k.extend_from_slice(BODY_PREFIX);
    k.extend_from_slice(&encode_block_number(number));
    k.extend_from_slice(hash.as_bytes());
    k
}

/// `h‖be64(n)‖hash‖t`
pub fn td_key(number: u64, hash: Hash) -> Vec<u8> {
    let mut k = header_key(number, hash);
    k.extend_from_slice(TD_SUFFIX);
    k
}

/// `h‖be64(n)‖n`
pub fn canonical_key(number: u64) -> Vec<u8> {
    let mut k = header_prefix_with_number(number);
    k.extend_from_slice(NUM_SUFFIX);
    k
}

/// `H‖hash`
pub fn block_hash_key(hash: Hash) -> Vec<u8> {
    let mut k = Vec::with_capacity(BLOCK_HASH_PREFIX.len() + 32);
    k.extend_from_slice(BLOCK_HASH_PREFIX);
    k.extend_from_slice(hash.as_bytes());
    k
}

/// `seth-config-‖hash`
pub fn config_key(hash: Hash) -> Vec<u8> {
    let mut k = Vec::with_capacity(CONFIG_PREFIX.len() + 32);
    k.extend_from_slice(CONFIG_PREFIX);
    k.extend_from_slice(hash.as_bytes());
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_and_header_keys_share_the_same_number_prefix_but_differ() {
        let ck = canonical_key(7);
        let hk = header_key(7, Hash::from_bytes(&[9u8; 32]));
        assert_ne!(ck, hk);
        assert!(hk.starts_with(&header_prefix_with_number(7)));
    }

    #[test]
    fn td_key_extends_the_header_key_with_the_suffix() {
        let hash = Hash::from_bytes(&[1u8; 32]);
        let td = td_key(3, hash);
        let header = header_key(3, hash);
        assert_eq!(&td[..header.len()], &header[..]);
        assert_eq!(&td[header.len()..], TD_SUFFIX);
    }

    #[test]
    fn block_number_u64_rejects_values_that_do_not_fit() {
        let huge = BigInt::from(u64::MAX) + BigInt::from(1u32);
        assert!(block_number_u64(&huge).is_err());
        assert_eq!(block_number_u64(&BigInt::from(42u32)).unwrap(), 42);
    }
}
