//! Hashing and signing primitives: Keccak-256 and secp256k1 ECDSA with
//! public key recovery.
//!
//! Everything here operates on raw bytes and [`seth_common`] primitive
//! types. The notion of a transaction *signer* -- which ties a signature
//! to a chain id via the EIP-155 `v` encoding -- lives one layer up, in
//! `seth-types`, since it is a property of the transaction format rather
//! than of the underlying curve.

pub mod account;
pub mod ecdsa;
pub mod errors;
pub mod keccak;

pub use account::{new_account, NewAccount};
pub use ecdsa::{
    address_from_uncompressed_pubkey, generate_keypair, public_key_from_secret, recover_public_key,
    sign, Signature, SECP256K1_HALF_N, SECP256K1_N,
};
pub use errors::CryptoError;
pub use keccak::{keccak256, keccak256_concat, KeccakHasher};
