//! secp256k1 ECDSA signing, recovery and scalar-range validation.
//!
//! Internally a signature's recovery id (`v`) is always 0 or 1, the raw
//! value secp256k1 produces. The EIP-155 style embedding of chain id into
//! `v` (`v + 35 + 2*chainId`) is a concern of the transaction signer, not
//! of this module -- see `seth-types`.

use crate::errors::CryptoError;
use crate::keccak::keccak256;
use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use seth_common::{Address, Hash};

/// The order of the secp256k1 curve's base point group.
pub const SECP256K1_N: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// `SECP256K1_N / 2`, the upper bound enforced on `s` to rule out the
/// trivial signature malleability where `(r, s, v)` and `(r, N-s, 1-v)`
/// both verify for the same message.
pub const SECP256K1_HALF_N: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

const SECP256K1_ZERO: [u8; 32] = [0u8; 32];

/// A recoverable secp256k1 ECDSA signature: `r`, `s`, and a raw recovery
/// id in `{0, 1}`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    pub fn from_bytes(b: &[u8; 65]) -> Result<Self, CryptoError> {
        let v = b[64];
        if v > 1 {
            return Err(CryptoError::InvalidRecoveryId(v));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&b[..32]);
        s.copy_from_slice(&b[32..64]);
        Ok(Signature { r, s, v })
    }

    /// Validates that `r` lies in `[1, N)` and `s` lies in `[1, N/2]`,
    /// per the malleability bound this node enforces on every signature
    /// it accepts.
    pub fn validate_scalars(&self) -> Result<(), CryptoError> {
        if self.r == SECP256K1_ZERO || self.r >= SECP256K1_N {
            return Err(CryptoError::InvalidR);
        }
        if self.s == SECP256K1_ZERO || self.s > SECP256K1_HALF_N {
            return Err(CryptoError::InvalidS);
        }
        Ok(())
    }
}

/// Signs a 32-byte digest with a secp256k1 secret key, returning a
/// recoverable signature whose `v` is the raw `{0, 1}` recovery id.
pub fn sign(digest: &Hash, secret_key: &[u8; 32]) -> Result<Signature, CryptoError> {
    let secp = Secp256k1::signing_only();
    let sk = SecretKey::from_slice(secret_key).map_err(|_| CryptoError::InvalidSecretKey)?;
    let msg = Message::from_digest_slice(digest.as_bytes())?;
    let recoverable = secp.sign_ecdsa_recoverable(&msg, &sk);
    let (recid, bytes) = recoverable.serialize_compact();
    let v = recid.to_i32() as u8;
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    let sig = Signature { r, s, v };
    sig.validate_scalars()?;
    Ok(sig)
}

/// Recovers the uncompressed (0x04-prefixed, 65-byte) public key that
/// produced `sig` over `digest`.
pub fn recover_public_key(digest: &Hash, sig: &Signature) -> Result<[u8; 65], CryptoError> {
    sig.validate_scalars()?;
    let recid = RecoveryId::from_i32(sig.v as i32).map_err(|_| CryptoError::InvalidRecoveryId(sig.v))?;
    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&sig.r);
    compact[32..].copy_from_slice(&sig.s);
    let rsig = RecoverableSignature::from_compact(&compact, recid)?;
    let msg = Message::from_digest_slice(digest.as_bytes())?;
    let secp = Secp256k1::verification_only();
    let pubkey = secp.recover_ecdsa(&msg, &rsig)?;
    let uncompressed = pubkey.serialize_uncompressed();
    if uncompressed[0] != 0x04 {
        return Err(CryptoError::NotUncompressed);
    }
    Ok(uncompressed)
}

/// Derives an address from an uncompressed public key: the low 20 bytes
/// of the Keccak-256 hash of the 64-byte X||Y point (the leading `0x04`
/// tag byte is excluded from the hash).
pub fn address_from_uncompressed_pubkey(pubkey: &[u8; 65]) -> Result<Address, CryptoError> {
    if pubkey[0] != 0x04 {
        return Err(CryptoError::NotUncompressed);
    }
    let hash = keccak256(&pubkey[1..]);
    Ok(Address::from_bytes(&hash.as_bytes()[12..]))
}

/// Generates a fresh secp256k1 keypair, returning the secret key and the
/// corresponding uncompressed public key.
pub fn generate_keypair() -> ([u8; 32], [u8; 65]) {
    let secp = Secp256k1::new();
    let (sk, pk) = secp.generate_keypair(&mut OsRng);
    (sk.secret_bytes(), pk.serialize_uncompressed())
}

/// Derives the uncompressed public key for a given secret key.
pub fn public_key_from_secret(secret_key: &[u8; 32]) -> Result<[u8; 65], CryptoError> {
    let secp = Secp256k1::signing_only();
    let sk = SecretKey::from_slice(secret_key).map_err(|_| CryptoError::InvalidSecretKey)?;
    let pk = PublicKey::from_secret_key(&secp, &sk);
    Ok(pk.serialize_uncompressed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_recover_round_trips_to_the_same_public_key() {
        let (sk, pk) = generate_keypair();
        let digest = keccak256(b"hello seth");
        let sig = sign(&digest, &sk).unwrap();
        let recovered = recover_public_key(&digest, &sig).unwrap();
        assert_eq!(recovered, pk);
    }

    #[test]
    fn recovered_address_matches_keypair_address() {
        let (sk, pk) = generate_keypair();
        let expected = address_from_uncompressed_pubkey(&pk).unwrap();
        let digest = keccak256(b"some transaction payload");
        let sig = sign(&digest, &sk).unwrap();
        let recovered_pk = recover_public_key(&digest, &sig).unwrap();
        let recovered_addr = address_from_uncompressed_pubkey(&recovered_pk).unwrap();
        assert_eq!(recovered_addr, expected);
    }

    #[test]
    fn tampering_with_digest_breaks_recovery() {
        let (sk, pk) = generate_keypair();
        let digest = keccak256(b"original message");
        let sig = sign(&digest, &sk).unwrap();
        let other_digest = keccak256(b"tampered message");
        let recovered = recover_public_key(&other_digest, &sig).unwrap();
        assert_ne!(recovered, pk);
    }

    #[test]
    fn rejects_recovery_id_outside_zero_one() {
        let bytes = [1u8; 65];
        let mut b = bytes;
        b[64] = 4;
        assert!(matches!(
            Signature::from_bytes(&b),
            Err(CryptoError::InvalidRecoveryId(4))
        ));
    }

    #[test]
    fn rejects_zero_r_and_zero_s() {
        let mut sig = Signature {
            r: [0u8; 32],
            s: [1u8; 32],
            v: 0,
        };
        assert!(matches!(sig.validate_scalars(), Err(CryptoError::InvalidR)));
        sig.r = [1u8; 32];
        sig.s = [0u8; 32];
        assert!(matches!(sig.validate_scalars(), Err(CryptoError::InvalidS)));
    }

    #[test]
    fn rejects_s_above_half_order() {
        let sig = Signature {
            r: [1u8; 32],
            s: SECP256K1_N, // clearly above N/2
            v: 0,
        };
        assert!(matches!(sig.validate_scalars(), Err(CryptoError::InvalidS)));
    }

    #[test]
    fn accepts_s_exactly_at_half_order() {
        let sig = Signature {
            r: [1u8; 32],
            s: SECP256K1_HALF_N,
            v: 0,
        };
        assert!(sig.validate_scalars().is_ok());
    }
}
