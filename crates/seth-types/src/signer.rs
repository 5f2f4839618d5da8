//! EIP-155-style transaction signing and sender recovery.
//!
//! Internally a raw signature carries `v ∈ {0,1}` (see [`seth_crypto::ecdsa`]);
//! this layer is the only place that embeds or strips the chain id via the
//! `V = v + 35 + 2*chainID` convention, so the two conventions never need to
//! agree anywhere else in the workspace.

use crate::errors::TypesError;
use crate::transaction::Transaction;
use seth_common::{Address, BigInt, Hash};
use seth_rlp::Encodable;
use seth_crypto::{address_from_uncompressed_pubkey, keccak256, recover_public_key, sign, Signature};

const MAGIC_NUMBER_FOR_V: u64 = 35;

/// A signer bound to one chain id, per the EIP-155 replay-protection scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SethSigner {
    chain_id: BigInt,
    chain_id_mul: BigInt,
}

impl SethSigner {
    pub fn new(chain_id: BigInt) -> Self {
        let chain_id_mul = &chain_id * BigInt::from(2u32);
        SethSigner {
            chain_id,
            chain_id_mul,
        }
    }

    pub fn chain_id(&self) -> &BigInt {
        &self.chain_id
    }

    /// `rlp([AccountNonce, To, Amount, chainID])` -- the hash actually
    /// signed, distinct from [`Transaction::hash`]'s chain-id-independent
    /// identity hash.
    pub fn hash(&self, tx: &Transaction) -> Result<Hash, TypesError> {
        let to_item = match &tx.to {
            Some(addr) => addr.rlp_encode(),
            None => seth_rlp::encode_bytes(&[]),
        };
        let items = vec![
            tx.account_nonce.rlp_encode(),
            to_item,
            seth_rlp::encode_bigint(&tx.amount)?,
            seth_rlp::encode_bigint(&self.chain_id)?,
        ];
        Ok(keccak256(&seth_rlp::encode_list_items(&items)))
    }

    /// Embeds the chain id into `v`, producing the signature's canonical
    /// on-the-wire `V` field (`v + 35 + chainIDMul` for a non-zero chain id,
    /// `v` unchanged otherwise).
    pub fn signature_values(&self, sig: &Signature) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&sig.r);
        out[32..64].copy_from_slice(&sig.s);
        out[64] = if self.chain_id.sign() != num_bigint::Sign::NoSign {
            let v = BigInt::from(sig.v as u64 + MAGIC_NUMBER_FOR_V) + &self.chain_id_mul;
            v.to_u64_digit() as u8
        } else {
            sig.v
        };
        out
    }

    /// Signs `tx` under this chain id, embedding the result into
    /// `tx.signature`.
    pub fn sign(&self, tx: &mut Transaction, secret_key: &[u8; 32]) -> Result<(), TypesError> {
        let digest = self.hash(tx)?;
        let sig = sign(&digest, secret_key)?;
        tx.signature = Some(self.signature_values(&sig));
        Ok(())
    }

    /// Recovers and validates the sender, memoizing the result on `tx`.
    pub fn sender(&self, tx: &Transaction) -> Result<Address, TypesError> {
        if let Some(cached) = tx.cached_sender() {
            return Ok(cached);
        }
        if Self::tx_chain_id(tx)? != self.chain_id {
            return Err(TypesError::InvalidChainID);
        }
        let raw = tx.signature.ok_or(TypesError::InvalidSignature)?;
        let (r, s, v_wire) = split_signature(&raw);

        let v_lo = if self.chain_id.sign() != num_bigint::Sign::NoSign {
            let v_big = BigInt::from(v_wire) - &self.chain_id_mul - MAGIC_NUMBER_FOR_V;
            if v_big.sign() == num_bigint::Sign::Minus {
                return Err(TypesError::InvalidSignature);
            }
            v_big.to_u64_digit()
        } else {
            v_wire
        };
        if v_lo > 1 {
            return Err(TypesError::InvalidSignature);
        }

        let sig = Signature {
            r,
            s,
            v: v_lo as u8,
        };
        sig.validate_scalars()
            .map_err(|_| TypesError::InvalidSignature)?;

        let digest = self.hash(tx)?;
        let pubkey = recover_public_key(&digest, &sig)?;
        let address = address_from_uncompressed_pubkey(&pubkey)?;
        tx.set_cached_sender(address);
        Ok(address)
    }

    /// Recovers the chain id embedded in `tx`'s signature's `V` field, i.e.
    /// `(V - 35) / 2`. A raw, un-embedded `V ∈ {0,1}` (the zero-chain-id
    /// convention; see `signature_values`) has no chain id embedded at all
    /// and is reported as `0` rather than run through that arithmetic.
    pub fn tx_chain_id(tx: &Transaction) -> Result<BigInt, TypesError> {
        let raw = tx.signature.ok_or(TypesError::InvalidSignature)?;
        let v = raw[64] as u64;
        if v <= 1 {
            return Ok(BigInt::from(0u32));
        }
        Ok((BigInt::from(v) - MAGIC_NUMBER_FOR_V) / BigInt::from(2u32))
    }
}

fn split_signature(raw: &[u8; 65]) -> ([u8; 32], [u8; 32], u64) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&raw[..32]);
    s.copy_from_slice(&raw[32..64]);
    (r, s, raw[64] as u64)
}

trait ToU64Digit {
    fn to_u64_digit(&self) -> u64;
}

impl ToU64Digit for BigInt {
    fn to_u64_digit(&self) -> u64 {
        use num_traits::ToPrimitive;
        self.to_u64().unwrap_or(0)
    }
}
