use crate::errors::TypesError;
use seth_common::{Address, BigInt, Hash};
use seth_crypto::keccak256;
use seth_rlp::{Decodable, Encodable};
use std::sync::OnceLock;

/// A value transfer. `To == None` marks a contract-creation transaction;
/// execution itself is out of scope here.
///
/// The unsigned hash and the recovered sender are each published through a
/// `OnceLock`: concurrent readers race safely to compute them, and whichever
/// call wins is the value every reader subsequently observes.
#[derive(Debug)]
pub struct Transaction {
    pub to: Option<Address>,
    pub account_nonce: u64,
    pub amount: BigInt,
    pub signature: Option<[u8; 65]>,
    hash: OnceLock<Hash>,
    sender: OnceLock<Address>,
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        let hash = OnceLock::new();
        if let Some(h) = self.hash.get() {
            let _ = hash.set(*h);
        }
        let sender = OnceLock::new();
        if let Some(s) = self.sender.get() {
            let _ = sender.set(*s);
        }
        Transaction {
            to: self.to,
            account_nonce: self.account_nonce,
            amount: self.amount.clone(),
            signature: self.signature,
            hash,
            sender,
        }
    }
}

impl Transaction {
    pub fn new(to: Address, amount: BigInt, nonce: u64) -> Self {
        Transaction {
            to: Some(to),
            account_nonce: nonce,
            amount,
            signature: None,
            hash: OnceLock::new(),
            sender: OnceLock::new(),
        }
    }

    /// A contract-creation transaction (`To == None`). Reserved: execution
    /// of the created contract is out of scope for this workspace.
    pub fn new_contract_creation(amount: BigInt, nonce: u64) -> Self {
        Transaction {
            to: None,
            account_nonce: nonce,
            amount,
            signature: None,
            hash: OnceLock::new(),
            sender: OnceLock::new(),
        }
    }

    fn encode_to(&self) -> Vec<u8> {
        match &self.to {
            Some(addr) => addr.rlp_encode(),
            None => seth_rlp::encode_bytes(&[]),
        }
    }

    /// `rlp([AccountNonce, To, Amount])`, independent of chain id and of
    /// whether the transaction has been signed. Computed once and cached.
    pub fn hash(&self) -> Result<Hash, TypesError> {
        if let Some(h) = self.hash.get() {
            return Ok(*h);
        }
        let items = vec![
            self.account_nonce.rlp_encode(),
            self.encode_to(),
            seth_rlp::encode_bigint(&self.amount)?,
        ];
        let encoded = seth_rlp::encode_list_items(&items);
        let h = keccak256(&encoded);
        let _ = self.hash.set(h);
        Ok(*self.hash.get().unwrap())
    }

    pub(crate) fn cached_sender(&self) -> Option<Address> {
        self.sender.get().copied()
    }

    pub(crate) fn set_cached_sender(&self, address: Address) {
        let _ = self.sender.set(address);
    }

    /// Full on-disk encoding used by the chain store's block bodies:
    /// `rlp([AccountNonce, To, Amount, Signature])`. Distinct from
    /// [`Transaction::hash`], which only covers the first three fields.
    pub fn rlp_encode(&self) -> Result<Vec<u8>, TypesError> {
        let sig_item = match &self.signature {
            Some(sig) => seth_rlp::encode_bytes(sig),
            None => seth_rlp::encode_bytes(&[]),
        };
        let items = vec![
            self.account_nonce.rlp_encode(),
            self.encode_to(),
            seth_rlp::encode_bigint(&self.amount)?,
            sig_item,
        ];
        Ok(seth_rlp::encode_list_items(&items))
    }

    pub fn rlp_decode(data: &[u8]) -> Result<Self, TypesError> {
        let items = seth_rlp::split_into_items(data)?;
        if items.len() != 4 {
            return Err(TypesError::Codec(seth_rlp::RlpError::UnexpectedItemCount(
                items.len(),
            )));
        }
        let account_nonce = u64::rlp_decode(items[0])?;
        let to_bytes = seth_rlp::as_string(items[1])?;
        let to = if to_bytes.is_empty() {
            None
        } else {
            Some(Address::rlp_decode(items[1])?)
        };
        let amount = seth_rlp::decode_bigint(items[2])?;
        let sig_bytes = seth_rlp::as_string(items[3])?;
        let signature = if sig_bytes.is_empty() {
            None
        } else {
            let mut sig = [0u8; 65];
            if sig_bytes.len() != 65 {
                return Err(TypesError::InvalidSignature);
            }
            sig.copy_from_slice(sig_bytes);
            Some(sig)
        };
        Ok(Transaction {
            to,
            account_nonce,
            amount,
            signature,
            hash: OnceLock::new(),
            sender: OnceLock::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_across_repeated_calls() {
        let tx = Transaction::new(Address::zero(), BigInt::from(10u32), 0);
        let h1 = tx.hash().unwrap();
        let h2 = tx.hash().unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn cloning_preserves_a_memoized_hash() {
        let tx = Transaction::new(Address::zero(), BigInt::from(10u32), 0);
        let h1 = tx.hash().unwrap();
        let cloned = tx.clone();
        assert_eq!(cloned.hash().unwrap(), h1);
    }

    #[test]
    fn unsigned_transaction_round_trips_through_storage_encoding() {
        let tx = Transaction::new(Address::from([7u8; 20]), BigInt::from(42u32), 3);
        let encoded = tx.rlp_encode().unwrap();
        let decoded = Transaction::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded.to, tx.to);
        assert_eq!(decoded.account_nonce, tx.account_nonce);
        assert_eq!(decoded.amount, tx.amount);
        assert_eq!(decoded.signature, tx.signature);
    }

    #[test]
    fn contract_creation_transaction_round_trips_with_no_recipient() {
        let tx = Transaction::new_contract_creation(BigInt::from(0u32), 0);
        let encoded = tx.rlp_encode().unwrap();
        let decoded = Transaction::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded.to, None);
    }

    #[test]
    fn signed_transaction_preserves_its_signature_through_storage_encoding() {
        let mut tx = Transaction::new(Address::from([1u8; 20]), BigInt::from(5u32), 1);
        tx.signature = Some([9u8; 65]);
        let encoded = tx.rlp_encode().unwrap();
        let decoded = Transaction::rlp_decode(&encoded).unwrap();
        assert_eq!(decoded.signature, Some([9u8; 65]));
    }
}
