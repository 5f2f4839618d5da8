use crate::body::Body;
use crate::errors::TypesError;
use crate::header::Header;
use crate::transaction::Transaction;
use seth_common::{BigInt, Hash};
use std::sync::OnceLock;

/// A header paired with its transaction list, plus the cumulative
/// proof-of-work total the chain store indexes it under.
#[derive(Debug)]
pub struct Block {
    pub header: Header,
    pub body: Body,
    pub total_difficulty: BigInt,
    hash: OnceLock<Hash>,
}

impl Clone for Block {
    fn clone(&self) -> Self {
        let hash = OnceLock::new();
        if let Some(h) = self.hash.get() {
            let _ = hash.set(*h);
        }
        Block {
            header: self.header.clone(),
            body: self.body.clone(),
            total_difficulty: self.total_difficulty.clone(),
            hash,
        }
    }
}

impl Block {
    pub fn new(header: Header, body: Body, total_difficulty: BigInt) -> Self {
        Block {
            header,
            body,
            total_difficulty,
            hash: OnceLock::new(),
        }
    }

    /// The keccak256 hash of the header's RLP encoding, computed once and
    /// shared by every subsequent caller.
    pub fn hash(&self) -> Result<Hash, TypesError> {
        if let Some(h) = self.hash.get() {
            return Ok(*h);
        }
        let h = self.header.hash()?;
        let _ = self.hash.set(h);
        Ok(*self.hash.get().unwrap())
    }

    pub fn number(&self) -> &BigInt {
        &self.header.number
    }

    pub fn find_transaction(&self, hash: Hash) -> Option<&Transaction> {
        self.body
            .transactions
            .iter()
            .find(|tx| tx.hash().ok() == Some(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seth_common::Address;

    fn sample_header() -> Header {
        Header {
            parent_hash: Hash::zero(),
            coinbase: Address::zero(),
            root: Hash::zero(),
            tx_hash: Hash::zero(),
            difficulty: BigInt::from(1048576u64),
            number: BigInt::from(0u32),
            time: BigInt::from(1700000000u64),
            extra: vec![],
            mix_digest: Hash::zero(),
            nonce: [0u8; 8],
        }
    }

    #[test]
    fn block_hash_matches_header_hash_and_is_stable() {
        let block = Block::new(sample_header(), Body::default(), BigInt::from(1048576u64));
        let h1 = block.hash().unwrap();
        let h2 = block.hash().unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1, sample_header().hash().unwrap());
    }

    #[test]
    fn find_transaction_locates_a_member_by_hash() {
        let tx = Transaction::new(Address::from([4u8; 20]), BigInt::from(1u32), 0);
        let tx_hash = tx.hash().unwrap();
        let body = Body {
            transactions: vec![tx],
        };
        let block = Block::new(sample_header(), body, BigInt::from(0u32));
        assert!(block.find_transaction(tx_hash).is_some());
        assert!(block.find_transaction(Hash::from_bytes(&[9u8; 32])).is_none());
    }
}
