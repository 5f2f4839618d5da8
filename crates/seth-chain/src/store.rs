//! Header/body/total-difficulty/canonical-hash persistence over a plain
//! KV store. Every write here goes through a caller-supplied batch so a
//! caller can group several logical writes (e.g. genesis install) into
//! one atomic commit; reads tolerate missing keys by returning `None`.

use crate::errors::ChainError;
use crate::keys::{
    block_hash_key, block_number_u64, body_key, canonical_key, config_key, encode_block_number,
    header_key, td_key, HEAD_BLOCK_KEY,
};
use seth_common::{BigInt, Hash};
use seth_kv::{Batch, Database};
use seth_types::{Block, Body, Header};
use std::sync::Arc;

#[derive(Clone)]
pub struct ChainStore {
    db: Arc<dyn Database>,
}

impl ChainStore {
    pub fn new(db: Arc<dyn Database>) -> Self {
        ChainStore { db }
    }

    pub fn new_batch(&self) -> Box<dyn Batch> {
        self.db.new_batch()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Indexes `header` under its own hash, writing both the
    /// hash-to-number and number-to-header entries. Returns the header's
    /// hash for convenience.
    pub fn write_header(&self, batch: &mut dyn Batch, header: &Header) -> Result<Hash, ChainError> {
        let hash = header.hash()?;
        let number = block_number_u64(&header.number)?;
        let encoded = header.rlp_encode()?;

        batch.put(&block_hash_key(hash), &encode_block_number(number))?;
        batch.put(&header_key(number, hash), &encoded)?;
        Ok(hash)
    }

    pub fn write_body(
        &self,
        batch: &mut dyn Batch,
        hash: Hash,
        number: u64,
        body: &Body,
    ) -> Result<(), ChainError> {
        let encoded = body.rlp_encode()?;
        batch.put(&body_key(number, hash), &encoded)?;
        Ok(())
    }

    pub fn write_td(
        &self,
        batch: &mut dyn Batch,
        hash: Hash,
        number: u64,
        td: &BigInt,
    ) -> Result<(), ChainError> {
        let encoded = seth_rlp::encode_bigint(td)?;
        batch.put(&td_key(number, hash), &encoded)?;
        Ok(())
    }

    pub fn write_canonical_hash(
        &self,
        batch: &mut dyn Batch,
        hash: Hash,
        number: u64,
    ) -> Result<(), ChainError> {
        batch.put(&canonical_key(number), hash.as_bytes())?;
        Ok(())
    }

    pub fn write_head_block_hash(&self, batch: &mut dyn Batch, hash: Hash) -> Result<(), ChainError> {
        batch.put(HEAD_BLOCK_KEY, hash.as_bytes())?;
        Ok(())
    }

    pub fn write_chain_config(
        &self,
        batch: &mut dyn Batch,
        hash: Hash,
        config_bytes: &[u8],
    ) -> Result<(), ChainError> {
        batch.put(&config_key(hash), config_bytes)?;
        Ok(())
    }

    /// Writes a block's header and body as one logical unit (mirrors the
    /// original `WriteBlock`, which does not also write td/canonical/head
    /// -- those are separate logical operations composed by the caller).
    pub fn write_block(&self, batch: &mut dyn Batch, block: &Block) -> Result<Hash, ChainError> {
        let hash = block.hash()?;
        let number = block_number_u64(&block.header.number)?;
        self.write_body(batch, hash, number, &block.body)?;
        self.write_header(batch, &block.header)?;
        Ok(hash)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn get_canonical_hash(&self, number: u64) -> Result<Option<Hash>, ChainError> {
        let data = self.db.get(&canonical_key(number))?;
        Ok(data.map(|b| Hash::from_bytes(&b)))
    }

    pub fn get_block_number(&self, hash: Hash) -> Result<Option<u64>, ChainError> {
        let data = self.db.get(&block_hash_key(hash))?;
        Ok(data.map(|b| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&b);
            u64::from_be_bytes(buf)
        }))
    }

    pub fn get_header(&self, hash: Hash, number: u64) -> Result<Option<Header>, ChainError> {
        match self.db.get(&header_key(number, hash))? {
            Some(data) => Ok(Some(Header::rlp_decode(&data)?)),
            None => Ok(None),
        }
    }

    pub fn get_body(&self, hash: Hash, number: u64) -> Result<Option<Body>, ChainError> {
        match self.db.get(&body_key(number, hash))? {
            Some(data) => Ok(Some(Body::rlp_decode(&data)?)),
            None => Ok(None),
        }
    }

    pub fn get_td(&self, hash: Hash, number: u64) -> Result<Option<BigInt>, ChainError> {
        match self.db.get(&td_key(number, hash))? {
            Some(data) => Ok(Some(seth_rlp::decode_bigint(&data)?)),
            None => Ok(None),
        }
    }

    pub fn get_head_block_hash(&self) -> Result<Option<Hash>, ChainError> {
        let data = self.db.get(HEAD_BLOCK_KEY)?;
        Ok(data.map(|b| Hash::from_bytes(&b)))
    }

    /// Reconstructs a full block (header + body + total difficulty) from
    /// the store. Returns `None` if any of the three pieces is absent.
    pub fn get_block(&self, hash: Hash, number: u64) -> Result<Option<Block>, ChainError> {
        let header = match self.get_header(hash, number)? {
            Some(h) => h,
            None => return Ok(None),
        };
        let body = match self.get_body(hash, number)? {
            Some(b) => b,
            None => return Ok(None),
        };
        let td = match self.get_td(hash, number)? {
            Some(td) => td,
            None => return Ok(None),
        };
        Ok(Some(Block::new(header, body, td)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seth_common::Address;
    use seth_kv::MemoryDatabase;
    use seth_types::SethSigner;

    fn sample_header(number: u32) -> Header {
        Header {
            parent_hash: Hash::zero(),
            coinbase: Address::zero(),
            root: Hash::zero(),
            tx_hash: Hash::zero(),
            difficulty: BigInt::from(1048576u64),
            number: BigInt::from(number),
            time: BigInt::from(1700000000u64),
            extra: vec![],
            mix_digest: Hash::zero(),
            nonce: [0u8; 8],
        }
    }

    #[test]
    fn header_and_body_round_trip_through_the_store() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let store = ChainStore::new(db);
        let header = sample_header(0);
        let body = Body::default();

        let mut batch = store.new_batch();
        let hash = store.write_header(batch.as_mut(), &header).unwrap();
        store.write_body(batch.as_mut(), hash, 0, &body).unwrap();
        batch.commit().unwrap();

        let loaded_header = store.get_header(hash, 0).unwrap().unwrap();
        assert_eq!(loaded_header.hash().unwrap(), hash);
        let loaded_body = store.get_body(hash, 0).unwrap().unwrap();
        assert!(loaded_body.transactions.is_empty());
        assert_eq!(store.get_block_number(hash).unwrap(), Some(0));
    }

    #[test]
    fn missing_keys_are_reported_as_absence() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let store = ChainStore::new(db);
        assert!(store.get_canonical_hash(0).unwrap().is_none());
        assert!(store
            .get_header(Hash::from_bytes(&[1u8; 32]), 0)
            .unwrap()
            .is_none());
        assert!(store.get_head_block_hash().unwrap().is_none());
    }

    #[test]
    fn get_block_assembles_header_body_and_td() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let store = ChainStore::new(db);
        let header = sample_header(1);
        let tx = seth_types::Transaction::new(Address::from([5u8; 20]), BigInt::from(1u32), 0);
        let signer = SethSigner::new(BigInt::from(1u32));
        let (secret, _pub) = seth_crypto::generate_keypair();
        let mut tx = tx;
        signer.sign(&mut tx, &secret).unwrap();
        let body = Body {
            transactions: vec![tx],
        };
        let td = BigInt::from(2097152u64);

        let mut batch = store.new_batch();
        let hash = store.write_header(batch.as_mut(), &header).unwrap();
        store.write_body(batch.as_mut(), hash, 1, &body).unwrap();
        store.write_td(batch.as_mut(), hash, 1, &td).unwrap();
        batch.commit().unwrap();

        let block = store.get_block(hash, 1).unwrap().unwrap();
        assert_eq!(block.total_difficulty, td);
        assert_eq!(block.body.transactions.len(), 1);
    }
}
