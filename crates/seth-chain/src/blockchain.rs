//! The read-path façade over a [`ChainStore`]: canonical-number lookups,
//! an LRU cache of recently touched blocks, and the genesis-presence
//! check every chain head depends on.

use crate::errors::ChainError;
use crate::store::ChainStore;
use lru::LruCache;
use parking_lot::Mutex;
use seth_common::Hash;
use seth_types::Block;
use std::num::NonZeroUsize;
use std::sync::Arc;

const BLOCK_CACHE_LIMIT: usize = 256;

pub struct BlockChain {
    store: ChainStore,
    genesis_block: Arc<Block>,
    block_cache: Mutex<LruCache<Hash, Arc<Block>>>,
}

impl BlockChain {
    /// Loads canonical block 0 from `store`, failing with
    /// [`ChainError::NoGenesis`] if it is absent.
    pub fn new(store: ChainStore) -> Result<Self, ChainError> {
        let cache_cap = NonZeroUsize::new(BLOCK_CACHE_LIMIT).expect("cache limit is nonzero");
        let block_cache = Mutex::new(LruCache::new(cache_cap));
        let genesis_block = Self::load_by_number(&store, &block_cache, 0)?
            .ok_or(ChainError::NoGenesis)?;
        Ok(BlockChain {
            store,
            genesis_block,
            block_cache,
        })
    }

    pub fn genesis_block(&self) -> &Block {
        &self.genesis_block
    }

    pub fn get_block_by_number(&self, number: u64) -> Result<Option<Arc<Block>>, ChainError> {
        Self::load_by_number(&self.store, &self.block_cache, number)
    }

    pub fn get_block(&self, hash: Hash, number: u64) -> Result<Option<Arc<Block>>, ChainError> {
        Self::load(&self.store, &self.block_cache, hash, number)
    }

    fn load_by_number(
        store: &ChainStore,
        cache: &Mutex<LruCache<Hash, Arc<Block>>>,
        number: u64,
    ) -> Result<Option<Arc<Block>>, ChainError> {
        let hash = match store.get_canonical_hash(number)? {
            Some(h) => h,
            None => return Ok(None),
        };
        Self::load(store, cache, hash, number)
    }

    fn load(
        store: &ChainStore,
        cache: &Mutex<LruCache<Hash, Arc<Block>>>,
        hash: Hash,
        number: u64,
    ) -> Result<Option<Arc<Block>>, ChainError> {
        if let Some(block) = cache.lock().get(&hash) {
            return Ok(Some(block.clone()));
        }
        tracing::debug!(%hash, number, "block cache miss, reading from store");
        let block = match store.get_block(hash, number)? {
            Some(b) => Arc::new(b),
            None => return Ok(None),
        };
        cache.lock().put(hash, block.clone());
        Ok(Some(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::{setup_genesis_block, Genesis};
    use seth_common::{Address, BigInt};
    use seth_kv::{Batch, Database, MemoryDatabase};
    use seth_types::{Body, Header};

    fn store_with_genesis() -> (ChainStore, Hash) {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let store = ChainStore::new(db);
        let (hash, _) = setup_genesis_block(&store, &Genesis::default_genesis()).unwrap();
        (store, hash)
    }

    #[test]
    fn construction_fails_without_a_genesis_block() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let store = ChainStore::new(db);
        assert!(matches!(BlockChain::new(store), Err(ChainError::NoGenesis)));
    }

    #[test]
    fn genesis_is_reachable_by_number_and_hash() {
        let (store, hash) = store_with_genesis();
        let bc = BlockChain::new(store).unwrap();

        let by_number = bc.get_block_by_number(0).unwrap().unwrap();
        assert_eq!(by_number.hash().unwrap(), hash);

        let by_hash = bc.get_block(hash, 0).unwrap().unwrap();
        assert_eq!(by_hash.hash().unwrap(), hash);
        assert_eq!(bc.genesis_block().hash().unwrap(), hash);
    }

    #[test]
    fn lru_evicts_least_recently_used_once_past_capacity() {
        let (store, genesis_hash) = store_with_genesis();

        // Insert 299 additional synthetic blocks directly through the
        // store (bypassing full chain-validity rules, irrelevant here).
        let mut hashes = vec![genesis_hash];
        for i in 1..300u64 {
            let header = Header {
                parent_hash: hashes[(i - 1) as usize],
                coinbase: Address::zero(),
                root: Hash::zero(),
                tx_hash: Hash::zero(),
                difficulty: BigInt::from(1048576u64),
                number: BigInt::from(i),
                time: BigInt::from(1700000000u64 + i),
                extra: vec![],
                mix_digest: Hash::zero(),
                nonce: [0u8; 8],
            };
            let mut batch = store.new_batch();
            let hash = store.write_header(batch.as_mut(), &header).unwrap();
            store
                .write_body(batch.as_mut(), hash, i, &Body::default())
                .unwrap();
            store
                .write_td(batch.as_mut(), hash, i, &BigInt::from(1048576u64))
                .unwrap();
            store.write_canonical_hash(batch.as_mut(), hash, i).unwrap();
            batch.commit().unwrap();
            hashes.push(hash);
        }

        let bc = BlockChain::new(store).unwrap();
        for i in 0..300u64 {
            bc.get_block_by_number(i).unwrap().unwrap();
        }

        assert_eq!(bc.block_cache.lock().len(), 256);
        // The least-recently-touched 44 blocks (numbers 0..=43) were
        // evicted; the most recent 256 remain.
        for &evicted in &hashes[0..44] {
            assert!(!bc.block_cache.lock().contains(&evicted));
        }
        for &kept in &hashes[256..300] {
            assert!(bc.block_cache.lock().contains(&kept));
        }
    }
}
