//! Genesis block construction and installation, grounded on the three
//! named network presets the original node ships with.

use crate::errors::ChainError;
use crate::store::ChainStore;
use seth_common::{Address, BigInt, Hash};
use seth_kv::Batch;
use seth_types::{Block, Body, Header};

pub const TAG_MAINNET_GENESIS: &str = "mainnet";
pub const TAG_TESTNET_GENESIS: &str = "testnet";
pub const TAG_DEVELOPERNET_GENESIS: &str = "dev";

/// The parameters a genesis block is built from. Everything not listed
/// here (parent hash, state root, tx root, block number) is pinned by
/// definition: a genesis block always has a zero parent and number 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Genesis {
    pub chain_id: BigInt,
    pub nonce: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub difficulty: BigInt,
    pub mix_hash: Hash,
    pub coinbase: Address,
}

fn repeated_byte_extra(byte: u8, len: usize) -> Vec<u8> {
    vec![byte; len]
}

impl Genesis {
    pub fn default_genesis() -> Self {
        Genesis {
            chain_id: BigInt::from(1u32),
            nonce: 66,
            timestamp: 0,
            extra_data: hex::decode(
                "11bbe8db4e347b4e8c937c1c8370e4b5ed33adb3db69cbdb7a38e1e50b1b82fa",
            )
            .expect("valid hex literal"),
            difficulty: BigInt::from(17179869184u64),
            mix_hash: Hash::zero(),
            coinbase: Address::zero(),
        }
    }

    pub fn testnet_genesis() -> Self {
        Genesis {
            chain_id: BigInt::from(0u32),
            nonce: 66,
            timestamp: 0,
            extra_data: repeated_byte_extra(0x35, 32),
            difficulty: BigInt::from(1048576u64),
            mix_hash: Hash::zero(),
            coinbase: Address::zero(),
        }
    }

    pub fn developernet_genesis() -> Self {
        Genesis {
            chain_id: BigInt::from(-1),
            ..Self::testnet_genesis()
        }
    }

    pub fn by_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_MAINNET_GENESIS => Some(Self::default_genesis()),
            TAG_TESTNET_GENESIS => Some(Self::testnet_genesis()),
            TAG_DEVELOPERNET_GENESIS => Some(Self::developernet_genesis()),
            _ => None,
        }
    }

    /// Builds the genesis block these parameters describe. The state
    /// root is the canonical empty-trie root (no pre-funded accounts in
    /// this core) and the transactions root is the hash of an empty
    /// body, mirroring how an empty tx list hashes for any later block.
    pub fn to_block(&self) -> Result<Block, ChainError> {
        let body = Body::default();
        let tx_hash = seth_crypto::keccak256(&body.rlp_encode()?);
        let header = Header {
            parent_hash: Hash::zero(),
            coinbase: self.coinbase,
            root: seth_trie::empty_trie_root(),
            tx_hash,
            difficulty: self.difficulty.clone(),
            number: BigInt::from(0u32),
            time: BigInt::from(self.timestamp),
            extra: self.extra_data.clone(),
            mix_digest: self.mix_hash,
            nonce: self.nonce.to_be_bytes(),
        };
        Ok(Block::new(header, body, self.difficulty.clone()))
    }
}

/// The two outcomes of [`setup_genesis_block`]: either this is the first
/// time genesis has been installed, or block 0 was already canonical and
/// nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisOutcome {
    Installed,
    AlreadyPresent,
}

/// Installs `genesis` into `store` unless canonical block 0 already
/// exists, in which case the existing hash is returned unchanged. A
/// fresh install writes total difficulty, block, canonical mapping,
/// head pointer and chain config through a single atomic batch.
pub fn setup_genesis_block(
    store: &ChainStore,
    genesis: &Genesis,
) -> Result<(Hash, GenesisOutcome), ChainError> {
    if let Some(hash) = store.get_canonical_hash(0)? {
        tracing::debug!(%hash, "genesis already installed, skipping");
        return Ok((hash, GenesisOutcome::AlreadyPresent));
    }

    let block = genesis.to_block()?;
    let mut batch = store.new_batch();
    let hash = store.write_block(batch.as_mut(), &block)?;
    store.write_td(batch.as_mut(), hash, 0, &block.total_difficulty)?;
    store.write_canonical_hash(batch.as_mut(), hash, 0)?;
    store.write_head_block_hash(batch.as_mut(), hash)?;
    store.write_chain_config(batch.as_mut(), hash, &genesis.chain_id.to_string().into_bytes())?;
    batch.commit()?;
    tracing::debug!(%hash, chain_id = %genesis.chain_id, "installed genesis block");

    Ok((hash, GenesisOutcome::Installed))
}
