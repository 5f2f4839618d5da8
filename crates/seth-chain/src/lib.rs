mod blockchain;
mod errors;
mod genesis;
mod keys;
mod store;

pub use blockchain::BlockChain;
pub use errors::ChainError;
pub use genesis::{
    setup_genesis_block, Genesis, GenesisOutcome, TAG_DEVELOPERNET_GENESIS, TAG_MAINNET_GENESIS,
    TAG_TESTNET_GENESIS,
};
pub use keys::{
    block_hash_key, block_number_u64, body_key, canonical_key, config_key, encode_block_number,
    header_key, td_key, BLOCK_HASH_PREFIX, BODY_PREFIX, CONFIG_PREFIX, HEADER_PREFIX,
    HEAD_BLOCK_KEY, NUM_SUFFIX, TD_SUFFIX,
};
pub use store::ChainStore;
