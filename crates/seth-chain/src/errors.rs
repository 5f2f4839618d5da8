use seth_common::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain: genesis block not found in store")]
    NoGenesis,
    #[error("chain: block number {0} does not fit a be64 key")]
    NumberOutOfRange(String),
    #[error("chain: header references unknown block number for hash {0}")]
    MissingBlockNumber(Hash),
    #[error("chain: rlp codec error: {0}")]
    Codec(#[from] seth_rlp::RlpError),
    #[error("chain: types error: {0}")]
    Types(#[from] seth_types::TypesError),
    #[error("chain: store error: {0}")]
    Store(#[from] seth_kv::KvError),
}
