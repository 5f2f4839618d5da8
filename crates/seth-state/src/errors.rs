use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state: rlp codec error: {0}")]
    Codec(#[from] seth_rlp::RlpError),
    #[error("state: trie error: {0}")]
    Trie(#[from] seth_trie::TrieError),
    #[error("state: store error: {0}")]
    Store(#[from] seth_kv::KvError),
}
