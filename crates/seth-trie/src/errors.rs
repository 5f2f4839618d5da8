use seth_common::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrieError {
    #[error("trie: node {0} referenced but not present in the store")]
    NodeNotFound(Hash),
    #[error("trie: node encoding has an unexpected item count {0}")]
    UnexpectedNodeShape(usize),
    #[error("trie: rlp codec error: {0}")]
    Codec(#[from] seth_rlp::RlpError),
    #[error("trie: store error: {0}")]
    Store(#[from] seth_kv::KvError),
}
