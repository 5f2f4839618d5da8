//! A radix-16 Merkle Patricia Trie over an arbitrary byte-keyed [`Database`](seth_kv::Database).
//!
//! This is the authenticated-map primitive the state DB and chain store are
//! built on: every read walks an in-memory view that is materialized lazily
//! from content-addressed nodes, and every write is staged until `commit`
//! folds the whole dirty subtree into a single batch.

mod errors;
mod nibbles;
mod node;
mod trie;

pub use errors::TrieError;
pub use nibbles::{common_prefix_len, Nibbles, TERMINATOR};
pub use node::{empty_trie_root, Node, BRANCH_WIDTH};
pub use trie::Trie;
