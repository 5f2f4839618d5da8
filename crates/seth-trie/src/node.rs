//! The four structural node kinds of the trie, represented as a single
//! tagged enum rather than a trait object -- walks become exhaustive
//! matches instead of virtual dispatch, which also documents every
//! structural transition insert/delete can take.
//!
//! Node/Leaf disambiguation on the wire uses an explicit boolean tag
//! rather than compact hex-prefix encoding: `Leaf -> rlp([key, value])`
//! (2 items), `Extension -> rlp([true, key, next_hash])` (3 items). This
//! keeps `loadNode`'s dispatch-by-item-count (2 / 3 / 17) exact, which a
//! hex-prefix-encoded key would not allow, since both Leaf and Extension
//! would collapse to 2-item lists indistinguishable by count alone.

use crate::errors::TrieError;
use crate::nibbles::Nibbles;
use seth_common::Hash;
use seth_crypto::keccak256;

pub const BRANCH_WIDTH: usize = 17;

#[derive(Clone, Debug)]
pub enum Node {
    /// No entry stored under this path.
    Empty,
    /// Remaining path and the value it maps to.
    Leaf {
        key: Nibbles,
        value: Vec<u8>,
        /// `true` once this node's hash is known to be stale and needs
        /// recomputing. Independent of `committed`: a node can have a
        /// perfectly fresh cached hash (computed by `Trie::hash`) and
        /// still not be persisted anywhere.
        dirty: bool,
        hash: Option<Hash>,
        /// `true` once this node's encoding has actually been written to
        /// the store by `Trie::commit`. `Trie::hash` never sets this.
        committed: bool,
    },
    /// A shared-prefix shortcut to a single child.
    Extension {
        key: Nibbles,
        next: Box<Node>,
        dirty: bool,
        hash: Option<Hash>,
        committed: bool,
    },
    /// A 17-way fork: children `0..=15` key on the next nibble, child
    /// `16` holds whatever terminates exactly at this depth.
    Branch {
        children: Box<[Node; BRANCH_WIDTH]>,
        dirty: bool,
        hash: Option<Hash>,
        committed: bool,
    },
    /// An unresolved reference into the store; materialized on demand by
    /// `Trie::load_node`.
    HashRef(Hash),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }
}

/// The root hash of a trie holding no entries: `keccak256(rlp(""))`.
pub fn empty_trie_root() -> Hash {
    keccak256(&seth_rlp::encode_bytes(&[]))
}

pub(crate) fn empty_children() -> [Node; BRANCH_WIDTH] {
    std::array::from_fn(|_| Node::Empty)
}

pub(crate) fn encode_leaf(key: &Nibbles, value: &[u8]) -> Vec<u8> {
    let items = vec![seth_rlp::encode_bytes(&key.0), seth_rlp::encode_bytes(value)];
    seth_rlp::encode_list_items(&items)
}

pub(crate) fn encode_extension(key: &Nibbles, next_hash: &Hash) -> Vec<u8> {
    let items = vec![
        seth_rlp::encode_bytes(&[1u8]),
        seth_rlp::encode_bytes(&key.0),
        seth_rlp::encode_bytes(next_hash.as_bytes()),
    ];
    seth_rlp::encode_list_items(&items)
}

pub(crate) fn encode_branch(children_encoded: &[Vec<u8>]) -> Vec<u8> {
    seth_rlp::encode_list_items(children_encoded)
}

pub(crate) fn empty_child_item() -> Vec<u8> {
    seth_rlp::empty_string_item()
}

/// Decodes a previously-stored node's canonical encoding. `known_hash` is
/// the hash this node was looked up by; it is stamped directly onto the
/// decoded node rather than recomputed, since recomputation would be
/// redundant work that must by construction agree with the lookup key.
pub(crate) fn decode_node(data: &[u8], known_hash: Hash) -> Result<Node, TrieError> {
    let items = seth_rlp::split_into_items(data)?;
    match items.len() {
        2 => {
            let key_bytes = seth_rlp::as_string(items[0])?;
            let value = seth_rlp::as_string(items[1])?;
            Ok(Node::Leaf {
                key: Nibbles(key_bytes.to_vec()),
                value: value.to_vec(),
                dirty: false,
                hash: Some(known_hash),
                committed: true,
            })
        }
        3 => {
            let key_bytes = seth_rlp::as_string(items[1])?;
            let next_bytes = seth_rlp::as_string(items[2])?;
            if next_bytes.len() != 32 {
                return Err(TrieError::UnexpectedNodeShape(3));
            }
            Ok(Node::Extension {
                key: Nibbles(key_bytes.to_vec()),
                next: Box::new(Node::HashRef(Hash::from_bytes(next_bytes))),
                dirty: false,
                hash: Some(known_hash),
                committed: true,
            })
        }
        BRANCH_WIDTH => {
            let mut children = empty_children();
            for (i, item) in items.iter().enumerate() {
                let bytes = seth_rlp::as_string(item)?;
                children[i] = if bytes.is_empty() {
                    Node::Empty
                } else {
                    Node::HashRef(Hash::from_bytes(bytes))
                };
            }
            Ok(Node::Branch {
                children: Box::new(children),
                dirty: false,
                hash: Some(known_hash),
                committed: true,
            })
        }
        n => Err(TrieError::UnexpectedNodeShape(n)),
    }
}
