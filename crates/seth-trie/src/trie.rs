use crate::errors::TrieError;
use crate::nibbles::{common_prefix_len, Nibbles};
use crate::node::{
    decode_node, empty_child_item, empty_children, empty_trie_root, encode_branch,
    encode_extension, encode_leaf, Node, BRANCH_WIDTH,
};
use seth_common::Hash;
use seth_crypto::keccak256;
use seth_kv::{Batch, Database};
use std::sync::Arc;

/// A radix-16 authenticated map over nibble keys, content-addressed in a
/// [`Database`] under a per-trie key prefix.
pub struct Trie {
    db: Arc<dyn Database>,
    prefix: Vec<u8>,
    root: Node,
}

impl Trie {
    /// A brand-new, empty trie.
    pub fn new(db: Arc<dyn Database>, prefix: &[u8]) -> Self {
        Trie {
            db,
            prefix: prefix.to_vec(),
            root: Node::Empty,
        }
    }

    /// Reopens a trie at a previously committed root.
    pub fn new_at_root(db: Arc<dyn Database>, prefix: &[u8], root: Hash) -> Self {
        let root_node = if root.is_zero() || root == empty_trie_root() {
            Node::Empty
        } else {
            Node::HashRef(root)
        };
        Trie {
            db,
            prefix: prefix.to_vec(),
            root: root_node,
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrieError> {
        let nibbles = Nibbles::from_bytes(key);
        self.get_node(&self.root, &nibbles.0)
    }

    pub fn update(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), TrieError> {
        let nibbles = Nibbles::from_bytes(key);
        let root = std::mem::replace(&mut self.root, Node::Empty);
        self.root = self.insert_node(root, &nibbles.0, value)?;
        Ok(())
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<bool, TrieError> {
        let nibbles = Nibbles::from_bytes(key);
        let root = std::mem::replace(&mut self.root, Node::Empty);
        let (new_root, deleted) = self.delete_node(root, &nibbles.0)?;
        self.root = new_root;
        Ok(deleted)
    }

    /// Recomputes the root hash of every dirty subtree without writing
    /// anything to the store. Nodes touched this way stay unpersisted --
    /// a later `commit` still writes them (see `hash_node`).
    pub fn hash(&mut self) -> Result<Hash, TrieError> {
        let root = std::mem::replace(&mut self.root, Node::Empty);
        let (h, new_root) = self.hash_node(root, None)?;
        self.root = new_root;
        Ok(h)
    }

    /// Recomputes the root hash, writing every not-yet-persisted node's
    /// canonical encoding into `batch` under `prefix || hash`.
    pub fn commit(&mut self, batch: &mut dyn Batch) -> Result<Hash, TrieError> {
        let root = std::mem::replace(&mut self.root, Node::Empty);
        let (h, new_root) = self.hash_node(root, Some(batch))?;
        self.root = new_root;
        Ok(h)
    }

    fn storage_key(&self, h: &Hash) -> Vec<u8> {
        let mut key = self.prefix.clone();
        key.extend_from_slice(h.as_bytes());
        key
    }

    fn load_node(&self, h: &Hash) -> Result<Node, TrieError> {
        if h.is_zero() || *h == empty_trie_root() {
            return Ok(Node::Empty);
        }
        let key = self.storage_key(h);
        let data = self
            .db
            .get(&key)?
            .ok_or(TrieError::NodeNotFound(*h))?;
        decode_node(&data, *h)
    }

    fn get_node(&self, node: &Node, path: &[u8]) -> Result<Option<Vec<u8>>, TrieError> {
        match node {
            Node::Empty => Ok(None),
            Node::Leaf { key, value, .. } => {
                if key.0 == path {
                    Ok(Some(value.clone()))
                } else {
                    Ok(None)
                }
            }
            Node::Extension { key, next, .. } => {
                if path.len() >= key.0.len() && path[..key.0.len()] == key.0[..] {
                    self.get_node(next, &path[key.0.len()..])
                } else {
                    Ok(None)
                }
            }
            Node::Branch { children, .. } => {
                if path.is_empty() {
                    return Ok(None);
                }
                self.get_node(&children[path[0] as usize], &path[1..])
            }
            Node::HashRef(h) => {
                let loaded = self.load_node(h)?;
                self.get_node(&loaded, path)
            }
        }
    }

    fn insert_node(&self, node: Node, path: &[u8], value: Vec<u8>) -> Result<Node, TrieError> {
        match node {
            Node::Empty => Ok(Node::Leaf {
                key: Nibbles(path.to_vec()),
                value,
                dirty: true,
                hash: None,
                committed: false,
            }),

            Node::Leaf {
                key: old_key,
                value: old_value,
                ..
            } => {
                let m = common_prefix_len(&old_key.0, path);
                if m == old_key.0.len() && m == path.len() {
                    return Ok(Node::Leaf {
                        key: old_key,
                        value,
                        dirty: true,
                        hash: None,
                        committed: false,
                    });
                }
                let mut children = empty_children();
                let old_idx = old_key.0[m] as usize;
                let old_rest = old_key.0[m + 1..].to_vec();
                children[old_idx] = Node::Leaf {
                    key: Nibbles(old_rest),
                    value: old_value,
                    dirty: true,
                    hash: None,
                    committed: false,
                };
                let new_idx = path[m] as usize;
                children[new_idx] = self.insert_node(Node::Empty, &path[m + 1..], value)?;
                let branch = Node::Branch {
                    children: Box::new(children),
                    dirty: true,
                    hash: None,
                    committed: false,
                };
                if m > 0 {
                    Ok(Node::Extension {
                        key: Nibbles(path[..m].to_vec()),
                        next: Box::new(branch),
                        dirty: true,
                        hash: None,
                        committed: false,
                    })
                } else {
                    Ok(branch)
                }
            }

            Node::Extension {
                key: ext_key,
                next,
                ..
            } => {
                let m = common_prefix_len(&ext_key.0, path);
                if m == ext_key.0.len() {
                    let new_next = self.insert_node(*next, &path[m..], value)?;
                    return Ok(Node::Extension {
                        key: ext_key,
                        next: Box::new(new_next),
                        dirty: true,
                        hash: None,
                        committed: false,
                    });
                }
                let mut children = empty_children();
                let old_idx = ext_key.0[m] as usize;
                let old_rest = ext_key.0[m + 1..].to_vec();
                children[old_idx] = if old_rest.is_empty() {
                    *next
                } else {
                    Node::Extension {
                        key: Nibbles(old_rest),
                        next,
                        dirty: true,
                        hash: None,
                        committed: false,
                    }
                };
                let new_idx = path[m] as usize;
                children[new_idx] = self.insert_node(Node::Empty, &path[m + 1..], value)?;
                let branch = Node::Branch {
                    children: Box::new(children),
                    dirty: true,
                    hash: None,
                    committed: false,
                };
                if m > 0 {
                    Ok(Node::Extension {
                        key: Nibbles(path[..m].to_vec()),
                        next: Box::new(branch),
                        dirty: true,
                        hash: None,
                        committed: false,
                    })
                } else {
                    Ok(branch)
                }
            }

            Node::Branch { mut children, .. } => {
                let idx = path[0] as usize;
                let child = std::mem::replace(&mut children[idx], Node::Empty);
                children[idx] = self.insert_node(child, &path[1..], value)?;
                Ok(Node::Branch {
                    children,
                    dirty: true,
                    hash: None,
                    committed: false,
                })
            }

            Node::HashRef(h) => {
                let loaded = self.load_node(&h)?;
                self.insert_node(loaded, path, value)
            }
        }
    }

    fn delete_node(&self, node: Node, path: &[u8]) -> Result<(Node, bool), TrieError> {
        match node {
            Node::Empty => Ok((Node::Empty, false)),

            Node::Leaf {
                key, value, dirty, hash, committed,
            } => {
                if key.0 == path {
                    Ok((Node::Empty, true))
                } else {
                    Ok((
                        Node::Leaf {
                            key,
                            value,
                            dirty,
                            hash,
                            committed,
                        },
                        false,
                    ))
                }
            }

            Node::Extension {
                key, next, dirty, hash, committed,
            } => {
                if path.len() >= key.0.len() && path[..key.0.len()] == key.0[..] {
                    let (new_next, deleted) = self.delete_node(*next, &path[key.0.len()..])?;
                    if !deleted {
                        return Ok((
                            Node::Extension {
                                key,
                                next: Box::new(new_next),
                                dirty,
                                hash,
                                committed,
                            },
                            false,
                        ));
                    }
                    let collapsed = match new_next {
                        Node::Empty => Node::Empty,
                        Node::Leaf {
                            key: nk, value: nv, ..
                        } => {
                            let mut combined = key.0.clone();
                            combined.extend_from_slice(&nk.0);
                            Node::Leaf {
                                key: Nibbles(combined),
                                value: nv,
                                dirty: true,
                                hash: None,
                                committed: false,
                            }
                        }
                        Node::Extension {
                            key: nk, next: nn, ..
                        } => {
                            let mut combined = key.0.clone();
                            combined.extend_from_slice(&nk.0);
                            Node::Extension {
                                key: Nibbles(combined),
                                next: nn,
                                dirty: true,
                                hash: None,
                                committed: false,
                            }
                        }
                        branch @ Node::Branch { .. } => Node::Extension {
                            key,
                            next: Box::new(branch),
                            dirty: true,
                            hash: None,
                            committed: false,
                        },
                        Node::HashRef(_) => unreachable!("delete never returns an unresolved ref"),
                    };
                    Ok((collapsed, true))
                } else {
                    Ok((
                        Node::Extension {
                            key,
                            next,
                            dirty,
                            hash,
                            committed,
                        },
                        false,
                    ))
                }
            }

            Node::Branch {
                mut children, dirty, hash, committed,
            } => {
                if path.is_empty() {
                    return Ok((
                        Node::Branch {
                            children,
                            dirty,
                            hash,
                            committed,
                        },
                        false,
                    ));
                }
                let idx = path[0] as usize;
                let child = std::mem::replace(&mut children[idx], Node::Empty);
                let (new_child, deleted) = self.delete_node(child, &path[1..])?;
                children[idx] = new_child;
                if !deleted {
                    return Ok((
                        Node::Branch {
                            children,
                            dirty,
                            hash,
                            committed,
                        },
                        false,
                    ));
                }

                let nonempty: Vec<usize> = children
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_empty())
                    .map(|(i, _)| i)
                    .collect();

                if nonempty.len() > 1 {
                    return Ok((
                        Node::Branch {
                            children,
                            dirty: true,
                            hash: None,
                            committed: false,
                        },
                        true,
                    ));
                }
                if nonempty.is_empty() {
                    return Ok((Node::Empty, true));
                }

                let p = nonempty[0];
                let only = std::mem::replace(&mut children[p], Node::Empty);
                let only = self.resolve(only)?;
                let collapsed = match only {
                    Node::Leaf { key, value, .. } => {
                        let mut nk = vec![p as u8];
                        nk.extend_from_slice(&key.0);
                        Node::Leaf {
                            key: Nibbles(nk),
                            value,
                            dirty: true,
                            hash: None,
                            committed: false,
                        }
                    }
                    Node::Extension { key, next, .. } => {
                        let mut nk = vec![p as u8];
                        nk.extend_from_slice(&key.0);
                        Node::Extension {
                            key: Nibbles(nk),
                            next,
                            dirty: true,
                            hash: None,
                            committed: false,
                        }
                    }
                    branch @ Node::Branch { .. } => Node::Extension {
                        key: Nibbles(vec![p as u8]),
                        next: Box::new(branch),
                        dirty: true,
                        hash: None,
                        committed: false,
                    },
                    Node::Empty | Node::HashRef(_) => unreachable!("resolve() settles these"),
                };
                Ok((collapsed, true))
            }

            Node::HashRef(h) => {
                let loaded = self.load_node(&h)?;
                self.delete_node(loaded, path)
            }
        }
    }

    /// Materializes a node if it is an unresolved reference, leaving any
    /// other shape untouched.
    fn resolve(&self, node: Node) -> Result<Node, TrieError> {
        match node {
            Node::HashRef(h) => self.load_node(&h),
            other => Ok(other),
        }
    }

    /// Recomputes (or reuses) each node's hash and, only when `batch` is
    /// present, writes its encoding to the store.
    ///
    /// `dirty` and `committed` track two independent things: `dirty`
    /// means the cached hash is stale and must be recomputed; `committed`
    /// means the node's encoding has actually been written to the store.
    /// A node hashed via `Trie::hash` ends up `dirty: false, committed:
    /// false` -- its hash is fresh but nothing was persisted. Gating the
    /// write (and the short-circuit) on `committed` rather than `dirty`
    /// is what lets a later `Trie::commit` still flush it.
    fn hash_node(
        &self,
        node: Node,
        mut batch: Option<&mut dyn Batch>,
    ) -> Result<(Hash, Node), TrieError> {
        match node {
            Node::Empty => Ok((empty_trie_root(), Node::Empty)),
            Node::HashRef(h) => Ok((h, Node::HashRef(h))),

            Node::Leaf {
                key, value, dirty, hash, committed,
            } => {
                if committed {
                    let h = hash.expect("a committed leaf carries its hash");
                    return Ok((
                        h,
                        Node::Leaf {
                            key,
                            value,
                            dirty: false,
                            hash: Some(h),
                            committed: true,
                        },
                    ));
                }
                let encoded = encode_leaf(&key, &value);
                let h = if dirty {
                    keccak256(&encoded)
                } else {
                    hash.expect("a clean leaf carries its cached hash")
                };
                let now_committed = match batch.as_deref_mut() {
                    Some(b) => {
                        b.put(&self.storage_key(&h), &encoded)?;
                        true
                    }
                    None => false,
                };
                Ok((
                    h,
                    Node::Leaf {
                        key,
                        value,
                        dirty: false,
                        hash: Some(h),
                        committed: now_committed,
                    },
                ))
            }

            Node::Extension {
                key, next, dirty, hash, committed,
            } => {
                if committed {
                    let h = hash.expect("a committed extension carries its hash");
                    return Ok((
                        h,
                        Node::Extension {
                            key,
                            next,
                            dirty: false,
                            hash: Some(h),
                            committed: true,
                        },
                    ));
                }
                // `next` may still be uncommitted even if this node's own
                // hash is fresh, so recurse unconditionally.
                let (next_hash, new_next) = self.hash_node(*next, batch.as_deref_mut())?;
                let encoded = encode_extension(&key, &next_hash);
                let h = if dirty {
                    keccak256(&encoded)
                } else {
                    hash.expect("a clean extension carries its cached hash")
                };
                let now_committed = match batch.as_deref_mut() {
                    Some(b) => {
                        b.put(&self.storage_key(&h), &encoded)?;
                        true
                    }
                    None => false,
                };
                Ok((
                    h,
                    Node::Extension {
                        key,
                        next: Box::new(new_next),
                        dirty: false,
                        hash: Some(h),
                        committed: now_committed,
                    },
                ))
            }

            Node::Branch {
                children, dirty, hash, committed,
            } => {
                if committed {
                    let h = hash.expect("a committed branch carries its hash");
                    return Ok((
                        h,
                        Node::Branch {
                            children,
                            dirty: false,
                            hash: Some(h),
                            committed: true,
                        },
                    ));
                }
                let arr: [Node; BRANCH_WIDTH] = *children;
                let mut new_children: Vec<Node> = Vec::with_capacity(BRANCH_WIDTH);
                let mut encoded_children: Vec<Vec<u8>> = Vec::with_capacity(BRANCH_WIDTH);
                for child in arr {
                    match child {
                        Node::Empty => {
                            encoded_children.push(empty_child_item());
                            new_children.push(Node::Empty);
                        }
                        other => {
                            let (child_hash, new_child) =
                                self.hash_node(other, batch.as_deref_mut())?;
                            encoded_children.push(seth_rlp::encode_bytes(child_hash.as_bytes()));
                            new_children.push(new_child);
                        }
                    }
                }
                let encoded = encode_branch(&encoded_children);
                let h = if dirty {
                    keccak256(&encoded)
                } else {
                    hash.expect("a clean branch carries its cached hash")
                };
                let now_committed = match batch.as_deref_mut() {
                    Some(b) => {
                        b.put(&self.storage_key(&h), &encoded)?;
                        true
                    }
                    None => false,
                };
                let children_array: [Node; BRANCH_WIDTH] = match new_children.try_into() {
                    Ok(arr) => arr,
                    Err(_) => unreachable!("exactly BRANCH_WIDTH children were pushed"),
                };
                Ok((
                    h,
                    Node::Branch {
                        children: Box::new(children_array),
                        dirty: false,
                        hash: Some(h),
                        committed: now_committed,
                    },
                ))
            }
        }
    }
}
