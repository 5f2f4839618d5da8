//! An in-memory [`Database`] implementation. Useful for tests and for
//! ephemeral nodes; a production deployment swaps this for a disk-backed
//! engine (see [`crate::tuning`] for the knobs such an engine needs)
//! without the trie, state DB or chain store noticing.

use crate::errors::KvError;
use crate::ports::{Batch, Database};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl Database for MemoryDatabase {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.inner.read().get(key).cloned())
    }

    fn new_batch(&self) -> Box<dyn Batch> {
        Box::new(MemoryBatch {
            store: self.inner.clone(),
            ops: Vec::new(),
            size: 0,
            closed: false,
        })
    }
}

enum Op {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

pub struct MemoryBatch {
    store: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
    ops: Vec<Op>,
    size: usize,
    closed: bool,
}

impl Batch for MemoryBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::BatchClosed);
        }
        self.size += key.len() + value.len();
        self.ops.push(Op::Put(key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::BatchClosed);
        }
        self.size += key.len();
        self.ops.push(Op::Delete(key.to_vec()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::BatchClosed);
        }
        let mut guard = self.store.write();
        for op in self.ops.drain(..) {
            match op {
                Op::Put(k, v) => {
                    guard.insert(k, v);
                }
                Op::Delete(k) => {
                    guard.remove(&k);
                }
            }
        }
        self.closed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::BatchClosed);
        }
        self.ops.clear();
        self.closed = true;
        Ok(())
    }

    fn value_size(&self) -> usize {
        self.size
    }
}
