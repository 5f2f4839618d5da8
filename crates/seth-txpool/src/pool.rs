//! A deduplicating in-memory pending-transaction set. `validateTx` is
//! intentionally a stub that always accepts: per-sender nonce ordering,
//! signature verification on admission, and a bounded capacity with an
//! eviction policy are all left to a future extension.

use crate::errors::TxPoolError;
use parking_lot::RwLock;
use seth_common::Hash;
use seth_types::Transaction;
use std::collections::HashMap;

#[derive(Default)]
pub struct TxPool {
    pending: RwLock<HashMap<Hash, Transaction>>,
}

impl TxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores `None`. Rejects with [`TxPoolError::DuplicateTxHash`] if a
    /// transaction with the same identity hash is already pending.
    pub fn add_tx(&self, tx: Option<Transaction>) -> Result<(), TxPoolError> {
        let tx = match tx {
            Some(tx) => tx,
            None => return Ok(()),
        };
        let hash = tx.hash()?;

        let mut pending = self.pending.write();
        if pending.contains_key(&hash) {
            tracing::warn!(%hash, "rejecting duplicate transaction");
            return Err(TxPoolError::DuplicateTxHash(hash));
        }
        pending.insert(hash, tx);
        Ok(())
    }

    pub fn get(&self, hash: Hash) -> Option<Transaction> {
        self.pending.read().get(&hash).cloned()
    }

    pub fn contains(&self, hash: Hash) -> bool {
        self.pending.read().contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.pending.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.read().is_empty()
    }

    pub fn pending_hashes(&self) -> Vec<Hash> {
        self.pending.read().keys().copied().collect()
    }
}
