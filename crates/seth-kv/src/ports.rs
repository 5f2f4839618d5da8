//! The storage port this workspace's higher layers (trie, state DB, chain
//! store) are written against. Concurrent readers are always safe; a
//! batch is the only way to write, and a batch's writes become visible
//! all at once, or not at all.

use crate::errors::KvError;

/// A key/value store capable of point reads and atomic batched writes.
pub trait Database: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError>;

    fn has(&self, key: &[u8]) -> Result<bool, KvError> {
        Ok(self.get(key)?.is_some())
    }

    /// Starts a new batch of writes against this database. Nothing the
    /// batch records is visible to readers until [`Batch::commit`] is
    /// called.
    fn new_batch(&self) -> Box<dyn Batch>;

    /// Writes a single key through a one-entry batch.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        let mut batch = self.new_batch();
        batch.put(key, value)?;
        batch.commit()
    }

    /// Deletes a single key through a one-entry batch.
    fn delete(&self, key: &[u8]) -> Result<(), KvError> {
        let mut batch = self.new_batch();
        batch.delete(key)?;
        batch.commit()
    }
}

/// A sequence of puts and deletes applied to a [`Database`] as a single
/// atomic unit.
///
/// A batch is single-use: call [`Batch::commit`] or [`Batch::rollback`]
/// exactly once. Reusing a batch afterwards returns [`KvError::BatchClosed`].
pub trait Batch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), KvError>;

    /// Applies every recorded write atomically.
    fn commit(&mut self) -> Result<(), KvError>;

    /// Discards every recorded write; the underlying database is left
    /// untouched.
    fn rollback(&mut self) -> Result<(), KvError>;

    /// Approximate number of bytes queued in this batch so far, mirroring
    /// the size accounting production LevelDB-style engines use to decide
    /// when to flush.
    fn value_size(&self) -> usize;
}
