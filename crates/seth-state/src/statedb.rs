//! Account balances and nonces layered over a [`Trie`](seth_trie::Trie).
//!
//! Mirrors the trie's own dirty-tracking discipline one level up: accessors
//! fall through to the trie (defaulting to a zero account), mutators create
//! or update an in-memory object and mark it dirty, and `commit` flushes
//! every dirty object into the trie before asking the trie itself to commit.

use crate::account::Account;
use crate::errors::StateError;
use seth_common::{Address, BigInt, Hash};
use seth_kv::{Batch, Database};
use std::collections::HashMap;
use std::sync::Arc;

/// Namespaces this state trie's pages inside the shared key/value store so
/// it can coexist with a chain store built over the same database.
const STATE_TRIE_PREFIX: &[u8] = b"S";

struct AccountObject {
    account: Account,
    dirty: bool,
}

pub struct StateDB {
    db: Arc<dyn Database>,
    trie: seth_trie::Trie,
    objects: HashMap<Address, AccountObject>,
}

impl StateDB {
    pub fn new(db: Arc<dyn Database>) -> Self {
        StateDB {
            trie: seth_trie::Trie::new(db.clone(), STATE_TRIE_PREFIX),
            db,
            objects: HashMap::new(),
        }
    }

    pub fn new_at_root(db: Arc<dyn Database>, root: Hash) -> Self {
        StateDB {
            trie: seth_trie::Trie::new_at_root(db.clone(), STATE_TRIE_PREFIX, root),
            db,
            objects: HashMap::new(),
        }
    }

    /// Rebinds this state DB to another root (e.g. a previous block's state)
    /// and drops every cached object.
    pub fn reset_statedb(&mut self, root: Hash) {
        self.trie = seth_trie::Trie::new_at_root(self.db.clone(), STATE_TRIE_PREFIX, root);
        self.objects.clear();
    }

    fn get_object(&mut self, address: &Address) -> Result<&mut AccountObject, StateError> {
        if !self.objects.contains_key(address) {
            let loaded = match self.trie.get(address.as_bytes())? {
                Some(encoded) => Account::rlp_decode(&encoded)?,
                None => Account::zero(),
            };
            self.objects.insert(
                *address,
                AccountObject {
                    account: loaded,
                    dirty: false,
                },
            );
        }
        Ok(self.objects.get_mut(address).expect("just inserted"))
    }

    pub fn get_nonce(&mut self, address: &Address) -> Result<u64, StateError> {
        Ok(self.get_object(address)?.account.nonce)
    }

    pub fn get_amount(&mut self, address: &Address) -> Result<BigInt, StateError> {
        Ok(self.get_object(address)?.account.amount.clone())
    }

    pub fn set_nonce(&mut self, address: &Address, nonce: u64) -> Result<(), StateError> {
        let obj = self.get_object(address)?;
        obj.account.nonce = nonce;
        obj.dirty = true;
        Ok(())
    }

    pub fn set_amount(&mut self, address: &Address, amount: BigInt) -> Result<(), StateError> {
        let obj = self.get_object(address)?;
        obj.account.amount = amount;
        obj.dirty = true;
        Ok(())
    }

    pub fn add_amount(&mut self, address: &Address, delta: &BigInt) -> Result<(), StateError> {
        let obj = self.get_object(address)?;
        obj.account.amount = &obj.account.amount + delta;
        obj.dirty = true;
        Ok(())
    }

    pub fn sub_amount(&mut self, address: &Address, delta: &BigInt) -> Result<(), StateError> {
        let obj = self.get_object(address)?;
        obj.account.amount = &obj.account.amount - delta;
        obj.dirty = true;
        Ok(())
    }

    /// Encodes every dirty account into the trie, then commits the trie
    /// itself, returning the new state root.
    pub fn commit(&mut self, batch: &mut dyn Batch) -> Result<Hash, StateError> {
        let dirty: Vec<Address> = self
            .objects
            .iter()
            .filter(|(_, obj)| obj.dirty)
            .map(|(addr, _)| *addr)
            .collect();
        let dirty_count = dirty.len();
        for address in dirty {
            let obj = self.objects.get_mut(&address).expect("collected above");
            let encoded = obj.account.rlp_encode();
            self.trie.update(address.as_bytes(), encoded)?;
            obj.dirty = false;
        }
        let root = self.trie.commit(batch)?;
        tracing::debug!(dirty_count, %root, "flushed dirty accounts into the state trie");
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seth_kv::MemoryDatabase;

    fn addr(b: u8) -> Address {
        let mut raw = [0u8; 20];
        raw[19] = b;
        Address::from(raw)
    }

    #[test]
    fn unknown_address_defaults_to_a_zero_account() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let mut sdb = StateDB::new(db);
        assert_eq!(sdb.get_amount(&addr(1)).unwrap(), BigInt::from(0));
        assert_eq!(sdb.get_nonce(&addr(1)).unwrap(), 0);
    }

    #[test]
    fn two_hundred_fifty_five_accounts_round_trip_through_commit_and_reopen() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let mut sdb = StateDB::new(db.clone());
        for i in 0u8..255 {
            let a = addr(i);
            sdb.add_amount(&a, &BigInt::from(2u32 * i as u32)).unwrap();
            sdb.set_nonce(&a, 1).unwrap();
        }
        let mut batch = db.new_batch();
        let root = sdb.commit(&mut *batch).unwrap();
        batch.commit().unwrap();

        let mut reopened = StateDB::new_at_root(db, root);
        for i in 0u8..255 {
            let a = addr(i);
            assert_eq!(
                reopened.get_amount(&a).unwrap(),
                BigInt::from(2u32 * i as u32)
            );
            assert_eq!(reopened.get_nonce(&a).unwrap(), 1);
        }
    }

    #[test]
    fn add_then_sub_amount_returns_to_the_original_balance() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let mut sdb = StateDB::new(db);
        let a = addr(9);
        sdb.add_amount(&a, &BigInt::from(500u32)).unwrap();
        sdb.sub_amount(&a, &BigInt::from(200u32)).unwrap();
        assert_eq!(sdb.get_amount(&a).unwrap(), BigInt::from(300u32));
    }

    #[test]
    fn reset_statedb_drops_the_cache_and_rebinds_to_another_root() {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let mut sdb = StateDB::new(db.clone());
        let a = addr(3);
        sdb.set_amount(&a, BigInt::from(42u32)).unwrap();
        let mut batch = db.new_batch();
        let root_with_balance = sdb.commit(&mut *batch).unwrap();
        batch.commit().unwrap();

        sdb.reset_statedb(Hash::zero());
        assert_eq!(sdb.get_amount(&a).unwrap(), BigInt::from(0));

        sdb.reset_statedb(root_with_balance);
        assert_eq!(sdb.get_amount(&a).unwrap(), BigInt::from(42u32));
    }
}
