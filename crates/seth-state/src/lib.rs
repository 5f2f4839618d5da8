//! Account balances and nonces, persisted in a Merkle Patricia Trie keyed by
//! address. This is the layer a block header's state root commits to.

mod account;
mod errors;
mod statedb;

pub use account::Account;
pub use errors::StateError;
pub use statedb::StateDB;
