//! Cross-crate scenarios exercising the persistent state layer end to
//! end: chain store + genesis + state DB + signer + transaction pool all
//! sharing one key/value store.

use seth_chain::{setup_genesis_block, BlockChain, ChainStore, Genesis, GenesisOutcome};
use seth_common::{Address, BigInt, Hash};
use seth_kv::{Batch, Database, MemoryDatabase};
use seth_state::StateDB;
use seth_txpool::{TxPool, TxPoolError};
use seth_types::{Body, Header, SethSigner, Transaction};
use std::sync::Arc;

fn addr(tag: u8) -> Address {
    let mut raw = [0u8; 20];
    raw[19] = tag;
    Address::from(raw)
}

// Invariant 1: BytesToHash(h.Bytes()) == h for any hash.
#[test]
fn hash_survives_a_round_trip_through_its_own_bytes() {
    let h = Hash::from_bytes(&[0x42u8; 32]);
    assert_eq!(Hash::from_bytes(h.as_bytes()), h);
}

// Invariant 9: tx pool deduplication.
#[test]
fn pool_rejects_a_duplicate_of_an_already_pending_transaction() {
    let pool = TxPool::new();
    let tx = Transaction::new(addr(1), BigInt::from(10u32), 0);
    pool.add_tx(Some(tx.clone())).unwrap();
    let err = pool.add_tx(Some(tx)).unwrap_err();
    assert!(matches!(err, TxPoolError::DuplicateTxHash(_)));
    assert_eq!(pool.len(), 1);
}

// Invariants 6-8: signature round-trip, hash independence, chain id recovery.
#[test]
fn signed_transaction_recovers_its_sender_and_chain_id() {
    let (secret, pubkey) = seth_crypto::generate_keypair();
    let expected_sender = seth_crypto::address_from_uncompressed_pubkey(&pubkey).unwrap();

    let mut tx = Transaction::new(addr(2), BigInt::from(10u32), 0);
    let pre_sign_hash = tx.hash().unwrap();

    let signer = SethSigner::new(BigInt::from(1u32));
    signer.sign(&mut tx, &secret).unwrap();

    assert_eq!(tx.hash().unwrap(), pre_sign_hash);
    assert_eq!(signer.sender(&tx).unwrap(), expected_sender);
    assert_eq!(SethSigner::tx_chain_id(&tx).unwrap(), BigInt::from(1u32));
}

// Invariant 10 and the chain-store scenario: genesis install, head pointer,
// GetBlockByNumber(0).
#[test]
fn genesis_install_is_reachable_through_the_blockchain_facade() {
    let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
    let store = ChainStore::new(db);
    let genesis = Genesis::default_genesis();

    let (hash, outcome) = setup_genesis_block(&store, &genesis).unwrap();
    assert_eq!(outcome, GenesisOutcome::Installed);
    assert_eq!(store.get_head_block_hash().unwrap(), Some(hash));

    let bc = BlockChain::new(store).unwrap();
    let genesis_block = bc.get_block_by_number(0).unwrap().unwrap();
    assert_eq!(genesis_block.hash().unwrap(), hash);
}

/// A full slice of the flow described in the system overview: genesis is
/// installed, a second block is built whose header embeds a freshly
/// committed state root and references the genesis hash as its parent,
/// and the resulting chain is readable back through the LRU-backed
/// façade.
#[test]
fn a_state_commit_feeds_the_next_blocks_header_and_the_block_is_retrievable() {
    let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
    let store = ChainStore::new(db.clone());
    let genesis = Genesis::default_genesis();
    let (genesis_hash, _) = setup_genesis_block(&store, &genesis).unwrap();

    let mut state = StateDB::new(db.clone());
    state
        .add_amount(&addr(7), &BigInt::from(1_000u32))
        .unwrap();
    state.set_nonce(&addr(7), 1).unwrap();
    let mut state_batch = db.new_batch();
    let state_root = state.commit(state_batch.as_mut()).unwrap();
    state_batch.commit().unwrap();

    let signer = SethSigner::new(genesis.chain_id.clone());
    let (secret, _pubkey) = seth_crypto::generate_keypair();
    let mut tx = Transaction::new(addr(8), BigInt::from(5u32), 0);
    signer.sign(&mut tx, &secret).unwrap();

    let pool = TxPool::new();
    pool.add_tx(Some(tx.clone())).unwrap();

    let body = Body {
        transactions: vec![tx],
    };
    let header = Header {
        parent_hash: genesis_hash,
        coinbase: Address::zero(),
        root: state_root,
        tx_hash: seth_crypto::keccak256(&body.rlp_encode().unwrap()),
        difficulty: genesis.difficulty.clone(),
        number: BigInt::from(1u32),
        time: BigInt::from(1_700_000_100u64),
        extra: vec![],
        mix_digest: Hash::zero(),
        nonce: [0u8; 8],
    };
    let total_difficulty = &genesis.difficulty + &genesis.difficulty;

    let mut batch = store.new_batch();
    let hash = store.write_header(batch.as_mut(), &header).unwrap();
    store.write_body(batch.as_mut(), hash, 1, &body).unwrap();
    store
        .write_td(batch.as_mut(), hash, 1, &total_difficulty)
        .unwrap();
    store.write_canonical_hash(batch.as_mut(), hash, 1).unwrap();
    store.write_head_block_hash(batch.as_mut(), hash).unwrap();
    batch.commit().unwrap();

    let bc = BlockChain::new(store).unwrap();
    let block = bc.get_block_by_number(1).unwrap().unwrap();
    assert_eq!(block.header.parent_hash, genesis_hash);
    assert_eq!(block.header.root, state_root);
    assert_eq!(block.body.transactions.len(), 1);

    let mut reopened_state = StateDB::new_at_root(db, state_root);
    assert_eq!(
        reopened_state.get_amount(&addr(7)).unwrap(),
        BigInt::from(1_000u32)
    );
    assert_eq!(reopened_state.get_nonce(&addr(7)).unwrap(), 1);
}
