//! End-to-end replay scenarios exercising `State` and `miner::mine` together,
//! the way a node driving several mining rounds back to back would.

use std::sync::atomic::AtomicBool;

use obscura_core::miner::{mine, PendingBlock};
use obscura_core::state::State;
use obscura_core::tx::UnsignedTx;
use obscura_core::Account;
use secp256k1::SECP256K1;

fn keypair() -> (secp256k1::SecretKey, Account) {
    let (sk, pk) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
    let account = Account::from_uncompressed_pubkey(&pk.serialize_uncompressed()).unwrap();
    (sk, account)
}

#[test]
fn three_block_chain_with_transfers_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (miner_sk, miner) = keypair();
    let (alice_sk, alice) = keypair();
    let (_, bob) = keypair();
    let cancel = AtomicBool::new(false);

    let data_dir = dir.path().to_path_buf();
    let mut state = State::open(&data_dir).unwrap();

    // Block 1: reward only.
    let reward1 = UnsignedTx::reward(miner, 0, 10).sign(&miner_sk).unwrap();
    let pending1 = PendingBlock::new(state.latest_block_hash(), state.next_block_number(), 10, miner, vec![reward1]);
    let block1 = mine(&cancel, &pending1).unwrap();
    state.add_block(block1).unwrap();
    assert_eq!(*state.balances().get(&miner).unwrap(), 100);

    // Block 2: reward plus a transfer from miner to alice.
    let reward2 = UnsignedTx::reward(miner, 0, 11).sign(&miner_sk).unwrap();
    let xfer = UnsignedTx::new(miner, alice, 40, "", 11).sign(&miner_sk).unwrap();
    let pending2 = PendingBlock::new(
        state.latest_block_hash(),
        state.next_block_number(),
        11,
        miner,
        vec![reward2, xfer],
    );
    let block2 = mine(&cancel, &pending2).unwrap();
    state.add_block(block2).unwrap();
    assert_eq!(*state.balances().get(&miner).unwrap(), 160);
    assert_eq!(*state.balances().get(&alice).unwrap(), 40);

    // Block 3: alice forwards some of it to bob.
    let reward3 = UnsignedTx::reward(miner, 0, 12).sign(&miner_sk).unwrap();
    let forward = UnsignedTx::new(alice, bob, 15, "", 12).sign(&alice_sk).unwrap();
    let pending3 = PendingBlock::new(
        state.latest_block_hash(),
        state.next_block_number(),
        12,
        miner,
        vec![reward3, forward],
    );
    let block3 = mine(&cancel, &pending3).unwrap();
    let tip_hash = state.add_block(block3).unwrap();
    assert_eq!(*state.balances().get(&alice).unwrap(), 25);
    assert_eq!(*state.balances().get(&bob).unwrap(), 15);
    state.close().unwrap();

    let reopened = State::open(&data_dir).unwrap();
    assert_eq!(reopened.latest_block_hash(), tip_hash);
    assert_eq!(reopened.next_block_number(), 3);
    assert_eq!(*reopened.balances().get(&miner).unwrap(), 220);
    assert_eq!(*reopened.balances().get(&alice).unwrap(), 25);
    assert_eq!(*reopened.balances().get(&bob).unwrap(), 15);
}

#[test]
fn blocks_after_supports_incremental_peer_sync() {
    let dir = tempfile::tempdir().unwrap();
    let (miner_sk, miner) = keypair();
    let cancel = AtomicBool::new(false);
    let mut state = State::open(dir.path()).unwrap();

    let mut hashes = Vec::new();
    for t in 0..3u64 {
        let reward = UnsignedTx::reward(miner, 0, t).sign(&miner_sk).unwrap();
        let pending = PendingBlock::new(state.latest_block_hash(), state.next_block_number(), t, miner, vec![reward]);
        let block = mine(&cancel, &pending).unwrap();
        hashes.push(state.add_block(block).unwrap());
    }

    // A peer who has only seen the first block asks for what's new.
    let missing = state.blocks_after(&hashes[0]).unwrap();
    assert_eq!(missing.len(), 2);
    assert_eq!(missing[0].header.number, 1);
    assert_eq!(missing[1].header.number, 2);
}
