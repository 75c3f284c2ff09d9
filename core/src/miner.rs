//! Proof-of-work search: given a block with everything but a winning nonce,
//! try nonces until [`crate::hash::Hash::is_valid`] accepts one.
//!
//! The search itself is synchronous and CPU-bound; the coordinator that
//! runs it on a blocking thread and wires up cancellation lives in
//! `obscura-network`. This module only owns the loop and its bookkeeping.

use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::account::Account;
use crate::block::Block;
use crate::error::{Error, Result};
use crate::tx::SignedTx;

/// Attempts logged between progress lines.
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// A block-to-be: everything `Block` needs except a nonce that satisfies
/// the difficulty target.
#[derive(Debug, Clone)]
pub struct PendingBlock {
    pub parent: crate::hash::Hash,
    pub number: u64,
    pub time: u64,
    pub miner: Account,
    pub txs: Vec<SignedTx>,
}

impl PendingBlock {
    pub fn new(
        parent: crate::hash::Hash,
        number: u64,
        time: u64,
        miner: Account,
        txs: Vec<SignedTx>,
    ) -> Self {
        PendingBlock {
            parent,
            number,
            time,
            miner,
            txs,
        }
    }
}

/// Searches for a nonce that makes `pending`'s block hash valid, checking
/// `cancel` between attempts. An empty transaction list is rejected before
/// any work begins — mining a block that rewards nobody and moves nothing
/// is never useful.
///
/// Builds the candidate block once and mutates only `header.nonce` on each
/// attempt, so the per-attempt cost is a nonce draw, a re-serialize, and a
/// SHA-256 — not a full clone of the transaction payload.
pub fn mine(cancel: &AtomicBool, pending: &PendingBlock) -> Result<Block> {
    if pending.txs.is_empty() {
        return Err(Error::Validation(
            "refusing to mine a block with no transactions".into(),
        ));
    }

    let mut block = Block::new(
        pending.parent,
        pending.number,
        pending.time,
        0,
        pending.miner,
        pending.txs.clone(),
    );

    let mut attempts: u64 = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled { attempts });
        }

        block.header.nonce = OsRng.next_u32();
        attempts += 1;

        let hash = block.hash()?;
        if hash.is_valid() {
            info!(
                target: "obscura_core::miner",
                number = pending.number,
                attempts,
                %hash,
                "mined block"
            );
            return Ok(block);
        }

        if attempts == 1 || attempts % PROGRESS_INTERVAL == 0 {
            info!(
                target: "obscura_core::miner",
                number = pending.number,
                attempts,
                "still mining"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::UnsignedTx;
    use secp256k1::SECP256K1;

    fn reward_tx() -> SignedTx {
        let (sk, pk) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
        let miner = Account::from_uncompressed_pubkey(&pk.serialize_uncompressed()).unwrap();
        UnsignedTx::reward(miner, 100, 1).sign(&sk).unwrap()
    }

    #[test]
    fn mines_a_valid_block() {
        let tx = reward_tx();
        let pending = PendingBlock::new(crate::hash::Hash::ZERO, 0, 1, tx.to, vec![tx]);
        let cancel = AtomicBool::new(false);
        let block = mine(&cancel, &pending).unwrap();
        assert!(block.hash().unwrap().is_valid());
    }

    #[test]
    fn refuses_to_mine_empty_block() {
        let pending = PendingBlock::new(crate::hash::Hash::ZERO, 0, 1, Account::ZERO, vec![]);
        let cancel = AtomicBool::new(false);
        let err = mine(&cancel, &pending).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn cancellation_stops_the_search() {
        let tx = reward_tx();
        let pending = PendingBlock::new(crate::hash::Hash::ZERO, 0, 1, tx.to, vec![tx]);
        let cancel = AtomicBool::new(true);
        let err = mine(&cancel, &pending).unwrap_err();
        assert!(matches!(err, Error::Cancelled { attempts: 0 }));
    }
}
