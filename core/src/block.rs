//! Blocks: a header linking into the chain plus an ordered transaction
//! payload. Hash is SHA-256 of the block's canonical JSON (header, then
//! payload, matching field declaration order).

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::crypto::sha256;
use crate::error::Result;
use crate::hash::Hash;
use crate::tx::SignedTx;

/// Block header: everything except the transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub parent: Hash,
    pub number: u64,
    pub time: u64,
    pub nonce: u32,
    pub miner: Account,
}

/// A header plus its ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub payload: Vec<SignedTx>,
}

impl Block {
    pub fn new(
        parent: Hash,
        number: u64,
        time: u64,
        nonce: u32,
        miner: Account,
        payload: Vec<SignedTx>,
    ) -> Self {
        Block {
            header: BlockHeader {
                parent,
                number,
                time,
                nonce,
                miner,
            },
            payload,
        }
    }

    /// SHA-256 of the block's canonical JSON encoding.
    pub fn hash(&self) -> Result<Hash> {
        let encoded = serde_json::to_vec(self)?;
        Ok(Hash::from_bytes(sha256(&encoded)))
    }
}

/// One line of the append-only block log: `{"hash": ..., "block": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedBlockRecord {
    pub hash: Hash,
    pub block: Block,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::new(Hash::ZERO, 0, 1, 42, Account([1u8; 20]), vec![])
    }

    #[test]
    fn json_round_trip() {
        let block = sample_block();
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, back);
    }

    #[test]
    fn hash_changes_with_nonce() {
        let mut block = sample_block();
        let h1 = block.hash().unwrap();
        block.header.nonce += 1;
        let h2 = block.hash().unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn persisted_record_round_trip() {
        let block = sample_block();
        let record = PersistedBlockRecord {
            hash: block.hash().unwrap(),
            block,
        };
        let line = serde_json::to_string(&record).unwrap();
        let back: PersistedBlockRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(record.hash, back.hash);
        assert_eq!(record.block, back.block);
    }
}
