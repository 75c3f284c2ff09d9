//! The shared coordinator: mempool, archive, peer table, mining flag, and
//! the ledger, all reachable from the HTTP handler pool, the mining ticker,
//! the sync ticker, and the synced-block listener.
//!
//! Mutability is split into exactly two locks, per the single-owner-lock
//! design: one `parking_lot::Mutex<NodeState>` guarding mempool/archive/
//! peers/mining-flag together (so the ordering rule "read and set
//! `is_mining` under the same lock that inspects `pending_txs`" holds for
//! free), and one `parking_lot::Mutex<State>` guarding the ledger.

use std::collections::HashMap;
use std::sync::Arc;

use obscura_core::{Account, Block, Hash, SignedTx, State};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::NodeConfig;
use crate::error::Result;
use crate::peer::KnownPeer;

struct NodeState {
    known_peers: HashMap<String, KnownPeer>,
    pending_txs: HashMap<Hash, SignedTx>,
    archive_txs: HashMap<Hash, SignedTx>,
    is_mining: bool,
    mining_cancel: Option<CancellationToken>,
}

/// A point-in-time view of the node for the `/node/status` handler.
pub struct NodeStatus {
    pub block_hash: Hash,
    pub block_number: u64,
    pub known_peers: HashMap<String, KnownPeer>,
    pub pending_txs: Vec<SignedTx>,
}

pub struct Node {
    pub config: NodeConfig,
    state: Mutex<NodeState>,
    ledger: Mutex<State>,
    synced_block_tx: mpsc::Sender<Block>,
}

impl Node {
    /// Opens the ledger at `config.data_dir`, seeds the peer table from
    /// `config.bootstrap_peers`, and returns the node plus the receiving
    /// half of its synced-block channel (capacity 1) for the caller to hand
    /// to `listener::run`.
    pub fn open(config: NodeConfig) -> Result<(Arc<Node>, mpsc::Receiver<Block>)> {
        let ledger = State::open(&config.data_dir)?;
        let mut known_peers = HashMap::new();
        for peer in &config.bootstrap_peers {
            known_peers.insert(peer.key(), peer.clone());
        }
        let (tx, rx) = mpsc::channel(1);
        let node = Node {
            config,
            state: Mutex::new(NodeState {
                known_peers,
                pending_txs: HashMap::new(),
                archive_txs: HashMap::new(),
                is_mining: false,
                mining_cancel: None,
            }),
            ledger: Mutex::new(ledger),
            synced_block_tx: tx,
        };
        Ok((Arc::new(node), rx))
    }

    pub fn status(&self) -> NodeStatus {
        let (block_hash, block_number) = {
            let ledger = self.ledger.lock();
            let number = ledger.latest_block().map(|b| b.header.number).unwrap_or(0);
            (ledger.latest_block_hash(), number)
        };
        let state = self.state.lock();
        NodeStatus {
            block_hash,
            block_number,
            known_peers: state.known_peers.clone(),
            pending_txs: state.pending_txs.values().cloned().collect(),
        }
    }

    pub fn balances(&self) -> (Hash, HashMap<Account, u64>) {
        let ledger = self.ledger.lock();
        (ledger.latest_block_hash(), ledger.balances().clone())
    }

    pub fn blocks_after(&self, h: &Hash) -> Result<Vec<Block>> {
        Ok(self.ledger.lock().blocks_after(h)?)
    }

    pub fn add_block(&self, block: Block) -> Result<Hash> {
        Ok(self.ledger.lock().add_block(block)?)
    }

    /// `(parent_hash, next_block_number)` for building a pending block.
    pub fn mining_anchor(&self) -> (Hash, u64) {
        let ledger = self.ledger.lock();
        (ledger.latest_block_hash(), ledger.next_block_number())
    }

    /// Admits `tx` into the mempool. Idempotent: already-pending or
    /// already-archived transactions are a silent no-op. Rejects
    /// transactions that fail authentication.
    pub fn add_pending_tx(&self, tx: SignedTx) -> Result<()> {
        let hash = tx.hash()?;
        let mut state = self.state.lock();
        if state.pending_txs.contains_key(&hash) || state.archive_txs.contains_key(&hash) {
            return Ok(());
        }
        if !tx.is_authentic() {
            return Err(obscura_core::Error::Validation("transaction is not authentic".into()).into());
        }
        state.pending_txs.insert(hash, tx);
        Ok(())
    }

    pub fn add_known_peer(&self, peer: KnownPeer) {
        let mut state = self.state.lock();
        state.known_peers.entry(peer.key()).or_insert(peer);
    }

    pub fn mark_peer_connected(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(p) = state.known_peers.get_mut(key) {
            p.connected = true;
        }
    }

    pub fn remove_peer(&self, key: &str) {
        self.state.lock().known_peers.remove(key);
    }

    pub fn known_peers_snapshot(&self) -> HashMap<String, KnownPeer> {
        self.state.lock().known_peers.clone()
    }

    pub fn has_pending_or_archived(&self, hash: &Hash) -> bool {
        let state = self.state.lock();
        state.pending_txs.contains_key(hash) || state.archive_txs.contains_key(hash)
    }

    /// Starts a mining round iff idle and the mempool is non-empty,
    /// snapshotting the pending transactions and setting `is_mining` under
    /// the same lock, per the ordering rule in the concurrency model.
    /// Returns the per-round cancellation token (a child of `parent`) and
    /// the tx snapshot, or `None` if there's nothing to mine this tick.
    pub fn begin_mining_round(&self, parent: &CancellationToken) -> Option<(CancellationToken, Vec<SignedTx>)> {
        let mut state = self.state.lock();
        if state.is_mining || state.pending_txs.is_empty() {
            return None;
        }
        state.is_mining = true;
        let token = parent.child_token();
        state.mining_cancel = Some(token.clone());
        let txs = state.pending_txs.values().cloned().collect();
        Some((token, txs))
    }

    /// Moves each of `block`'s transactions from the mempool to the
    /// archive, for any that were present (remote blocks may contain
    /// transactions this node never saw in its own mempool).
    pub fn archive_block_txs(&self, block: &Block) -> Result<()> {
        let mut state = self.state.lock();
        for tx in &block.payload {
            let hash = tx.hash()?;
            if let Some(tx) = state.pending_txs.remove(&hash) {
                state.archive_txs.insert(hash, tx);
            }
        }
        Ok(())
    }

    pub fn finish_mining_round(&self) {
        let mut state = self.state.lock();
        state.is_mining = false;
        state.mining_cancel = None;
    }

    /// Called by the synced-block listener: archives `block`'s txs, then
    /// cancels any in-flight mining round so it abandons work that has
    /// already been confirmed upstream.
    pub fn preempt_for_synced_block(&self, block: &Block) -> Result<()> {
        self.archive_block_txs(block)?;
        let state = self.state.lock();
        if state.is_mining {
            if let Some(token) = &state.mining_cancel {
                token.cancel();
            }
        }
        Ok(())
    }

    /// Applies a block fetched from a peer to the ledger, then publishes it
    /// on the synced-block channel with non-blocking, coalescing send — a
    /// second block arriving before the first is drained is dropped, which
    /// is safe because any new block invalidates in-flight mining anyway.
    pub fn apply_synced_block(&self, block: Block) -> Result<Hash> {
        let hash = self.add_block(block.clone())?;
        let _ = self.synced_block_tx.try_send(block);
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfigBuilder;
    use obscura_core::UnsignedTx;
    use secp256k1::SECP256K1;

    fn keypair() -> (secp256k1::SecretKey, Account) {
        let (sk, pk) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
        let account = Account::from_uncompressed_pubkey(&pk.serialize_uncompressed()).unwrap();
        (sk, account)
    }

    fn test_node() -> Arc<Node> {
        let dir = tempfile::tempdir().unwrap();
        // Leak the tempdir path on purpose: the test only needs the node to
        // outlive the function body, which it does since Arc is returned.
        let path = dir.into_path();
        let (_, miner) = keypair();
        let config = NodeConfigBuilder::new(path, miner).finish();
        let (node, _rx) = Node::open(config).unwrap();
        node
    }

    #[test]
    fn add_pending_tx_is_idempotent() {
        let node = test_node();
        let (sk, from) = keypair();
        let (_, to) = keypair();
        let tx = UnsignedTx::new(from, to, 1, "", 1).sign(&sk).unwrap();
        node.add_pending_tx(tx.clone()).unwrap();
        node.add_pending_tx(tx.clone()).unwrap();
        assert_eq!(node.status().pending_txs.len(), 1);
    }

    #[test]
    fn inauthentic_tx_is_rejected() {
        let node = test_node();
        let (sk, from) = keypair();
        let (_, to) = keypair();
        let mut tx = UnsignedTx::new(from, to, 1, "", 1).sign(&sk).unwrap();
        tx.value = 999;
        let err = node.add_pending_tx(tx).unwrap_err();
        assert!(matches!(err, crate::error::NodeError::Core(obscura_core::Error::Validation(_))));
    }

    #[test]
    fn mining_round_requires_nonempty_mempool() {
        let node = test_node();
        let parent = CancellationToken::new();
        assert!(node.begin_mining_round(&parent).is_none());
    }

    #[test]
    fn synced_block_preemption_cancels_mining_token() {
        let node = test_node();
        let (sk, miner) = keypair();
        let tx = UnsignedTx::new(miner, miner, 1, "", 1).sign(&sk).unwrap();
        node.add_pending_tx(tx.clone()).unwrap();

        let parent = CancellationToken::new();
        let (token, _txs) = node.begin_mining_round(&parent).unwrap();
        assert!(!token.is_cancelled());

        let block = Block::new(Hash::ZERO, 0, 1, 0, miner, vec![tx]);
        node.preempt_for_synced_block(&block).unwrap();
        assert!(token.is_cancelled());
        assert_eq!(node.status().pending_txs.len(), 0);
    }
}
