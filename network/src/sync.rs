//! The peer synchroniser: every `config.sync_tick`, visits each known peer
//! and runs the five-step procedure from the concurrency model — status,
//! join, fetch blocks, peer union, tx diffusion. A peer that errors past the
//! initial status probe is logged and skipped for this tick; a peer that
//! fails the status probe itself is dropped from `known_peers` entirely.

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{NodeError, Result};
use crate::node::Node;
use crate::peer::KnownPeer;
use crate::wire::{BlocksResponse, JoinResponse, StatusResponse};

pub async fn run(node: Arc<Node>, cancel: CancellationToken) {
    let client = Client::builder()
        .timeout(node.config.peer_request_timeout)
        .build()
        .expect("failed to build peer sync http client");
    let mut ticker = tokio::time::interval(node.config.sync_tick);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => tick(&node, &client).await,
        }
    }
}

async fn tick(node: &Arc<Node>, client: &Client) {
    let self_key = node.config.self_key();
    let peers = node.known_peers_snapshot();

    for (key, peer) in peers {
        if key == self_key {
            continue;
        }
        info!(target: "obscura_network::sync", peer = %key, "searching for new peers and blocks");
        if let Err(e) = sync_with_peer(node, client, &key, &peer).await {
            warn!(target: "obscura_network::sync", peer = %key, error = %e, "peer was removed from known_peers");
            node.remove_peer(&key);
        }
    }
}

async fn sync_with_peer(node: &Arc<Node>, client: &Client, key: &str, peer: &KnownPeer) -> Result<()> {
    let base = format!("http://{key}");

    let status: StatusResponse = get_json(client, &format!("{base}/node/status")).await?;

    if let Err(e) = join_peer(node, client, &base, peer).await {
        warn!(target: "obscura_network::sync", peer = %key, error = %e, "peer join failed");
        return Ok(());
    }

    if let Err(e) = fetch_blocks(node, client, &base, &status).await {
        warn!(target: "obscura_network::sync", peer = %key, error = %e, "block fetch failed");
        return Ok(());
    }

    sync_known_peers(node, &status.known_peers);

    if let Err(e) = sync_pending_txs(node, status.pending_txs) {
        warn!(target: "obscura_network::sync", peer = %key, error = %e, "pending tx diffusion failed");
    }

    Ok(())
}

async fn join_peer(node: &Arc<Node>, client: &Client, base: &str, peer: &KnownPeer) -> Result<()> {
    if peer.connected {
        return Ok(());
    }
    let url = format!("{base}/node/peer?ip={}&port={}", node.config.ip, node.config.port);
    let res: JoinResponse = get_json(client, &url).await?;
    if !res.success {
        let msg = if res.error.is_empty() {
            "peer declined join".to_string()
        } else {
            res.error
        };
        return Err(NodeError::Network(msg));
    }
    node.mark_peer_connected(&peer.key());
    Ok(())
}

async fn fetch_blocks(node: &Arc<Node>, client: &Client, base: &str, status: &StatusResponse) -> Result<()> {
    let (local_hash, local_number) = node.mining_anchor();

    if status.block_hash.is_empty() {
        return Ok(());
    }
    if status.block_number < local_number {
        return Ok(());
    }
    if status.block_number == 0 && !local_hash.is_empty() {
        return Ok(());
    }

    let new_blocks_count = if local_number == 0 && status.block_number == 0 {
        1
    } else {
        status.block_number - local_number
    };
    if new_blocks_count == 0 {
        return Ok(());
    }

    let url = format!("{base}/node/blocks?hash={local_hash}");
    let blocks: BlocksResponse = get_json(client, &url).await?;
    for block in blocks.blocks {
        node.apply_synced_block(block)?;
    }
    Ok(())
}

fn sync_known_peers(node: &Arc<Node>, peers: &std::collections::HashMap<String, KnownPeer>) {
    let self_key = node.config.self_key();
    let existing = node.known_peers_snapshot();
    for (key, peer) in peers {
        if *key == self_key || existing.contains_key(key) {
            continue;
        }
        node.add_known_peer(peer.clone());
    }
}

fn sync_pending_txs(node: &Arc<Node>, pending_txs: Vec<obscura_core::SignedTx>) -> Result<()> {
    for tx in pending_txs {
        let hash = tx.hash()?;
        if node.has_pending_or_archived(&hash) {
            continue;
        }
        node.add_pending_tx(tx)?;
    }
    Ok(())
}

async fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let body = client.get(url).send().await?.text().await?;
    serde_json::from_str(&body).map_err(|e| NodeError::Network(format!("bad response from {url}: {e}")))
}
