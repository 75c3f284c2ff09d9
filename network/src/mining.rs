//! The mining ticker: fires every `config.mining_tick`, and if the node is
//! idle with a non-empty mempool, drains it into a candidate block and
//! searches for a valid nonce on a blocking thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use obscura_core::miner::{mine, PendingBlock};
use obscura_core::Error;

use crate::error::{NodeError, Result};
use crate::node::Node;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

/// Runs the mining ticker until `cancel` fires. Intended to be spawned as
/// its own task, one per running node.
pub async fn run(node: Arc<Node>, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(node.config.mining_tick);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = run_once(&node, &cancel).await {
                    if !matches!(e, NodeError::Core(Error::Cancelled { .. })) {
                        warn!(target: "obscura_network::mining", error = %e, "mining round failed");
                    }
                }
            }
        }
    }
}

async fn run_once(node: &Arc<Node>, cancel: &CancellationToken) -> Result<()> {
    let Some((round_token, txs)) = node.begin_mining_round(cancel) else {
        return Ok(());
    };

    let (parent, number) = node.mining_anchor();
    let pending = PendingBlock::new(parent, number, now_secs(), node.config.miner, txs);

    // The nonce search polls a plain AtomicBool (it must never suspend on
    // an async primitive); a watcher task bridges the CancellationToken
    // into that flag, running concurrently with the blocking search.
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let watcher_flag = Arc::clone(&cancel_flag);
    let watcher_token = round_token.clone();
    let watcher = tokio::spawn(async move {
        watcher_token.cancelled().await;
        watcher_flag.store(true, Ordering::Relaxed);
    });

    let search_flag = Arc::clone(&cancel_flag);
    let result = tokio::task::spawn_blocking(move || mine(&search_flag, &pending))
        .await
        .expect("mining thread panicked");
    watcher.abort();

    let outcome = match result {
        Ok(block) => (|| -> Result<()> {
            node.archive_block_txs(&block)?;
            let hash = node.add_block(block)?;
            info!(target: "obscura_network::mining", %hash, "locally mined block accepted");
            Ok(())
        })(),
        Err(e) => Err(e.into()),
    };
    node.finish_mining_round();
    outcome
}
