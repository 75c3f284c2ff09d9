//! The synced-block receive path: a standalone task that drains the
//! capacity-1 `new_synced_block` channel and preempts in-flight mining.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use obscura_core::Block;

use crate::node::Node;

pub async fn run(node: Arc<Node>, mut rx: mpsc::Receiver<Block>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => {
                match received {
                    Some(block) => {
                        if let Err(e) = node.preempt_for_synced_block(&block) {
                            warn!(target: "obscura_network::listener", error = %e, "failed to preempt mining for synced block");
                        }
                    }
                    None => break,
                }
            }
        }
    }
}
