//! JSON shapes this node's sync client parses from a peer's HTTP responses.
//! Mirrors the response schemas `obscura-rpc`'s handlers serve, since a
//! peer is just another node running the same code.

use std::collections::HashMap;

use serde::Deserialize;

use obscura_core::{Block, Hash, SignedTx};

use crate::peer::KnownPeer;

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub block_hash: Hash,
    pub block_number: u64,
    pub known_peers: HashMap<String, KnownPeer>,
    pub pending_txs: Vec<SignedTx>,
}

#[derive(Debug, Deserialize)]
pub struct JoinResponse {
    pub success: bool,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct BlocksResponse {
    pub blocks: Vec<Block>,
}
