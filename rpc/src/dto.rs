//! Wire shapes for the five HTTP endpoints. Field names and nesting match
//! the original node's JSON exactly, since peers parse each other's
//! responses with these same shapes (see `obscura_network::wire`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use obscura_core::{Account, Block, Hash, SignedTx};
use obscura_network::KnownPeer;

#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub hash: Hash,
    pub balances: HashMap<Account, u64>,
}

#[derive(Debug, Deserialize)]
pub struct TxAddRequest {
    pub from: Account,
    pub from_pwd: String,
    pub to: Account,
    pub value: u64,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct TxAddResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub block_hash: Hash,
    pub block_number: u64,
    pub known_peers: HashMap<String, KnownPeer>,
    pub pending_txs: Vec<SignedTx>,
}

#[derive(Debug, Deserialize)]
pub struct PeerQuery {
    pub ip: String,
    pub port: String,
}

#[derive(Debug, Serialize)]
pub struct PeerResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct BlocksQuery {
    pub hash: String,
}

#[derive(Debug, Serialize)]
pub struct BlocksResponse {
    pub blocks: Vec<Block>,
}
