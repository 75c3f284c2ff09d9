use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Query, State};
use axum::Json;

use obscura_core::{Hash, UnsignedTx};

use crate::dto::{
    BalancesResponse, BlocksQuery, BlocksResponse, PeerQuery, PeerResponse, StatusResponse,
    TxAddRequest, TxAddResponse,
};
use crate::error::RpcError;
use crate::AppState;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

pub async fn list_balances(State(state): State<AppState>) -> Json<BalancesResponse> {
    let (hash, balances) = state.node.balances();
    Json(BalancesResponse { hash, balances })
}

pub async fn add_tx(
    State(state): State<AppState>,
    Json(req): Json<TxAddRequest>,
) -> Result<Json<TxAddResponse>, RpcError> {
    let unsigned = UnsignedTx::new(req.from, req.to, req.value, req.data, now_secs());
    let signed = obscura_wallet::sign_tx(unsigned, req.from, &req.from_pwd, &state.keystore_dir)?;
    state.node.add_pending_tx(signed)?;
    Ok(Json(TxAddResponse { success: true }))
}

pub async fn node_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.node.status();
    Json(StatusResponse {
        block_hash: status.block_hash,
        block_number: status.block_number,
        known_peers: status.known_peers,
        pending_txs: status.pending_txs,
    })
}

pub async fn add_peer(
    State(state): State<AppState>,
    Query(params): Query<PeerQuery>,
) -> Result<Json<PeerResponse>, RpcError> {
    let port: u16 = params
        .port
        .parse()
        .map_err(|_| RpcError::BadRequest(format!("invalid port: {}", params.port)))?;
    let peer = obscura_network::KnownPeer::new(params.ip, port, false);
    state.node.add_known_peer(peer.clone());
    state.node.mark_peer_connected(&peer.key());
    Ok(Json(PeerResponse { success: true, error: String::new() }))
}

pub async fn fetch_blocks(
    State(state): State<AppState>,
    Query(params): Query<BlocksQuery>,
) -> Result<Json<BlocksResponse>, RpcError> {
    let hash = Hash::from_hex(&params.hash)?;
    let blocks = state.node.blocks_after(&hash)?;
    Ok(Json(BlocksResponse { blocks }))
}
