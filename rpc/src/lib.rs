//! Obscura RPC
//!
//! The node's HTTP surface, axum-backed: five JSON endpoints over the
//! `obscura-network` coordinator (balances, tx submission, and the peer-sync
//! trio a remote node's synchroniser polls). Every handler error collapses
//! to `500 {"error": "<message>"}`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use obscura_network::Node;

pub use routes::router;

/// Shared state handed to every handler: the node coordinator plus where to
/// find keystore files for `/tx/add`'s signing step.
#[derive(Clone)]
pub struct AppState {
    pub node: Arc<Node>,
    pub keystore_dir: PathBuf,
}

impl AppState {
    pub fn new(node: Arc<Node>, keystore_dir: impl Into<PathBuf>) -> Self {
        AppState {
            node,
            keystore_dir: keystore_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use obscura_network::NodeConfigBuilder;
    use secp256k1::SECP256K1;
    use tower::ServiceExt;

    fn test_state() -> (AppState, tempfile::TempDir, tempfile::TempDir) {
        let data_dir = tempfile::tempdir().unwrap();
        let keystore_dir = tempfile::tempdir().unwrap();
        let (_, pk) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
        let miner = obscura_core::Account::from_uncompressed_pubkey(&pk.serialize_uncompressed()).unwrap();
        let config = NodeConfigBuilder::new(data_dir.path(), miner).finish();
        let (node, _rx) = obscura_network::Node::open(config).unwrap();
        (AppState::new(node, keystore_dir.path()), data_dir, keystore_dir)
    }

    #[tokio::test]
    async fn balances_list_reflects_genesis() {
        let (state, _d, _k) = test_state();
        let app = router(state);
        let res = app
            .oneshot(Request::builder().uri("/balances/list").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn node_status_reports_genesis_block() {
        let (state, _d, _k) = test_state();
        let app = router(state);
        let res = app
            .oneshot(Request::builder().uri("/node/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let status: dto::StatusResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(status.block_number, 0);
    }

    #[tokio::test]
    async fn tx_add_with_wrong_password_is_a_500() {
        let (state, _d, keystore_dir) = test_state();
        let from = obscura_wallet::new_account(keystore_dir.path(), "correct").unwrap();
        let to = obscura_core::Account::ZERO;
        let app = router(state);
        let body = serde_json::json!({
            "from": from.to_checksum(),
            "from_pwd": "wrong",
            "to": to.to_checksum(),
            "value": 1,
            "data": "",
        });
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tx/add")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn node_peer_registers_and_marks_connected() {
        let (state, _d, _k) = test_state();
        let node = state.node.clone();
        let app = router(state);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/node/peer?ip=10.0.0.5&port=9090")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let peers = node.known_peers_snapshot();
        assert!(peers.get("10.0.0.5:9090").map(|p| p.connected).unwrap_or(false));
    }

    #[tokio::test]
    async fn fetch_blocks_rejects_malformed_hash() {
        let (state, _d, _k) = test_state();
        let app = router(state);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/node/blocks?hash=not-hex")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
