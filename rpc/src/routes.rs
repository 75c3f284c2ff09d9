use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// Builds the node's HTTP surface: balances, transaction submission, and
/// the three peer-sync endpoints another node's synchroniser polls.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/balances/list", get(handlers::list_balances))
        .route("/tx/add", post(handlers::add_tx))
        .route("/node/status", get(handlers::node_status))
        .route("/node/peer", get(handlers::add_peer))
        .route("/node/blocks", get(handlers::fetch_blocks))
        .with_state(state)
}
