//! Every handler error becomes `500 {"error": "<message>"}` — the HTTP
//! surface has exactly one failure shape, matching the original node's
//! `writeErrorResponse`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Network(#[from] obscura_network::NodeError),

    #[error(transparent)]
    Wallet(#[from] obscura_wallet::error::WalletError),

    #[error(transparent)]
    Core(#[from] obscura_core::Error),

    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
