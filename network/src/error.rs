//! Coordinator-level errors: everything `core::error::Error` covers, plus
//! peer-network failure modes that have no meaning inside the state engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Core(#[from] obscura_core::Error),

    #[error("peer request failed: {0}")]
    Network(String),

    #[error("peer request timed out")]
    Timeout,

    #[error("unknown peer {0}")]
    UnknownPeer(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;

impl From<reqwest::Error> for NodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NodeError::Timeout
        } else {
            NodeError::Network(e.to_string())
        }
    }
}
