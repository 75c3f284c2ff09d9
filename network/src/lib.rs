//! Obscura Network
//!
//! The node coordinator (mempool, archive, peer table, ledger handle),
//! its three background tasks — mining ticker, peer synchroniser, and
//! synced-block listener — and the HTTP client plumbing they share.
//! The HTTP *server* surface lives in `obscura-rpc`, which depends on
//! this crate for `Node`.

pub mod addr;
pub mod config;
pub mod error;
pub mod listener;
pub mod mining;
pub mod node;
pub mod peer;
pub mod sync;
pub mod wire;

pub use config::{NodeConfig, NodeConfigBuilder};
pub use error::{NodeError, Result};
pub use node::{Node, NodeStatus};
pub use peer::KnownPeer;
