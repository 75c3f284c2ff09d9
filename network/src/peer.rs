//! A peer this node knows about, by `ip:port` key.

use serde::{Deserialize, Serialize};

/// `connected` is a soft flag: it asserts the peer has accepted an inbound
/// join request, not that a connection is currently open (there is no
/// persistent connection in a pull-style HTTP protocol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownPeer {
    pub ip: String,
    pub port: u16,
    pub is_bootstrap: bool,
    pub connected: bool,
}

impl KnownPeer {
    pub fn new(ip: impl Into<String>, port: u16, is_bootstrap: bool) -> Self {
        KnownPeer {
            ip: ip.into(),
            port,
            is_bootstrap,
            connected: false,
        }
    }

    pub fn key(&self) -> String {
        crate::addr::peer_key(&self.ip, self.port)
    }
}
