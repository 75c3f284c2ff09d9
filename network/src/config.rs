//! Runtime configuration for a node instance. Fluent builder, following
//! the same shape as `obscura_core::config::ConfigBuilder`.

use std::path::PathBuf;
use std::time::Duration;

use obscura_core::Account;

use crate::peer::KnownPeer;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub data_dir: PathBuf,
    pub ip: String,
    pub port: u16,
    pub miner: Account,
    pub bootstrap_peers: Vec<KnownPeer>,
    pub mining_tick: Duration,
    pub sync_tick: Duration,
    pub peer_request_timeout: Duration,
}

impl NodeConfig {
    pub fn self_key(&self) -> String {
        crate::addr::peer_key(&self.ip, self.port)
    }
}

pub struct NodeConfigBuilder {
    data_dir: PathBuf,
    ip: String,
    port: u16,
    miner: Account,
    bootstrap_peers: Vec<KnownPeer>,
    mining_tick: Duration,
    sync_tick: Duration,
    peer_request_timeout: Duration,
}

impl NodeConfigBuilder {
    pub fn new(data_dir: impl Into<PathBuf>, miner: Account) -> Self {
        NodeConfigBuilder {
            data_dir: data_dir.into(),
            ip: "127.0.0.1".into(),
            port: 8080,
            miner,
            bootstrap_peers: Vec::new(),
            mining_tick: Duration::from_secs(10),
            sync_tick: Duration::from_secs(45),
            peer_request_timeout: Duration::from_secs(10),
        }
    }

    pub fn bind(mut self, ip: impl Into<String>, port: u16) -> Self {
        self.ip = ip.into();
        self.port = port;
        self
    }

    pub fn bootstrap_peer(mut self, peer: KnownPeer) -> Self {
        self.bootstrap_peers.push(peer);
        self
    }

    pub fn mining_tick(mut self, d: Duration) -> Self {
        self.mining_tick = d;
        self
    }

    pub fn sync_tick(mut self, d: Duration) -> Self {
        self.sync_tick = d;
        self
    }

    pub fn peer_request_timeout(mut self, d: Duration) -> Self {
        self.peer_request_timeout = d;
        self
    }

    pub fn finish(self) -> NodeConfig {
        NodeConfig {
            data_dir: self.data_dir,
            ip: self.ip,
            port: self.port,
            miner: self.miner,
            bootstrap_peers: self.bootstrap_peers,
            mining_tick: self.mining_tick,
            sync_tick: self.sync_tick,
            peer_request_timeout: self.peer_request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_bind_address() {
        let cfg = NodeConfigBuilder::new("/tmp/data", Account::ZERO)
            .bind("0.0.0.0", 9000)
            .finish();
        assert_eq!(cfg.self_key(), "0.0.0.0:9000");
    }
}
