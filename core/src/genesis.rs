//! Genesis balance assignment — not itself a block, but the seed state the
//! replay in [`crate::state::State::open`] starts from.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::error::Result;
use crate::fs_layout;

/// The genesis JSON seeded into a fresh data directory. One well-known
/// account (a stand-in for "the first wallet created by `obscura wallet
/// new`") starts with a large balance so a freshly initialised node has
/// something to transact with in examples and tests.
pub const EMBEDDED_GENESIS_JSON: &str = r#"{
  "genesis_time": "2024-01-01T00:00:00Z",
  "chain_id": "obscura-pedagogical",
  "balances": {
    "0xf57913DB69e172c0aD5018Fb0CEBf63308B2B8D7": 1000000
  }
}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genesis {
    pub genesis_time: String,
    pub chain_id: String,
    pub balances: HashMap<Account, u64>,
}

impl Genesis {
    /// Loads `genesis.json` from `data_dir`, creating the directory and
    /// seeding the embedded default genesis first if it does not exist.
    pub fn load_or_init(data_dir: &Path) -> Result<Genesis> {
        fs_layout::init_data_dir_if_missing(data_dir, EMBEDDED_GENESIS_JSON)?;
        let contents = std::fs::read_to_string(fs_layout::genesis_path(data_dir))?;
        let genesis: Genesis = serde_json::from_str(&contents)?;
        Ok(genesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_genesis_parses() {
        let genesis: Genesis = serde_json::from_str(EMBEDDED_GENESIS_JSON).unwrap();
        assert_eq!(genesis.chain_id, "obscura-pedagogical");
        assert_eq!(genesis.balances.len(), 1);
    }

    #[test]
    fn load_or_init_seeds_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let genesis = Genesis::load_or_init(dir.path()).unwrap();
        assert!(!genesis.balances.is_empty());
        assert!(fs_layout::file_exists(&fs_layout::blocks_db_path(dir.path())));
    }
}
