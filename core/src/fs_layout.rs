//! Data directory layout: `<dataDir>/database/{genesis.json,blocks.db}`.
//!
//! Keystore files live under `<dataDir>/keystore/`, managed by the wallet
//! crate; this module only owns the paths the state engine reads/writes.

use std::path::{Path, PathBuf};

pub fn database_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("database")
}

pub fn genesis_path(data_dir: &Path) -> PathBuf {
    database_dir(data_dir).join("genesis.json")
}

pub fn blocks_db_path(data_dir: &Path) -> PathBuf {
    database_dir(data_dir).join("blocks.db")
}

pub fn keystore_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("keystore")
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Creates `<dataDir>/database` and seeds `genesis.json`/`blocks.db` if the
/// genesis file is missing. Idempotent across restarts.
pub fn init_data_dir_if_missing(data_dir: &Path, genesis_json: &str) -> std::io::Result<()> {
    let genesis_file = genesis_path(data_dir);
    if file_exists(&genesis_file) {
        return Ok(());
    }
    std::fs::create_dir_all(database_dir(data_dir))?;
    std::fs::write(&genesis_file, genesis_json)?;
    let blocks_file = blocks_db_path(data_dir);
    if !file_exists(&blocks_file) {
        std::fs::write(&blocks_file, b"")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        init_data_dir_if_missing(dir.path(), "{}").unwrap();
        let first = std::fs::read_to_string(genesis_path(dir.path())).unwrap();
        // A second call must not clobber an existing genesis.
        init_data_dir_if_missing(dir.path(), "{\"different\":true}").unwrap();
        let second = std::fs::read_to_string(genesis_path(dir.path())).unwrap();
        assert_eq!(first, second);
    }
}
