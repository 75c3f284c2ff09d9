//! The state engine: deterministic replay of accepted blocks against an
//! in-memory balance map, with an append-only block log on disk.
//!
//! `State` does not own the mempool or transaction archive — those belong
//! to the node coordinator (see `obscura-network`), which is the only
//! caller that mutates them. `State` is concerned solely with the
//! consensus-critical parts of §4.1: replay, validation, append, and
//! answering "what's new since hash H".

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::account::Account;
use crate::block::{Block, PersistedBlockRecord};
use crate::error::{Error, Result};
use crate::fs_layout;
use crate::genesis::Genesis;
use crate::hash::Hash;

/// Credited to a block's miner on acceptance, in addition to any
/// reward transaction the miner chose to include.
pub const BLOCK_REWARD: u64 = 100;

pub struct State {
    data_dir: PathBuf,
    balances: HashMap<Account, u64>,
    latest_block: Option<Block>,
    latest_block_hash: Hash,
    has_genesis_block: bool,
    db_file: File,
}

impl State {
    /// Creates the data directory if missing, writes the embedded genesis
    /// JSON if missing, opens the block log for append, and replays every
    /// record to rebuild `balances`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<State> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let genesis = Genesis::load_or_init(&data_dir)?;

        Self::recover_trailing_partial_record(&data_dir)?;

        let db_file = OpenOptions::new()
            .append(true)
            .read(true)
            .open(fs_layout::blocks_db_path(&data_dir))?;

        let mut state = State {
            data_dir,
            balances: genesis.balances.clone(),
            latest_block: None,
            latest_block_hash: Hash::ZERO,
            has_genesis_block: false,
            db_file,
        };

        state.replay_log()?;
        Ok(state)
    }

    /// If the last line of the block log is not valid JSON, truncate the
    /// file back to the last complete newline boundary. This is the chosen
    /// resolution for a log left with a trailing partial write (see
    /// SPEC_FULL.md §9.5): truncate rather than refuse to start.
    fn recover_trailing_partial_record(data_dir: &Path) -> Result<()> {
        let path = fs_layout::blocks_db_path(data_dir);
        if !path.exists() {
            return Ok(());
        }
        let contents = std::fs::read(&path)?;
        if contents.is_empty() {
            return Ok(());
        }

        // Find the start of the last line (content may or may not end in \n).
        let ends_with_newline = contents.last() == Some(&b'\n');
        let body = if ends_with_newline {
            &contents[..contents.len() - 1]
        } else {
            &contents[..]
        };
        let last_line_start = body.iter().rposition(|&b| b == b'\n').map(|i| i + 1).unwrap_or(0);
        let last_line = &body[last_line_start..];

        if last_line.is_empty() {
            return Ok(());
        }
        if serde_json::from_slice::<PersistedBlockRecord>(last_line).is_ok() {
            return Ok(());
        }

        warn!(
            target: "obscura_core::state",
            bytes_dropped = contents.len() - last_line_start,
            "truncating trailing partial block log record"
        );
        let mut file = OpenOptions::new().write(true).open(&path)?;
        file.set_len(last_line_start as u64)?;
        Ok(())
    }

    fn replay_log(&mut self) -> Result<()> {
        let mut reader = BufReader::new(File::open(fs_layout::blocks_db_path(&self.data_dir))?);
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: PersistedBlockRecord = serde_json::from_str(trimmed)?;
            self.apply_validated_block(record.block, record.hash)?;
        }
        Ok(())
    }

    pub fn latest_block_hash(&self) -> Hash {
        self.latest_block_hash
    }

    pub fn latest_block(&self) -> Option<&Block> {
        self.latest_block.as_ref()
    }

    pub fn next_block_number(&self) -> u64 {
        match &self.latest_block {
            Some(b) => b.header.number + 1,
            None => 0,
        }
    }

    pub fn balances(&self) -> &HashMap<Account, u64> {
        &self.balances
    }

    pub fn has_genesis_block(&self) -> bool {
        self.has_genesis_block
    }

    /// Validates and appends `block`, returning its hash. Leaves the
    /// in-memory state, balances, and on-disk log byte-identical on any
    /// failure (snapshot discipline).
    pub fn add_block(&mut self, block: Block) -> Result<Hash> {
        let (hash, snapshot) = self.validate_block(&block)?;

        let record = PersistedBlockRecord {
            hash,
            block: block.clone(),
        };
        let line = serde_json::to_vec(&record)?;
        self.db_file.write_all(&line)?;
        self.db_file.write_all(b"\n")?;
        self.db_file.flush()?;

        self.commit(block, hash, snapshot);
        Ok(hash)
    }

    /// Validates `block` against the current tip and a cloned balance
    /// snapshot, without touching `self.db_file` or any live state. Shared
    /// by `add_block` (which persists afterwards) and `replay_log` (which
    /// never re-persists a record it just read back off disk).
    fn validate_block(&self, block: &Block) -> Result<(Hash, HashMap<Account, u64>)> {
        if self.has_genesis_block {
            if block.header.number != self.next_block_number() {
                return Err(Error::Validation(format!(
                    "expected block number {}, got {}",
                    self.next_block_number(),
                    block.header.number
                )));
            }
            if block.header.parent != self.latest_block_hash {
                return Err(Error::Validation(
                    "block parent does not match chain tip".into(),
                ));
            }
        }

        let hash = block.hash()?;
        if !hash.is_valid() {
            return Err(Error::Validation(
                "block hash does not meet difficulty target".into(),
            ));
        }

        let mut snapshot = self.balances.clone();
        Self::apply_txs(&mut snapshot, block)?;
        *snapshot.entry(block.header.miner).or_insert(0) += BLOCK_REWARD;

        Ok((hash, snapshot))
    }

    /// Installs an already-validated block and its balance snapshot as the
    /// new live state. The only mutation of `self.balances`/`latest_block*`
    /// anywhere in the engine.
    fn commit(&mut self, block: Block, hash: Hash, snapshot: HashMap<Account, u64>) {
        self.balances = snapshot;
        self.latest_block_hash = hash;
        self.has_genesis_block = true;
        let number = block.header.number;
        let tx_count = block.payload.len();
        self.latest_block = Some(block);

        info!(
            target: "obscura_core::state",
            number, %hash, tx_count, "accepted block"
        );
    }

    /// Re-applies a block already sitting in the on-disk log, during
    /// replay. Validates exactly as `add_block` does and checks the
    /// recomputed hash against the persisted one (replay doubles as an
    /// integrity check), but never writes back to `db_file` — the record is
    /// already there, and the block log is append-only (invariant #1).
    fn apply_validated_block(&mut self, block: Block, expected_hash: Hash) -> Result<()> {
        let (hash, snapshot) = self.validate_block(&block)?;
        if hash != expected_hash {
            return Err(Error::Validation(
                "recomputed block hash does not match persisted hash".into(),
            ));
        }
        self.commit(block, hash, snapshot);
        Ok(())
    }

    fn apply_txs(balances: &mut HashMap<Account, u64>, block: &Block) -> Result<()> {
        for tx in &block.payload {
            if !tx.is_authentic() {
                return Err(Error::Validation(format!(
                    "transaction {} failed authentication",
                    tx.hash()?
                )));
            }
            if tx.is_reward() {
                *balances.entry(tx.to).or_insert(0) += tx.value;
            } else {
                let from_balance = *balances.get(&tx.from).unwrap_or(&0);
                if from_balance < tx.value {
                    return Err(Error::Validation(format!(
                        "insufficient balance: {} has {}, needs {}",
                        tx.from, from_balance, tx.value
                    )));
                }
                *balances.entry(tx.from).or_insert(0) -= tx.value;
                *balances.entry(tx.to).or_insert(0) += tx.value;
            }
        }
        Ok(())
    }

    /// All blocks recorded strictly after the one whose hash equals `h`,
    /// in log order. If `h` is empty, returns every block from genesis.
    /// Reads through a fresh read-only handle so the append cursor on
    /// `db_file` is never disturbed.
    pub fn blocks_after(&self, h: &Hash) -> Result<Vec<Block>> {
        let mut file = File::open(fs_layout::blocks_db_path(&self.data_dir))?;
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let mut blocks = Vec::new();
        let mut found = h.is_empty();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: PersistedBlockRecord = serde_json::from_str(line)?;
            if found {
                blocks.push(record.block);
            } else if record.hash == *h {
                found = true;
            }
        }
        if !found {
            return Err(Error::NotFound(format!("no block with hash {h}")));
        }
        Ok(blocks)
    }

    /// Releases the log file handle.
    pub fn close(self) -> Result<()> {
        drop(self.db_file);
        Ok(())
    }
}
