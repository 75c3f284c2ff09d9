//! Error types for the **Obscura** core crate.
//!
//! All fallible operations return [`crate::Result`], an alias for
//! `core::result::Result<T, Error>`. The five variants mirror the error
//! kinds the whole system classifies errors into (state engine, miner,
//! coordinator and HTTP layer all reuse or wrap this enum): `IO`, `Decode`,
//! `Validation`, `Cancelled`, `NotFound`.

use thiserror::Error;

/// Core crate error type.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// Filesystem or other I/O failure.
    #[error("io error: {0}")]
    Io(String),

    /// Malformed JSON or hash encoding.
    #[error("decode error: {0}")]
    Decode(String),

    /// A block or transaction rule was violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cooperative abort of an in-flight operation (mining).
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    /// Requested hash is not present in the block log.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
