//! Error type for keystore and signing operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keystore json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] obscura_core::Error),

    #[error("no keystore file for account {0}")]
    AccountNotFound(obscura_core::Account),

    #[error("wrong password or corrupted keystore")]
    Decryption,

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;
