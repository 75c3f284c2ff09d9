//! Obscura Wallet: password-encrypted secp256k1 keystores and transaction
//! signing on top of `obscura-core`'s account/transaction types.

pub mod error;
pub mod keystore;

use std::path::Path;

use obscura_core::{Account, SignedTx, UnsignedTx};

use crate::error::Result;

/// Generates a new keystore-backed account under `keystore_dir`.
pub fn new_account(keystore_dir: impl AsRef<Path>, password: &str) -> Result<Account> {
    keystore::new_account(keystore_dir, password)
}

/// Unlocks `from`'s keystore file with `password` and signs `tx` with it.
pub fn sign_tx(
    tx: UnsignedTx,
    from: Account,
    password: &str,
    keystore_dir: impl AsRef<Path>,
) -> Result<SignedTx> {
    let secret_key = keystore::unlock(keystore_dir, from, password)?;
    Ok(tx.sign(&secret_key)?)
}
