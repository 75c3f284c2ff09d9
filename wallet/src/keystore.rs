//! Password-encrypted secp256k1 keystore files, one per account.
//!
//! File format follows the shape of a go-ethereum keystore (JSON envelope,
//! KDF parameters alongside the ciphertext, one file per account named with
//! a timestamp and the address) but swaps scrypt for argon2id and AES-CTR
//! for XChaCha20-Poly1305 — both already pulled in by the rest of the pack
//! for exactly this job.

use std::fs;
use std::path::{Path, PathBuf};

use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use obscura_core::Account;

use crate::error::{Result, WalletError};

const ARGON2_SALT_LEN: usize = 16;
const XCHACHA_NONCE_LEN: usize = 24;

#[derive(Debug, Serialize, Deserialize)]
struct KeystoreFile {
    version: u32,
    id: Uuid,
    address: Account,
    crypto: CryptoParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct CryptoParams {
    kdf: String,
    kdf_salt: String,
    cipher: String,
    cipher_nonce: String,
    ciphertext: String,
}

/// 32 raw secret-key bytes that get zeroed as soon as they go out of scope,
/// whether signing succeeded or the caller bailed out early.
struct SecretBuffer([u8; 32]);

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn derive_cipher_key(password: &str, salt: &[u8]) -> Result<Key> {
    let mut key_bytes = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    let key = Key::clone_from_slice(&key_bytes);
    key_bytes.zeroize();
    Ok(key)
}

/// Generates a fresh secp256k1 keypair, seals the secret key under
/// `password`, and writes the keystore file into `keystore_dir`. Returns the
/// new account's address.
pub fn new_account(keystore_dir: impl AsRef<Path>, password: &str) -> Result<Account> {
    let keystore_dir = keystore_dir.as_ref();
    fs::create_dir_all(keystore_dir)?;

    let (secret_key, public_key) = SECP256K1.generate_keypair(&mut OsRng);
    let account = Account::from_uncompressed_pubkey(&public_key.serialize_uncompressed())?;

    let mut salt = [0u8; ARGON2_SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; XCHACHA_NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher_key = derive_cipher_key(password, &salt)?;
    let cipher = XChaCha20Poly1305::new(&cipher_key);
    let nonce = XNonce::from_slice(&nonce_bytes);
    let mut secret_bytes = SecretBuffer(secret_key.secret_bytes());
    let ciphertext = cipher
        .encrypt(nonce, secret_bytes.0.as_slice())
        .map_err(|_| WalletError::Decryption)?;
    secret_bytes.0.zeroize();

    let file = KeystoreFile {
        version: 1,
        id: Uuid::new_v4(),
        address: account,
        crypto: CryptoParams {
            kdf: "argon2id".into(),
            kdf_salt: hex::encode(salt),
            cipher: "xchacha20poly1305".into(),
            cipher_nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    };

    let path = keystore_file_path(keystore_dir, &account);
    fs::write(&path, serde_json::to_vec_pretty(&file)?)?;
    Ok(account)
}

/// Decrypts the secret key belonging to `account` from its keystore file.
pub fn unlock(keystore_dir: impl AsRef<Path>, account: Account, password: &str) -> Result<SecretKey> {
    let path = find_keystore_file(keystore_dir.as_ref(), account)?;
    let contents = fs::read(path)?;
    let file: KeystoreFile = serde_json::from_slice(&contents)?;

    let salt = hex::decode(&file.crypto.kdf_salt).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    let nonce_bytes =
        hex::decode(&file.crypto.cipher_nonce).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    let ciphertext =
        hex::decode(&file.crypto.ciphertext).map_err(|e| WalletError::InvalidKey(e.to_string()))?;

    let cipher_key = derive_cipher_key(password, &salt)?;
    let cipher = XChaCha20Poly1305::new(&cipher_key);
    let nonce = XNonce::from_slice(&nonce_bytes);
    let plaintext = cipher.decrypt(nonce, ciphertext.as_slice()).map_err(|_| WalletError::Decryption)?;

    if plaintext.len() != 32 {
        return Err(WalletError::InvalidKey("decrypted key is not 32 bytes".into()));
    }
    let mut secret_bytes = SecretBuffer([0u8; 32]);
    secret_bytes.0.copy_from_slice(&plaintext);
    let secret_key = SecretKey::from_slice(&secret_bytes.0).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    Ok(secret_key)
}

/// Re-derives the public key for an unlocked secret key, mostly useful in
/// tests that want to confirm a round trip without re-deriving the address.
pub fn public_key_of(secret_key: &SecretKey) -> PublicKey {
    PublicKey::from_secret_key(SECP256K1, secret_key)
}

fn keystore_file_path(keystore_dir: &Path, account: &Account) -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S%.9fZ");
    let address_hex = hex::encode(account.as_bytes());
    keystore_dir.join(format!("UTC--{timestamp}--{address_hex}.json"))
}

fn find_keystore_file(keystore_dir: &Path, account: Account) -> Result<PathBuf> {
    let entries = fs::read_dir(keystore_dir)?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let contents = fs::read(&path)?;
        let Ok(file) = serde_json::from_slice::<KeystoreFile>(&contents) else {
            continue;
        };
        if file.address == account {
            return Ok(path);
        }
    }
    Err(WalletError::AccountNotFound(account))
}
