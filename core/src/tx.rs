//! Transactions: unsigned value transfers and their signed wire form.
//!
//! Canonical encoding is JSON with fields in declaration order; both the
//! unsigned hash and the signing digest are computed over that encoding, so
//! changing field order here is a consensus-breaking change.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::crypto::{keccak256, recover_public_key, sha256, sign_recoverable};
use crate::error::{Error, Result};
use crate::hash::Hash;

pub const REWARD_DATA: &str = "reward";

/// An unsigned value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub from: Account,
    pub to: Account,
    pub value: u64,
    pub data: String,
    pub time: u64,
}

impl UnsignedTx {
    pub fn new(from: Account, to: Account, value: u64, data: impl Into<String>, time: u64) -> Self {
        UnsignedTx {
            from,
            to,
            value,
            data: data.into(),
            time,
        }
    }

    pub fn reward(to: Account, value: u64, time: u64) -> Self {
        UnsignedTx::new(to, to, value, REWARD_DATA, time)
    }

    pub fn is_reward(&self) -> bool {
        self.data == REWARD_DATA
    }

    /// Canonical JSON encoding (field order as declared above).
    pub fn canonical_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// SHA-256 of the canonical encoding — the transaction's identity.
    pub fn hash(&self) -> Result<Hash> {
        Ok(Hash::from_bytes(sha256(&self.canonical_json()?)))
    }

    /// Keccak-256 of the canonical encoding — the digest that gets signed.
    fn signing_digest(&self) -> Result<[u8; 32]> {
        Ok(keccak256(&self.canonical_json()?))
    }

    /// Signs this transaction with `secret_key`, producing the wire form.
    pub fn sign(&self, secret_key: &secp256k1::SecretKey) -> Result<SignedTx> {
        let digest = self.signing_digest()?;
        let sig = sign_recoverable(&digest, secret_key)?;
        Ok(SignedTx {
            from: self.from,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            time: self.time,
            signature: hex::encode(sig),
        })
    }
}

/// An unsigned transaction plus its 65-byte recoverable signature, hex
/// encoded. Field order matches the wire schema in full: `from`, `to`,
/// `value`, `data`, `time`, `signature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
    pub from: Account,
    pub to: Account,
    pub value: u64,
    pub data: String,
    pub time: u64,
    pub signature: String,
}

impl SignedTx {
    pub fn new(unsigned: UnsignedTx, signature: [u8; 65]) -> Self {
        SignedTx {
            from: unsigned.from,
            to: unsigned.to,
            value: unsigned.value,
            data: unsigned.data,
            time: unsigned.time,
            signature: hex::encode(signature),
        }
    }

    pub fn unsigned(&self) -> UnsignedTx {
        UnsignedTx {
            from: self.from,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            time: self.time,
        }
    }

    pub fn is_reward(&self) -> bool {
        self.data == REWARD_DATA
    }

    /// Hash identifying this transaction — SHA-256 of the *unsigned*
    /// canonical encoding, so resubmission with a different signature over
    /// the same fields does not create a second mempool/archive entry.
    pub fn hash(&self) -> Result<Hash> {
        self.unsigned().hash()
    }

    fn signature_bytes(&self) -> Result<[u8; 65]> {
        let decoded = hex::decode(&self.signature)
            .map_err(|e| Error::Decode(format!("bad signature hex: {e}")))?;
        if decoded.len() != 65 {
            return Err(Error::Decode(format!(
                "signature must be 65 bytes, got {}",
                decoded.len()
            )));
        }
        let mut out = [0u8; 65];
        out.copy_from_slice(&decoded);
        Ok(out)
    }

    /// `true` iff recovering the public key from the signature over the
    /// unsigned canonical encoding yields an address equal to `from`.
    /// Reward transactions are not exempt — there is no bypass.
    pub fn is_authentic(&self) -> bool {
        self.try_authenticate().unwrap_or(false)
    }

    fn try_authenticate(&self) -> Result<bool> {
        let digest = keccak256(&self.unsigned().canonical_json()?);
        let sig = self.signature_bytes()?;
        let pubkey = recover_public_key(&digest, &sig)?;
        let recovered = Account::from_uncompressed_pubkey(&pubkey.serialize_uncompressed())?;
        Ok(recovered == self.from)
    }
}
