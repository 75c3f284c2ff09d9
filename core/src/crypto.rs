//! Hash primitives and secp256k1 ECDSA sign/recover helpers.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use sha2::{Digest as Sha2Digest, Sha256};
use sha3::{Digest as Sha3Digest, Keccak256};

use crate::error::{Error, Result};

/// SHA-256 digest, used for transaction/block content hashing.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Keccak-256 digest, used for address derivation and transaction signing.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// 65-byte recoverable ECDSA signature: `r (32) || s (32) || v (1)`, where
/// `v` is the raw secp256k1 recovery id (0 or 1).
pub fn sign_recoverable(message_hash: &[u8; 32], secret_key: &SecretKey) -> Result<[u8; 65]> {
    let message = Message::from_digest(*message_hash);
    let sig = SECP256K1.sign_ecdsa_recoverable(&message, secret_key);
    let (recovery_id, compact) = sig.serialize_compact();
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&compact);
    out[64] = recovery_id.to_i32() as u8;
    Ok(out)
}

/// Recovers the uncompressed public key that produced `signature` over
/// `message_hash`.
pub fn recover_public_key(message_hash: &[u8; 32], signature: &[u8; 65]) -> Result<PublicKey> {
    let message = Message::from_digest(*message_hash);
    let recovery_id = RecoveryId::from_i32(signature[64] as i32)
        .map_err(|e| Error::Decode(format!("bad recovery id: {e}")))?;
    let sig = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|e| Error::Decode(format!("bad signature: {e}")))?;
    SECP256K1
        .recover_ecdsa(&message, &sig)
        .map_err(|e| Error::Validation(format!("signature recovery failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sign_and_recover_round_trip() {
        let (sk, pk) = SECP256K1.generate_keypair(&mut OsRng);
        let msg = keccak256(b"hello obscura");
        let sig = sign_recoverable(&msg, &sk).unwrap();
        let recovered = recover_public_key(&msg, &sig).unwrap();
        assert_eq!(recovered, pk);
    }

    #[test]
    fn tampered_message_fails_to_recover_same_key() {
        let (sk, pk) = SECP256K1.generate_keypair(&mut OsRng);
        let msg = keccak256(b"original");
        let sig = sign_recoverable(&msg, &sk).unwrap();
        let other_msg = keccak256(b"tampered");
        let recovered = recover_public_key(&other_msg, &sig).unwrap();
        assert_ne!(recovered, pk);
    }
}
