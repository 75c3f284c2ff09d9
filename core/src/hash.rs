//! 32-byte content hash, the identifier used for transactions and blocks.
//!
//! Text form is lowercase hex, 64 characters, no prefix. The same type also
//! carries the sole proof-of-work rule: [`Hash::is_valid`].

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A fixed 32-byte digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `true` iff every byte is zero.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The sole proof-of-work rule: the first three bytes are `0x00` and the
    /// fourth byte is non-zero (25th hex nibble non-zero).
    pub fn is_valid(&self) -> bool {
        crate::pow::hash_is_valid(self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let decoded = hex::decode(s).map_err(|e| Error::Decode(format!("bad hash hex: {e}")))?;
        if decoded.len() != 32 {
            return Err(Error::Decode(format!(
                "hash must be 32 bytes, got {}",
                decoded.len()
            )));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Hash(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

struct HashVisitor;

impl<'de> Visitor<'de> for HashVisitor {
    type Value = Hash;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-character lowercase hex string")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Hash, E>
    where
        E: de::Error,
    {
        Hash::from_hex(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(HashVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_hash_check() {
        let mut bytes = [0u8; 32];
        let decoded = hex::decode("00000028d46b7c1e8d5b5b696c5acd80cac95e6014bc9eec62f2a0a6625501")
            .unwrap();
        bytes[..decoded.len()].copy_from_slice(&decoded);
        assert!(Hash(bytes).is_valid());
    }

    #[test]
    fn invalid_hash_check() {
        let mut bytes = [0u8; 32];
        let decoded = hex::decode("005d28").unwrap();
        bytes[..decoded.len()].copy_from_slice(&decoded);
        assert!(!Hash(bytes).is_valid());
    }

    #[test]
    fn empty_hash() {
        assert!(Hash::ZERO.is_empty());
        assert!(!Hash([1u8; 32]).is_empty());
    }

    #[test]
    fn hex_round_trip() {
        let h = Hash([7u8; 32]);
        let s = h.to_hex();
        assert_eq!(Hash::from_hex(&s).unwrap(), h);
    }

    #[test]
    fn json_round_trip() {
        let h = Hash([9u8; 32]);
        let json = serde_json::to_string(&h).unwrap();
        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
