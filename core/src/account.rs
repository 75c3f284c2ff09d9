//! Account addresses: 20-byte values derived from a secp256k1 public key.
//!
//! Text form is EIP-55 mixed-case hex with a `0x` prefix — the checksum is
//! encoded in the capitalisation of the hex digits, not in extra bytes, so
//! parsing never needs to validate it (a lowercase or all-uppercase address
//! decodes identically).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::keccak256;
use crate::error::{Error, Result};

/// A 20-byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Account(pub [u8; 20]);

impl Account {
    pub const ZERO: Account = Account([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Account(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derives the address from an uncompressed secp256k1 public key
    /// (65 bytes, leading `0x04` tag included). Takes the low-order 20
    /// bytes of the Keccak-256 hash of the 64 coordinate bytes.
    pub fn from_uncompressed_pubkey(pubkey: &[u8]) -> Result<Self> {
        if pubkey.len() != 65 || pubkey[0] != 0x04 {
            return Err(Error::Decode(
                "expected 65-byte uncompressed public key".into(),
            ));
        }
        let digest = keccak256(&pubkey[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Ok(Account(bytes))
    }

    /// EIP-55 checksummed hex representation, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        let hex_addr = hex::encode(self.0);
        let hash = keccak256(hex_addr.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in hex_addr.chars().enumerate() {
            if c.is_ascii_digit() {
                out.push(c);
                continue;
            }
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parses `0x`-prefixed hex, case-insensitively (the checksum is not
    /// re-validated on read, matching the fallback most wallets use).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(s).map_err(|e| Error::Decode(format!("bad address hex: {e}")))?;
        if decoded.len() != 20 {
            return Err(Error::Decode(format!(
                "address must be 20 bytes, got {}",
                decoded.len()
            )));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        Ok(Account(bytes))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Account {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Account::from_hex(s)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

struct AccountVisitor;

impl<'de> Visitor<'de> for AccountVisitor {
    type Value = Account;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0x-prefixed 40-character hex address")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Account, E>
    where
        E: de::Error,
    {
        Account::from_hex(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AccountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_round_trip() {
        let a = Account([0xABu8; 20]);
        let text = a.to_checksum();
        assert!(text.starts_with("0x"));
        assert_eq!(Account::from_hex(&text).unwrap(), a);
    }

    #[test]
    fn checksum_mixes_case() {
        // A real EIP-55 vector: an address of all-zero bytes has no hex
        // letters to case, but a mixed-byte address should not come back
        // as either all-lower or all-upper once checksummed.
        let a = Account([0x5a, 0xAE, 0xb6, 0x05, 0x3F, 0x3E, 0x94, 0xC9, 0xb9, 0xA0, 0x9f, 0x33,
            0x66, 0x94, 0x35, 0xE7, 0xEf, 0x1B, 0xeA, 0xed]);
        let text = a.to_checksum();
        let lower = text.to_ascii_lowercase();
        let upper = text.to_ascii_uppercase();
        assert_ne!(text, lower);
        assert_ne!(text, upper);
    }

    #[test]
    fn parses_lowercase_and_uppercase() {
        let a = Account([0x11u8; 20]);
        let lower = format!("0x{}", hex::encode(a.0));
        let upper = lower.to_ascii_uppercase();
        assert_eq!(Account::from_hex(&lower).unwrap(), a);
        assert_eq!(Account::from_hex(&upper).unwrap(), a);
    }
}
