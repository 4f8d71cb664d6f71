//! Ledger account addresses.
//!
//! An address is a 32-byte public key. Its text form is the unpadded base32
//! encoding of the key followed by the last four bytes of its SHA-512/256
//! digest, which gives the familiar 58-character string.

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::ChainError;
use crate::hash::sha512_256;

/// Length of a raw address (public key) in bytes.
pub const ADDRESS_LEN: usize = 32;

const CHECKSUM_LEN: usize = 4;
const APP_ID_PREFIX: &[u8] = b"appID";

/// A 32-byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a raw 32-byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChainError> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            ChainError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// The escrow account controlled by an application.
    pub fn for_application(app_id: u64) -> Self {
        Self(sha512_256(&[APP_ID_PREFIX, &app_id.to_be_bytes()]))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = sha512_256(&[&self.0]);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[ADDRESS_LEN - CHECKSUM_LEN..]);
        checksum
    }
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = BASE32_NOPAD
            .decode(s.trim().as_bytes())
            .map_err(|e| ChainError::InvalidAddress(format!("{}: {}", s, e)))?;
        if decoded.len() != ADDRESS_LEN + CHECKSUM_LEN {
            return Err(ChainError::InvalidAddress(format!(
                "{}: decoded length {} is not {}",
                s,
                decoded.len(),
                ADDRESS_LEN + CHECKSUM_LEN
            )));
        }
        let address = Address::from_slice(&decoded[..ADDRESS_LEN])?;
        if address.checksum()[..] != decoded[ADDRESS_LEN..] {
            return Err(ChainError::InvalidAddress(format!("{}: checksum mismatch", s)));
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::with_capacity(ADDRESS_LEN + CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&buf))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";

    #[test]
    fn test_zero_address_text_form() {
        assert_eq!(Address::ZERO.to_string(), ZERO_ADDRESS);
        assert_eq!(ZERO_ADDRESS.parse::<Address>().unwrap(), Address::ZERO);
    }

    #[test]
    fn test_sequential_key_round_trip() {
        let mut raw = [0u8; 32];
        for (i, b) in raw.iter_mut().enumerate() {
            *b = i as u8;
        }
        let address = Address::new(raw);
        let text = address.to_string();
        assert_eq!(
            text,
            "AAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYP7MUPJQE"
        );
        assert_eq!(text.len(), 58);
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_application_address() {
        assert_eq!(
            Address::for_application(1).to_string(),
            "WCS6TVPJRBSARHLN2326LRU5BYVJZUKI2VJ53CAWKYYHDE455ZGKANWMGM"
        );
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let corrupted = ZERO_ADDRESS.replace("Y5HFKQ", "Y5HFKA");
        let err = corrupted.parse::<Address>().unwrap_err();
        assert!(matches!(err, ChainError::InvalidAddress(_)));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!("AAAA".parse::<Address>().is_err());
        assert!(Address::from_slice(&[1u8; 31]).is_err());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&Address::ZERO).unwrap();
        assert_eq!(json, format!("\"{}\"", ZERO_ADDRESS));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Address::ZERO);
    }
}
