use std::fmt;

use super::AbiError;
use crate::address::{Address, ADDRESS_LEN};

/// Transaction types that may appear as a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionRef {
    Any,
    Payment,
    KeyRegistration,
    AssetConfig,
    AssetTransfer,
    AssetFreeze,
    ApplicationCall,
}

impl TransactionRef {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionRef::Any => "txn",
            TransactionRef::Payment => "pay",
            TransactionRef::KeyRegistration => "keyreg",
            TransactionRef::AssetConfig => "acfg",
            TransactionRef::AssetTransfer => "axfer",
            TransactionRef::AssetFreeze => "afrz",
            TransactionRef::ApplicationCall => "appl",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "txn" => TransactionRef::Any,
            "pay" => TransactionRef::Payment,
            "keyreg" => TransactionRef::KeyRegistration,
            "acfg" => TransactionRef::AssetConfig,
            "axfer" => TransactionRef::AssetTransfer,
            "afrz" => TransactionRef::AssetFreeze,
            "appl" => TransactionRef::ApplicationCall,
            _ => return None,
        })
    }
}

/// The subset of ARC-4 types the vault interface needs, all fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    Address,
    /// Unsigned integer of the given bit width (8..=512, multiple of 8).
    Uint(u16),
    Bool,
    Byte,
    /// A reference to a preceding transaction in the group.
    Transaction(TransactionRef),
}

impl AbiType {
    /// Parses a canonical type name such as `uint64` or `pay`.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        let s = s.trim();
        match s {
            "address" => return Ok(AbiType::Address),
            "bool" => return Ok(AbiType::Bool),
            "byte" => return Ok(AbiType::Byte),
            _ => {}
        }
        if let Some(tx) = TransactionRef::parse(s) {
            return Ok(AbiType::Transaction(tx));
        }
        if let Some(bits) = s.strip_prefix("uint") {
            let bits: u16 = bits
                .parse()
                .map_err(|_| AbiError::UnsupportedType(s.to_string()))?;
            if bits == 0 || bits > 512 || bits % 8 != 0 {
                return Err(AbiError::UnsupportedType(s.to_string()));
            }
            return Ok(AbiType::Uint(bits));
        }
        Err(AbiError::UnsupportedType(s.to_string()))
    }

    pub fn is_transaction_ref(&self) -> bool {
        matches!(self, AbiType::Transaction(_))
    }

    /// Encoded width in bytes; `None` for transaction references.
    pub fn encoded_len(&self) -> Option<usize> {
        match self {
            AbiType::Address => Some(ADDRESS_LEN),
            AbiType::Uint(bits) => Some(usize::from(*bits) / 8),
            AbiType::Bool | AbiType::Byte => Some(1),
            AbiType::Transaction(_) => None,
        }
    }

    /// Encodes `value` at this type's fixed width.
    pub fn encode(&self, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
        match (self, value) {
            (AbiType::Address, AbiValue::Address(address)) => Ok(address.as_bytes().to_vec()),
            (AbiType::Uint(bits), AbiValue::Uint(v)) => encode_uint(*bits, *v),
            (AbiType::Bool, AbiValue::Bool(b)) => Ok(vec![if *b { 0x80 } else { 0x00 }]),
            (AbiType::Byte, AbiValue::Byte(b)) => Ok(vec![*b]),
            (AbiType::Transaction(_), _) => Err(AbiError::TypeMismatch {
                expected: "a value type".to_string(),
                found: self.to_string(),
            }),
            _ => Err(AbiError::TypeMismatch {
                expected: self.to_string(),
                found: value.kind().to_string(),
            }),
        }
    }
}

fn encode_uint(bits: u16, value: u64) -> Result<Vec<u8>, AbiError> {
    let width = usize::from(bits) / 8;
    if bits < 64 && value >> bits != 0 {
        return Err(AbiError::Overflow {
            value,
            type_name: format!("uint{}", bits),
        });
    }
    let be = value.to_be_bytes();
    let mut out = vec![0u8; width.saturating_sub(be.len())];
    out.extend_from_slice(&be[be.len().saturating_sub(width)..]);
    Ok(out)
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Address => f.write_str("address"),
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Bool => f.write_str("bool"),
            AbiType::Byte => f.write_str("byte"),
            AbiType::Transaction(tx) => f.write_str(tx.as_str()),
        }
    }
}

/// A value argument for a method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(u64),
    Bool(bool),
    Byte(u8),
}

impl AbiValue {
    fn kind(&self) -> &'static str {
        match self {
            AbiValue::Address(_) => "address",
            AbiValue::Uint(_) => "uint",
            AbiValue::Bool(_) => "bool",
            AbiValue::Byte(_) => "byte",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(AbiType::parse("address").unwrap(), AbiType::Address);
        assert_eq!(AbiType::parse("uint64").unwrap(), AbiType::Uint(64));
        assert_eq!(AbiType::parse("uint8").unwrap(), AbiType::Uint(8));
        assert_eq!(
            AbiType::parse("pay").unwrap(),
            AbiType::Transaction(TransactionRef::Payment)
        );
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        for bad in ["string", "uint7", "uint0", "uint1024", "byte[]", "(uint64,bool)"] {
            assert_eq!(
                AbiType::parse(bad),
                Err(AbiError::UnsupportedType(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_uint64_is_eight_bytes_big_endian() {
        let encoded = AbiType::Uint(64).encode(&AbiValue::Uint(10_000_000)).unwrap();
        assert_eq!(encoded, 10_000_000u64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_narrow_uint_overflow_is_an_error() {
        let err = AbiType::Uint(8).encode(&AbiValue::Uint(256)).unwrap_err();
        assert!(matches!(err, AbiError::Overflow { value: 256, .. }));
        assert_eq!(AbiType::Uint(16).encode(&AbiValue::Uint(0x0102)).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_wide_uint_is_left_padded() {
        let encoded = AbiType::Uint(128).encode(&AbiValue::Uint(1)).unwrap();
        assert_eq!(encoded.len(), 16);
        assert_eq!(encoded[15], 1);
        assert!(encoded[..15].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_address_and_bool_encoding() {
        let address = Address::new([7u8; 32]);
        assert_eq!(
            AbiType::Address.encode(&AbiValue::Address(address)).unwrap(),
            vec![7u8; 32]
        );
        assert_eq!(AbiType::Bool.encode(&AbiValue::Bool(true)).unwrap(), vec![0x80]);
        assert_eq!(AbiType::Bool.encode(&AbiValue::Bool(false)).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_mismatched_value_is_rejected() {
        let err = AbiType::Address.encode(&AbiValue::Uint(1)).unwrap_err();
        assert!(matches!(err, AbiError::TypeMismatch { .. }));
    }
}
