//! Canonical MessagePack encoding.
//!
//! The ledger hashes the exact bytes it receives, so every node must agree
//! on one encoding: maps with keys sorted bytewise, integers in their
//! smallest form, and zero-valued fields left out entirely.

use std::collections::BTreeMap;
use std::fmt::Display;

use data_encoding::BASE32_NOPAD;
use rmp::encode;

use super::model::{AssetParams, StateSchema, Transaction, TransactionKind};
use crate::address::Address;
use crate::errors::{ChainError, Result};
use crate::hash::sha512_256;

/// Domain separation prefix for transaction ids.
pub const TXN_TAG: &[u8] = b"TX";

/// Bytes a signature adds to an encoded transaction; fees are charged on the
/// signed size.
pub const SIGNATURE_OVERHEAD: u64 = 75;

#[derive(Debug, Clone)]
pub(crate) enum Value {
    Uint(u64),
    Bytes(Vec<u8>),
    Str(String),
    Bool(bool),
    Array(Vec<Value>),
    Map(Fields),
}

impl Value {
    fn is_empty(&self) -> bool {
        match self {
            Value::Uint(v) => *v == 0,
            Value::Bytes(b) => b.is_empty(),
            Value::Str(s) => s.is_empty(),
            Value::Bool(b) => !*b,
            Value::Array(items) => items.is_empty(),
            Value::Map(fields) => fields.0.is_empty(),
        }
    }
}

/// A map that drops empty values on insert and iterates in key order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Fields(BTreeMap<&'static str, Value>);

impl Fields {
    pub(crate) fn put(&mut self, key: &'static str, value: Value) {
        if !value.is_empty() {
            self.0.insert(key, value);
        }
    }

    fn put_address(&mut self, key: &'static str, address: Option<&Address>) {
        if let Some(address) = address.filter(|a| !a.is_zero()) {
            self.0.insert(key, Value::Bytes(address.as_bytes().to_vec()));
        }
    }
}

fn encoding_error(e: impl Display) -> ChainError {
    ChainError::Encoding(e.to_string())
}

fn len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ChainError::Encoding(format!("length {} exceeds u32", len)))
}

pub(crate) fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Uint(v) => {
            encode::write_uint(buf, *v).map_err(encoding_error)?;
        }
        Value::Bytes(b) => encode::write_bin(buf, b).map_err(encoding_error)?,
        Value::Str(s) => encode::write_str(buf, s).map_err(encoding_error)?,
        Value::Bool(b) => encode::write_bool(buf, *b).map_err(encoding_error)?,
        Value::Array(items) => {
            encode::write_array_len(buf, len_u32(items.len())?).map_err(encoding_error)?;
            for item in items {
                write_value(buf, item)?;
            }
        }
        Value::Map(fields) => {
            encode::write_map_len(buf, len_u32(fields.0.len())?).map_err(encoding_error)?;
            for (key, item) in &fields.0 {
                encode::write_str(buf, key).map_err(encoding_error)?;
                write_value(buf, item)?;
            }
        }
    }
    Ok(())
}

fn schema_fields(schema: &StateSchema) -> Value {
    let mut fields = Fields::default();
    fields.put("nbs", Value::Uint(schema.num_byte_slices));
    fields.put("nui", Value::Uint(schema.num_uints));
    Value::Map(fields)
}

fn asset_fields(params: &AssetParams) -> Value {
    let mut fields = Fields::default();
    fields.put("an", Value::Str(params.asset_name.clone()));
    fields.put("au", Value::Str(params.url.clone()));
    fields.put_address("c", params.clawback.as_ref());
    fields.put("dc", Value::Uint(u64::from(params.decimals)));
    fields.put("df", Value::Bool(params.default_frozen));
    fields.put_address("f", params.freeze.as_ref());
    fields.put_address("m", params.manager.as_ref());
    fields.put_address("r", params.reserve.as_ref());
    fields.put("t", Value::Uint(params.total));
    fields.put("un", Value::Str(params.unit_name.clone()));
    Value::Map(fields)
}

impl Transaction {
    pub(crate) fn to_fields(&self) -> Fields {
        let mut fields = Fields::default();
        fields.put("fee", Value::Uint(self.fee));
        fields.put("fv", Value::Uint(self.first_valid));
        fields.put("gen", Value::Str(self.genesis_id.clone()));
        fields.put("gh", Value::Bytes(self.genesis_hash.to_vec()));
        if let Some(group) = self.group {
            fields.put("grp", Value::Bytes(group.to_vec()));
        }
        fields.put("lv", Value::Uint(self.last_valid));
        fields.put("note", Value::Bytes(self.note.clone()));
        fields.put_address("snd", Some(&self.sender));
        fields.put("type", Value::Str(self.kind.type_tag().to_string()));

        match &self.kind {
            TransactionKind::Payment(payment) => {
                fields.put("amt", Value::Uint(payment.amount));
                fields.put_address("rcv", Some(&payment.receiver));
            }
            TransactionKind::ApplicationCall(call) => {
                fields.put(
                    "apaa",
                    Value::Array(call.app_args.iter().cloned().map(Value::Bytes).collect()),
                );
                fields.put("apan", Value::Uint(call.on_complete.code()));
                fields.put("apap", Value::Bytes(call.approval_program.clone()));
                if let Some(schema) = &call.global_schema {
                    fields.put("apgs", schema_fields(schema));
                }
                fields.put("apid", Value::Uint(call.app_id));
                if let Some(schema) = &call.local_schema {
                    fields.put("apls", schema_fields(schema));
                }
                fields.put("apsu", Value::Bytes(call.clear_program.clone()));
            }
            TransactionKind::AssetCreate(params) => {
                fields.put("apar", asset_fields(params));
            }
        }
        fields
    }

    /// Canonical MessagePack encoding of the unsigned transaction.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(256);
        write_value(&mut buf, &Value::Map(self.to_fields()))?;
        Ok(buf)
    }

    /// SHA-512/256 of the tagged encoding; the group hash is built from these.
    pub fn raw_id(&self) -> Result<[u8; 32]> {
        let encoded = self.encode()?;
        Ok(sha512_256(&[TXN_TAG, &encoded]))
    }

    /// The 52-character transaction id.
    pub fn id(&self) -> Result<String> {
        Ok(BASE32_NOPAD.encode(&self.raw_id()?))
    }

    /// Sets `fee = max(min_fee, fee_per_byte * signed_size)`.
    pub fn with_suggested_fee(mut self, fee_per_byte: u64, min_fee: u64) -> Result<Self> {
        let size = self.encode()?.len() as u64 + SIGNATURE_OVERHEAD;
        self.fee = fee_per_byte.saturating_mul(size).max(min_fee);
        Ok(self)
    }

    pub fn with_flat_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }
}

/// Wraps a transaction and its ed25519 signature in the signed envelope the
/// node accepts.
pub fn encode_signed(txn: &Transaction, signature: &[u8; 64]) -> Result<Vec<u8>> {
    let mut envelope = Fields::default();
    envelope.put("sig", Value::Bytes(signature.to_vec()));
    envelope.put("txn", Value::Map(txn.to_fields()));
    let mut buf = Vec::with_capacity(320);
    write_value(&mut buf, &Value::Map(envelope))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::model::{ApplicationCall, Payment, SuggestedParams};

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee_per_byte: 0,
            min_fee: 1000,
            last_round: 5000,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: [3u8; 32],
        }
    }

    fn payment(amount: u64) -> Transaction {
        Transaction::new(
            Address::new([1u8; 32]),
            &params(),
            TransactionKind::Payment(Payment {
                receiver: Address::new([2u8; 32]),
                amount,
            }),
        )
        .with_flat_fee(1000)
    }

    fn keys(txn: &Transaction) -> Vec<&'static str> {
        txn.to_fields().0.keys().copied().collect()
    }

    #[test]
    fn test_canonical_bytes_for_small_map() {
        let mut fields = Fields::default();
        fields.put("b", Value::Str("x".to_string()));
        fields.put("a", Value::Uint(1));
        fields.put("c", Value::Bool(false));
        let mut buf = Vec::new();
        write_value(&mut buf, &Value::Map(fields)).unwrap();
        assert_eq!(buf, vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0xa1, b'x']);
    }

    #[test]
    fn test_payment_keys_are_sorted_and_empty_fields_omitted() {
        assert_eq!(
            keys(&payment(250_000)),
            vec!["amt", "fee", "fv", "gen", "gh", "lv", "rcv", "snd", "type"]
        );
    }

    #[test]
    fn test_zero_amount_is_omitted() {
        assert!(!keys(&payment(0)).contains(&"amt"));
    }

    #[test]
    fn test_id_is_stable_and_changes_with_content() {
        let a = payment(1).id().unwrap();
        assert_eq!(a.len(), 52);
        assert_eq!(a, payment(1).id().unwrap());
        assert_ne!(a, payment(2).id().unwrap());
    }

    #[test]
    fn test_suggested_fee_respects_minimum() {
        let txn = payment(1).with_suggested_fee(0, 1000).unwrap();
        assert_eq!(txn.fee, 1000);

        let txn = payment(1).with_suggested_fee(10, 1000).unwrap();
        let size = payment(1).with_flat_fee(0).encode().unwrap().len() as u64;
        assert!(txn.fee >= 10 * (size + SIGNATURE_OVERHEAD));
    }

    #[test]
    fn test_application_call_omits_noop_and_zero_app_id() {
        let txn = Transaction::new(
            Address::new([1u8; 32]),
            &params(),
            TransactionKind::ApplicationCall(ApplicationCall {
                app_id: 0,
                app_args: vec![vec![0xb7, 0x35, 0x5f, 0xd1]],
                ..Default::default()
            }),
        );
        let fields = txn.to_fields();
        assert!(!fields.0.contains_key("apid"));
        assert!(!fields.0.contains_key("apan"));
        assert!(fields.0.contains_key("apaa"));
    }

    #[test]
    fn test_signed_envelope_has_sig_then_txn() {
        let signed = encode_signed(&payment(5), &[9u8; 64]).unwrap();
        assert_eq!(&signed[..5], &[0x82, 0xa3, b's', b'i', b'g']);
        // bin8 marker, 64-byte length
        assert_eq!(&signed[5..7], &[0xc4, 64]);
    }
}
