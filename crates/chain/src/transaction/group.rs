//! Atomic transaction groups.
//!
//! Every member of a group carries the same 32-byte group id, the hash of the
//! ordered member ids. The ledger commits all members or none.

use super::encoding::{write_value, Fields, Value};
use super::model::{Transaction, TransactionKind};
use crate::abi::{AbiMethod, TransactionRef};
use crate::errors::{ChainError, Result};
use crate::hash::sha512_256;

pub const MAX_GROUP_SIZE: usize = 16;

const GROUP_TAG: &[u8] = b"TG";

/// An ordered, id-stamped list of transactions ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionGroup {
    transactions: Vec<Transaction>,
}

impl TransactionGroup {
    /// A lone transaction. No group id is assigned.
    pub fn single(transaction: Transaction) -> Self {
        Self {
            transactions: vec![transaction],
        }
    }

    /// Stamps every transaction with the group id of the whole list.
    pub fn assemble(mut transactions: Vec<Transaction>) -> Result<Self> {
        if transactions.is_empty() {
            return Err(ChainError::InvalidGroup("group is empty".to_string()));
        }
        if transactions.len() > MAX_GROUP_SIZE {
            return Err(ChainError::InvalidGroup(format!(
                "group has {} transactions, the limit is {}",
                transactions.len(),
                MAX_GROUP_SIZE
            )));
        }
        let group_id = compute_group_id(&transactions)?;
        for txn in &mut transactions {
            txn.group = Some(group_id);
        }
        Ok(Self { transactions })
    }

    /// Builds a group for an ABI method call whose transaction arguments are
    /// `arguments`. They are placed immediately before the call, in the order
    /// the method declares them, and each must match its declared type.
    pub fn for_method_call(
        method: &AbiMethod,
        arguments: Vec<Transaction>,
        call: Transaction,
    ) -> Result<Self> {
        let refs = method.transaction_refs();
        if refs.len() != arguments.len() {
            return Err(ChainError::InvalidGroup(format!(
                "{} expects {} transaction argument(s), got {}",
                method.signature(),
                refs.len(),
                arguments.len()
            )));
        }
        for (expected, txn) in refs.iter().zip(&arguments) {
            if !matches_ref(*expected, &txn.kind) {
                return Err(ChainError::InvalidGroup(format!(
                    "{} expects a {} argument, got {}",
                    method.signature(),
                    expected.as_str(),
                    txn.kind.type_tag()
                )));
            }
        }
        if call.as_application_call().is_none() {
            return Err(ChainError::InvalidGroup(
                "method call must be an application call".to_string(),
            ));
        }
        if refs.is_empty() {
            return Ok(Self::single(call));
        }

        let mut transactions = arguments;
        transactions.push(call);
        Self::assemble(transactions)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn group_id(&self) -> Option<[u8; 32]> {
        self.transactions.first().and_then(|t| t.group)
    }

    /// Transaction ids in group order.
    pub fn ids(&self) -> Result<Vec<String>> {
        self.transactions.iter().map(Transaction::id).collect()
    }
}

fn matches_ref(expected: TransactionRef, kind: &TransactionKind) -> bool {
    match expected {
        TransactionRef::Any => true,
        TransactionRef::Payment => matches!(kind, TransactionKind::Payment(_)),
        TransactionRef::AssetConfig => matches!(kind, TransactionKind::AssetCreate(_)),
        TransactionRef::ApplicationCall => matches!(kind, TransactionKind::ApplicationCall(_)),
        TransactionRef::KeyRegistration
        | TransactionRef::AssetTransfer
        | TransactionRef::AssetFreeze => false,
    }
}

/// Hash of the member ids, computed with any existing group id cleared.
pub fn compute_group_id(transactions: &[Transaction]) -> Result<[u8; 32]> {
    let ids = transactions
        .iter()
        .map(|txn| {
            let mut ungrouped = txn.clone();
            ungrouped.group = None;
            ungrouped.raw_id().map(|id| Value::Bytes(id.to_vec()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut fields = Fields::default();
    fields.put("txlist", Value::Array(ids));
    let mut buf = Vec::new();
    write_value(&mut buf, &Value::Map(fields))?;
    Ok(sha512_256(&[GROUP_TAG, &buf]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::transaction::model::{ApplicationCall, Payment, SuggestedParams};

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee_per_byte: 0,
            min_fee: 1000,
            last_round: 10,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: [4u8; 32],
        }
    }

    fn pay(amount: u64) -> Transaction {
        Transaction::new(
            Address::new([1u8; 32]),
            &params(),
            TransactionKind::Payment(Payment {
                receiver: Address::for_application(7),
                amount,
            }),
        )
    }

    fn call() -> Transaction {
        Transaction::new(
            Address::new([1u8; 32]),
            &params(),
            TransactionKind::ApplicationCall(ApplicationCall {
                app_id: 7,
                ..Default::default()
            }),
        )
    }

    fn deposit_method() -> AbiMethod {
        AbiMethod::parse("deposit", &[("payment", "pay")], "void").unwrap()
    }

    #[test]
    fn test_assemble_stamps_shared_group_id() {
        let group = TransactionGroup::assemble(vec![pay(5), call()]).unwrap();
        let id = group.group_id().unwrap();
        assert!(group.transactions().iter().all(|t| t.group == Some(id)));
    }

    #[test]
    fn test_group_id_depends_on_order() {
        let a = compute_group_id(&[pay(5), call()]).unwrap();
        let b = compute_group_id(&[call(), pay(5)]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_group_id_ignores_previous_stamp() {
        let group = TransactionGroup::assemble(vec![pay(5), call()]).unwrap();
        let again = compute_group_id(group.transactions()).unwrap();
        assert_eq!(Some(again), group.group_id());
    }

    #[test]
    fn test_rejects_empty_and_oversized_groups() {
        assert!(TransactionGroup::assemble(vec![]).is_err());
        let many: Vec<Transaction> = (0..17).map(pay).collect();
        assert!(matches!(
            TransactionGroup::assemble(many),
            Err(ChainError::InvalidGroup(_))
        ));
    }

    #[test]
    fn test_method_call_places_payment_before_call() {
        let group = TransactionGroup::for_method_call(&deposit_method(), vec![pay(9)], call()).unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.transactions()[0].as_payment().is_some());
        assert!(group.transactions()[1].as_application_call().is_some());
    }

    #[test]
    fn test_method_call_rejects_missing_or_wrong_argument() {
        assert!(TransactionGroup::for_method_call(&deposit_method(), vec![], call()).is_err());
        assert!(TransactionGroup::for_method_call(&deposit_method(), vec![call()], call()).is_err());
    }

    #[test]
    fn test_method_without_transaction_args_is_single() {
        let withdraw = AbiMethod::parse("withdraw", &[], "void").unwrap();
        let group = TransactionGroup::for_method_call(&withdraw, vec![], call()).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.group_id(), None);
    }
}
