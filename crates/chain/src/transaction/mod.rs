//! Unsigned transactions, their canonical encoding, and atomic groups.

mod encoding;
mod group;
mod model;

pub use encoding::{encode_signed, SIGNATURE_OVERHEAD, TXN_TAG};
pub use group::{compute_group_id, TransactionGroup, MAX_GROUP_SIZE};
pub use model::{
    ApplicationCall, AssetParams, OnComplete, Payment, StateSchema, SuggestedParams, Transaction,
    TransactionKind, VALIDITY_WINDOW,
};
