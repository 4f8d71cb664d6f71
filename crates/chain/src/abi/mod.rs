//! ARC-4 method encoding.
//!
//! A method is identified on-chain by a 4-byte selector: the first four bytes
//! of the SHA-512/256 digest of its canonical signature, e.g.
//! `deposit(pay)void`. Each value argument is encoded at a fixed width and
//! passed as its own application argument after the selector. Transaction
//! reference arguments (`pay`, `txn`, ...) are not encoded at all; they are the
//! transactions placed immediately before the call in the same group.

mod method;
mod types;

pub use method::{AbiArg, AbiMethod, MethodCall, MAX_APP_ARGS};
pub use types::{AbiType, AbiValue, TransactionRef};

use thiserror::Error;

/// Errors raised while building a method call. None of these ever reach the
/// network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("Argument count mismatch for {method}: expected {expected}, got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Method {method} has {count} encoded arguments, the limit is {limit}")]
    TooManyArguments {
        method: String,
        count: usize,
        limit: usize,
    },

    #[error("Value {value} does not fit in {type_name}")]
    Overflow { value: u64, type_name: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}
