//! Error types and retry classification for ledger access.
//!
//! This module provides:
//! - [`ChainError`]: The error enum for every encoding, building and node operation
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

use crate::abi::AbiError;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur while encoding, building, signing or submitting
/// transactions, or while reading ledger state.
#[derive(Error, Debug)]
pub enum ChainError {
    /// HTTP transport error (connection refused, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected error response from the node.
    #[error("Node API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The requested application, account or transaction does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The node refused the transaction (logic rejection, overspend, etc.).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The node refused the transaction because its fee does not cover the
    /// minimum (including fees of inner transactions).
    #[error("Transaction fee too low: {0}")]
    FeeTooLow(String),

    /// The transaction was accepted and later evicted from the pool.
    #[error("Transaction {txid} was removed from the pool: {reason}")]
    PoolRejected { txid: String, reason: String },

    /// The transaction was not seen confirmed within the round budget.
    #[error("Transaction {txid} not confirmed after {rounds} rounds")]
    ConfirmationTimeout { txid: String, rounds: u64 },

    /// The signing collaborator declined to sign.
    #[error("Signing request rejected by user")]
    UserRejected,

    /// The signing collaborator failed for another reason.
    #[error("Signer error: {0}")]
    Signer(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A builder input the protocol cannot represent (zero amount, oversized
    /// field).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ABI encoding failed: {0}")]
    Abi(#[from] AbiError),

    #[error("Transaction encoding failed: {0}")]
    Encoding(String),

    /// A transaction group violates size or ordering rules.
    #[error("Invalid transaction group: {0}")]
    InvalidGroup(String),

    /// The application's global state does not match the vault schema.
    #[error("Malformed contract state for application {app_id}: {message}")]
    MalformedState { app_id: u64, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChainError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed state error
    pub fn malformed_state(app_id: u64, message: impl Into<String>) -> Self {
        Self::MalformedState {
            app_id,
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use algosave_chain::errors::{ChainError, RetryClass};
    ///
    /// let error = ChainError::FeeTooLow("fee 1000 below 2000".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Retry);
    ///
    /// let error = ChainError::ConfirmationTimeout { txid: "TX".to_string(), rounds: 4 };
    /// assert_eq!(error.retry_class(), RetryClass::RepollState);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transient - build and submit again
            Self::Http(_) | Self::FeeTooLow(_) => RetryClass::Retry,
            Self::Api { status, .. } if *status >= 500 => RetryClass::Retry,

            // Unknown outcome - never resubmit blindly
            Self::ConfirmationTimeout { .. } => RetryClass::RepollState,

            // Terminal
            Self::Json(_)
            | Self::Api { .. }
            | Self::NotFound(_)
            | Self::Rejected(_)
            | Self::PoolRejected { .. }
            | Self::UserRejected
            | Self::Signer(_)
            | Self::InvalidAddress(_)
            | Self::InvalidArgument(_)
            | Self::Abi(_)
            | Self::Encoding(_)
            | Self::InvalidGroup(_)
            | Self::MalformedState { .. }
            | Self::Config(_) => RetryClass::Never,
        }
    }
}
