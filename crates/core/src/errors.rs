//! Core error types for AlgoSave.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer,
//! and ledger errors are mapped from [`ChainError`] so every failure keeps a
//! distinct kind.

use algosave_chain::ChainError;
use chrono::ParseError as ChronoParseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad input caught before any network call.
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Withdrawal attempted while the vault is still locked.
    #[error("Goal is locked: {0}")]
    GoalLocked(String),

    /// The node refused the transaction.
    #[error("Transaction rejected by the network: {0}")]
    ChainSubmissionFailed(String),

    /// The transaction fee did not cover the network minimum.
    #[error("Transaction fee too low: {0}")]
    FeeTooLow(String),

    /// Submitted, but not seen confirmed. The outcome is unknown.
    #[error("Transaction {txid} still pending after {rounds} rounds; check its status before retrying")]
    ConfirmationTimeout { txid: String, rounds: u64 },

    /// Sent, but the node's answer was lost before confirmation was seen.
    #[error("Transaction {txid} was sent but its outcome is unknown ({reason}); check its status before retrying")]
    OutcomeUnknown { txid: String, reason: String },

    #[error("Signing request was declined")]
    UserRejected,

    /// Deployment confirmed without yielding an application id.
    #[error("Vault deployment failed: {0}")]
    DeploymentFailed(String),

    /// An encoder or builder refused its input. Nothing was sent.
    #[error("Failed to build transaction: {0}")]
    TransactionBuild(String),

    /// Asset creation confirmed without yielding an asset id.
    #[error("Achievement asset creation failed: {0}")]
    AssetCreationFailed(String),

    #[error("Achievement already minted for goal {0}")]
    AlreadyMinted(String),

    /// Another deposit, withdrawal or mint for the same vault is running.
    #[error("Another operation is in progress for goal {0}")]
    OperationInFlight(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Stable identifier for each failure kind, suitable for a UI to switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    GoalLocked,
    ChainSubmissionFailed,
    FeeTooLow,
    ConfirmationTimeout,
    UserRejected,
    DeploymentFailed,
    TransactionBuild,
    AssetCreationFailed,
    AlreadyMinted,
    OperationInFlight,
    NotFound,
    Network,
    Database,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::GoalLocked(_) => ErrorKind::GoalLocked,
            Error::ChainSubmissionFailed(_) => ErrorKind::ChainSubmissionFailed,
            Error::FeeTooLow(_) => ErrorKind::FeeTooLow,
            Error::ConfirmationTimeout { .. } | Error::OutcomeUnknown { .. } => {
                ErrorKind::ConfirmationTimeout
            }
            Error::UserRejected => ErrorKind::UserRejected,
            Error::DeploymentFailed(_) => ErrorKind::DeploymentFailed,
            Error::TransactionBuild(_) => ErrorKind::TransactionBuild,
            Error::AssetCreationFailed(_) => ErrorKind::AssetCreationFailed,
            Error::AlreadyMinted(_) => ErrorKind::AlreadyMinted,
            Error::OperationInFlight(_) => ErrorKind::OperationInFlight,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Network(_) => ErrorKind::Network,
            Error::Database(_) => ErrorKind::Database,
            Error::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Whether issuing the same operation again is sensible.
    ///
    /// `ConfirmationTimeout` is not retryable; see [`Error::requires_repoll`].
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ChainSubmissionFailed(_)
                | Error::FeeTooLow(_)
                | Error::OperationInFlight(_)
                | Error::Network(_)
        )
    }

    /// True when the outcome of a submitted transaction is unknown.
    pub fn requires_repoll(&self) -> bool {
        self.pending_txid().is_some()
    }

    /// Id of the submitted transaction whose outcome is unknown.
    pub fn pending_txid(&self) -> Option<&str> {
        match self {
            Error::ConfirmationTimeout { txid, .. } | Error::OutcomeUnknown { txid, .. } => {
                Some(txid)
            }
            _ => None,
        }
    }

    /// Maps a failure of the submit call for `txid`.
    ///
    /// A refusal by the node, or a connection that was never made, means
    /// nothing was accepted. Anything else may have reached the node.
    pub fn from_submission(txid: &str, err: ChainError) -> Self {
        let refused = match &err {
            ChainError::Rejected(_) | ChainError::FeeTooLow(_) => true,
            ChainError::Api { status, .. } => *status < 500,
            ChainError::Http(e) => e.is_connect(),
            _ => false,
        };
        if refused {
            err.into()
        } else {
            Error::OutcomeUnknown {
                txid: txid.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Maps a failure while waiting for an accepted `txid`. Only a pool
    /// eviction is a definite outcome.
    pub fn from_confirmation(txid: &str, err: ChainError) -> Self {
        match err {
            ChainError::PoolRejected { .. } | ChainError::ConfirmationTimeout { .. } => err.into(),
            other => Error::OutcomeUnknown {
                txid: txid.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<ChainError> for Error {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Http(e) => Error::Network(e.to_string()),
            ChainError::Api { status, message } => {
                Error::Network(format!("node returned {}: {}", status, message))
            }
            ChainError::Json(e) => Error::Network(format!("unreadable node response: {}", e)),
            ChainError::NotFound(msg) => Error::NotFound(msg),
            ChainError::Rejected(msg) => Error::ChainSubmissionFailed(msg),
            ChainError::PoolRejected { txid, reason } => {
                Error::ChainSubmissionFailed(format!("{}: {}", txid, reason))
            }
            ChainError::FeeTooLow(msg) => Error::FeeTooLow(msg),
            ChainError::ConfirmationTimeout { txid, rounds } => {
                Error::ConfirmationTimeout { txid, rounds }
            }
            ChainError::UserRejected => Error::UserRejected,
            ChainError::Signer(msg) => Error::Unexpected(format!("signer failed: {}", msg)),
            ChainError::MalformedState { app_id, message } => Error::ChainSubmissionFailed(
                format!("application {} is not a compatible vault: {}", app_id, message),
            ),
            e @ (ChainError::InvalidAddress(_)
            | ChainError::InvalidArgument(_)
            | ChainError::Abi(_)
            | ChainError::Encoding(_)
            | ChainError::InvalidGroup(_)) => Error::TransactionBuild(e.to_string()),
            ChainError::Config(msg) => Error::Unexpected(format!("configuration: {}", msg)),
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl ValidationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationError::InvalidInput(message.into())
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_errors_keep_distinct_kinds() {
        let cases = vec![
            (ChainError::UserRejected, ErrorKind::UserRejected),
            (ChainError::FeeTooLow("low".into()), ErrorKind::FeeTooLow),
            (ChainError::Rejected("overspend".into()), ErrorKind::ChainSubmissionFailed),
            (
                ChainError::ConfirmationTimeout {
                    txid: "T".into(),
                    rounds: 4,
                },
                ErrorKind::ConfirmationTimeout,
            ),
            (
                ChainError::InvalidGroup("order".into()),
                ErrorKind::TransactionBuild,
            ),
            (
                ChainError::malformed_state(3, "missing key"),
                ErrorKind::ChainSubmissionFailed,
            ),
            (ChainError::api(503, "busy"), ErrorKind::Network),
            (ChainError::NotFound("app".into()), ErrorKind::NotFound),
        ];
        for (chain, kind) in cases {
            assert_eq!(Error::from(chain).kind(), kind);
        }
    }

    #[test]
    fn test_retry_policy() {
        assert!(Error::FeeTooLow("x".into()).is_retryable());
        assert!(!Error::UserRejected.is_retryable());
        let timeout = Error::ConfirmationTimeout {
            txid: "T".into(),
            rounds: 4,
        };
        assert!(!timeout.is_retryable());
        assert!(timeout.requires_repoll());
    }

    #[test]
    fn test_failures_after_submit_leave_outcome_unknown() {
        let err = Error::from_confirmation("TX9", ChainError::api(503, "busy"));
        assert_eq!(err.kind(), ErrorKind::ConfirmationTimeout);
        assert!(!err.is_retryable());
        assert!(err.requires_repoll());
        assert_eq!(err.pending_txid(), Some("TX9"));

        let err = Error::from_submission("TX9", ChainError::api(502, "bad gateway"));
        assert_eq!(err.pending_txid(), Some("TX9"));

        let err = Error::from_confirmation(
            "TX9",
            ChainError::PoolRejected {
                txid: "TX9".into(),
                reason: "overspend".into(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::ChainSubmissionFailed);
        assert!(!err.requires_repoll());
    }

    #[test]
    fn test_node_refusal_at_submit_is_definite() {
        let err = Error::from_submission("TX9", ChainError::Rejected("logic eval".into()));
        assert_eq!(err.kind(), ErrorKind::ChainSubmissionFailed);
        assert!(err.pending_txid().is_none());

        let err = Error::from_submission("TX9", ChainError::FeeTooLow("fee".into()));
        assert!(err.is_retryable());

        let err = Error::from_submission("TX9", ChainError::api(401, "bad token"));
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!err.requires_repoll());
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages: std::collections::HashSet<String> = [
            Error::GoalLocked("deadline not reached".into()),
            Error::UserRejected,
            Error::DeploymentFailed("no id".into()),
            Error::ChainSubmissionFailed("no".into()),
            Error::AlreadyMinted("g1".into()),
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        assert_eq!(messages.len(), 5);
    }
}
