//! Ledger plumbing for AlgoSave vaults.
//!
//! Encodes ARC-4 method calls, builds and groups the transactions for each
//! vault operation, and talks to an algod node. Nothing in this crate keeps
//! state between calls.

pub mod abi;
pub mod address;
pub mod builder;
pub mod client;
pub mod config;
pub mod errors;
pub mod hash;
pub mod signer;
pub mod transaction;
pub mod vault;

pub use address::Address;
pub use builder::{AchievementMint, VaultTransactionBuilder};
pub use client::{await_confirmation, AlgodClient, ChainClient, PendingTransaction};
pub use config::AlgodConfig;
pub use errors::{ChainError, Result, RetryClass};
pub use signer::{sign_group, TransactionSigner};
pub use transaction::{SuggestedParams, Transaction, TransactionGroup};
pub use vault::{read_vault_state, VaultMethod, VaultState, VAULT_MIN_BALANCE};
