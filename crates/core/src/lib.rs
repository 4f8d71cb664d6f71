//! AlgoSave Core - Goal lifecycle, reconciliation and scoring.
//!
//! This crate holds the business rules for savings vaults and flexible goals.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate. Ledger access goes through the
//! `algosave-chain` crate.

pub mod achievements;
pub mod advice;
pub mod constants;
pub mod errors;
pub mod flexible;
pub mod goals;
pub mod health;
pub mod nfts;
pub mod rates;
pub mod reconciler;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
