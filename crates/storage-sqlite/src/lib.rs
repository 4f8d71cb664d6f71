//! SQLite storage implementation for AlgoSave.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `algosave-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Diesel migrations
//! - Repository implementations for goal metadata, deposit history,
//!   flexible goals and achievement NFT records
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The vault balances themselves are never stored here; they are read from the
//! ledger on every view.
//!
//! ```text
//! chain (ledger)          core (domain)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod flexible;
pub mod goals;
pub mod nfts;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use flexible::FlexibleGoalRepository;
pub use goals::GoalRepository;
pub use nfts::NftRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from algosave-core for convenience
pub use algosave_core::errors::{DatabaseError, Error, Result};
