//! SQLite storage implementation for flexible goals.

mod model;
mod repository;

pub use model::{FlexibleGoalDB, FlexibleTransactionDB};
pub use repository::FlexibleGoalRepository;
