//! SQLite storage implementation for on-chain goal metadata and history.

mod model;
mod repository;

pub use model::{GoalDB, GoalDepositDB, GoalWithdrawalDB, PendingSubmissionDB};
pub use repository::GoalRepository;
