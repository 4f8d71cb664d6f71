//! On-chain savings goals: models, lifecycle rules, and the engine that
//! drives vault transactions.

mod goals_lifecycle;
mod goals_model;
mod goals_service;
mod goals_traits;


pub use goals_lifecycle::{
    derive_state, ensure_can_deposit, ensure_can_withdraw, ensure_owner, validate_new_goal,
    GoalState,
};
pub use goals_model::{
    DepositHistoryEntry, EngineConfig, Goal, GoalDeposit, GoalWithdrawal, MintedAchievement,
    NewGoal, OnChainAggregate, PendingOperation, PendingSubmission, TransactionStatus,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
