//! Flexible savings goals, tracked only in the local store.
//!
//! Unlike vaults, withdrawals are always allowed while the balance covers
//! them, and completion can revert.

mod flexible_model;
mod flexible_prediction;
mod flexible_service;
mod flexible_traits;

#[cfg(test)]
mod flexible_service_tests;

pub use flexible_model::{
    CapacityStatus, FinancialsUpdate, FlexibleGoal, FlexibleGoalSummary, FlexibleTransaction,
    FlexibleTransactionType, NewFlexibleGoal, PredictionStatus, SavingsCapacity,
    SavingsPrediction,
};
pub use flexible_prediction::{predict, weeks_left};
pub use flexible_service::FlexibleGoalService;
pub use flexible_traits::{FlexibleGoalRepositoryTrait, FlexibleGoalServiceTrait};
