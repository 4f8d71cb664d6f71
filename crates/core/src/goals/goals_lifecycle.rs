//! Vault lifecycle.
//!
//! ```text
//! Uninitialized -> Deploying -> Active -> (Completed | Expired) -> Withdrawn
//! ```
//!
//! The state is derived from a fresh aggregate on every read, never stored.
//! `Expired` is a label, not a lock: deposits stay legal.

use algosave_chain::{Address, VAULT_MIN_BALANCE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::goals_model::{GoalWithdrawal, NewGoal, OnChainAggregate};
use crate::constants::MIN_GOAL_NAME_CHARS;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalState {
    /// No vault deployed.
    Uninitialized,
    /// Deployed, but the contract account is not funded yet.
    Deploying,
    Active,
    Completed,
    /// Deadline passed without reaching the target.
    Expired,
    Withdrawn,
}

impl GoalState {
    pub fn can_deposit(&self) -> bool {
        matches!(self, GoalState::Active | GoalState::Expired)
    }

    pub fn can_withdraw(&self) -> bool {
        matches!(self, GoalState::Completed | GoalState::Expired)
    }
}

/// Derives the lifecycle state of a vault at `now` (unix seconds).
pub fn derive_state(
    app_id: u64,
    aggregate: &OnChainAggregate,
    withdrawal: Option<&GoalWithdrawal>,
    now: i64,
) -> GoalState {
    if app_id == 0 {
        return GoalState::Uninitialized;
    }
    if withdrawal.is_some() {
        return GoalState::Withdrawn;
    }

    let completed = aggregate.completed || aggregate.progress_reached(100);
    let expired = !completed && aggregate.deadline_passed(now);

    // Withdrawal closes the contract account. Once withdrawable, an empty
    // account is a closed one even with nothing saved.
    if aggregate.contract_balance == 0 && (completed || expired) {
        return GoalState::Withdrawn;
    }
    if aggregate.total_saved == 0 && aggregate.contract_balance < VAULT_MIN_BALANCE {
        return GoalState::Deploying;
    }
    if completed {
        GoalState::Completed
    } else if expired {
        GoalState::Expired
    } else {
        GoalState::Active
    }
}

pub fn validate_new_goal(new_goal: &NewGoal, now: DateTime<Utc>) -> Result<()> {
    if new_goal.name.trim().chars().count() < MIN_GOAL_NAME_CHARS {
        return Err(ValidationError::invalid(format!(
            "Goal name must be at least {} characters",
            MIN_GOAL_NAME_CHARS
        ))
        .into());
    }
    if new_goal.target_amount == 0 {
        return Err(ValidationError::invalid("Target amount must be positive").into());
    }
    if new_goal.deadline <= now {
        return Err(ValidationError::invalid("Deadline must be in the future").into());
    }
    Ok(())
}

pub fn ensure_can_deposit(state: GoalState, amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(ValidationError::invalid("Deposit amount must be positive").into());
    }
    match state {
        GoalState::Active | GoalState::Expired => Ok(()),
        GoalState::Completed => Err(ValidationError::invalid(
            "Goal is already completed; withdraw instead of depositing",
        )
        .into()),
        GoalState::Deploying => Err(ValidationError::invalid(
            "Vault account is not funded yet; resume funding first",
        )
        .into()),
        GoalState::Withdrawn => {
            Err(ValidationError::invalid("Vault has already been withdrawn").into())
        }
        GoalState::Uninitialized => {
            Err(ValidationError::invalid("Vault has not been deployed").into())
        }
    }
}

/// Withdrawal is legal only once the target is met or the deadline passed.
pub fn ensure_can_withdraw(state: GoalState) -> Result<()> {
    match state {
        GoalState::Completed | GoalState::Expired => Ok(()),
        GoalState::Active => Err(Error::GoalLocked(
            "Funds unlock when the target is reached or the deadline passes".to_string(),
        )),
        GoalState::Deploying => Err(Error::GoalLocked(
            "Vault account is not funded yet".to_string(),
        )),
        GoalState::Withdrawn => Err(Error::GoalLocked(
            "Vault has already been withdrawn".to_string(),
        )),
        GoalState::Uninitialized => Err(Error::GoalLocked(
            "Vault has not been deployed".to_string(),
        )),
    }
}

/// The vault only accepts calls from its owner.
pub fn ensure_owner(sender: &Address, aggregate: &OnChainAggregate) -> Result<()> {
    if !aggregate.owner.is_zero() && aggregate.owner != *sender {
        return Err(ValidationError::invalid(format!(
            "Only the vault owner {} can operate this goal",
            aggregate.owner
        ))
        .into());
    }
    Ok(())
}
