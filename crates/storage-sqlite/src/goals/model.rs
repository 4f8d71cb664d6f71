//! Database models for goals.

use diesel::prelude::*;

use algosave_core::errors::Error;
use algosave_core::goals::{Goal, GoalDeposit, GoalWithdrawal, PendingOperation, PendingSubmission};
use std::str::FromStr;

use crate::utils::{from_db_u64, parse_timestamp, to_db_u64};

/// Database model for goals
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub app_id: i64,
    pub name: String,
    pub created_at: String,
}

/// Database model for confirmed deposits
#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::goal_deposits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDepositDB {
    pub id: String,
    pub goal_id: String,
    pub amount: i64,
    pub transaction_id: String,
    pub timestamp: String,
}

/// Database model for the single withdrawal of a goal
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_withdrawals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalWithdrawalDB {
    pub goal_id: String,
    pub amount: i64,
    pub transaction_id: String,
    pub timestamp: String,
}

/// Database model for a submission whose outcome is unresolved
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::pending_submissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PendingSubmissionDB {
    pub transaction_id: String,
    pub goal_id: String,
    pub operation: String,
    pub amount: i64,
    pub target_amount: i64,
    pub last_valid: i64,
    pub submitted_at: String,
}

// Conversion to domain models
impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            app_id: from_db_u64(db.app_id, "app_id"),
            created_at: parse_timestamp(&db.created_at, "created_at"),
            id: db.id,
            name: db.name,
        }
    }
}

impl From<GoalDepositDB> for GoalDeposit {
    fn from(db: GoalDepositDB) -> Self {
        Self {
            amount: from_db_u64(db.amount, "amount"),
            timestamp: parse_timestamp(&db.timestamp, "timestamp"),
            id: db.id,
            goal_id: db.goal_id,
            transaction_id: db.transaction_id,
        }
    }
}

impl From<GoalWithdrawalDB> for GoalWithdrawal {
    fn from(db: GoalWithdrawalDB) -> Self {
        Self {
            amount: from_db_u64(db.amount, "amount"),
            timestamp: parse_timestamp(&db.timestamp, "timestamp"),
            goal_id: db.goal_id,
            transaction_id: db.transaction_id,
        }
    }
}

impl TryFrom<PendingSubmissionDB> for PendingSubmission {
    type Error = Error;

    fn try_from(db: PendingSubmissionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            operation: PendingOperation::from_str(&db.operation)?,
            amount: from_db_u64(db.amount, "amount"),
            target_amount: from_db_u64(db.target_amount, "target_amount"),
            last_valid: from_db_u64(db.last_valid, "last_valid"),
            submitted_at: parse_timestamp(&db.submitted_at, "submitted_at"),
            transaction_id: db.transaction_id,
            goal_id: db.goal_id,
        })
    }
}

// Conversion from domain models
impl TryFrom<Goal> for GoalDB {
    type Error = Error;

    fn try_from(domain: Goal) -> Result<Self, Self::Error> {
        Ok(Self {
            app_id: to_db_u64(domain.app_id, "app_id")?,
            created_at: domain.created_at.to_rfc3339(),
            id: domain.id,
            name: domain.name,
        })
    }
}

impl TryFrom<GoalDeposit> for GoalDepositDB {
    type Error = Error;

    fn try_from(domain: GoalDeposit) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: to_db_u64(domain.amount, "amount")?,
            timestamp: domain.timestamp.to_rfc3339(),
            id: domain.id,
            goal_id: domain.goal_id,
            transaction_id: domain.transaction_id,
        })
    }
}

impl TryFrom<GoalWithdrawal> for GoalWithdrawalDB {
    type Error = Error;

    fn try_from(domain: GoalWithdrawal) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: to_db_u64(domain.amount, "amount")?,
            timestamp: domain.timestamp.to_rfc3339(),
            goal_id: domain.goal_id,
            transaction_id: domain.transaction_id,
        })
    }
}

impl TryFrom<PendingSubmission> for PendingSubmissionDB {
    type Error = Error;

    fn try_from(domain: PendingSubmission) -> Result<Self, Self::Error> {
        Ok(Self {
            operation: domain.operation.as_str().to_string(),
            amount: to_db_u64(domain.amount, "amount")?,
            target_amount: to_db_u64(domain.target_amount, "target_amount")?,
            last_valid: to_db_u64(domain.last_valid, "last_valid")?,
            submitted_at: domain.submitted_at.to_rfc3339(),
            transaction_id: domain.transaction_id,
            goal_id: domain.goal_id,
        })
    }
}
