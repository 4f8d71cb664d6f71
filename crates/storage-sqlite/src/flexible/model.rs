//! Database models for flexible goals.

use diesel::prelude::*;
use std::str::FromStr;

use algosave_core::flexible::{FlexibleGoal, FlexibleTransaction, FlexibleTransactionType};

use crate::utils::{parse_decimal, parse_timestamp};

/// Database model for flexible goals. Transactions live in their own table.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::flexible_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct FlexibleGoalDB {
    pub id: String,
    pub name: String,
    pub target_amount: String,
    pub deadline: String,
    pub created_at: String,
    pub monthly_income: Option<String>,
    pub monthly_spending: Option<String>,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(FlexibleGoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::flexible_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FlexibleTransactionDB {
    pub id: String,
    pub goal_id: String,
    pub transaction_type: String,
    pub amount: String,
    pub note: Option<String>,
    pub timestamp: String,
}

impl FlexibleGoalDB {
    /// Builds the domain goal with its (already loaded) transactions.
    pub fn into_domain(self, transactions: Vec<FlexibleTransaction>) -> FlexibleGoal {
        FlexibleGoal {
            target_amount: parse_decimal(&self.target_amount, "target_amount"),
            deadline: parse_timestamp(&self.deadline, "deadline"),
            created_at: parse_timestamp(&self.created_at, "created_at"),
            monthly_income: self
                .monthly_income
                .as_deref()
                .map(|s| parse_decimal(s, "monthly_income")),
            monthly_spending: self
                .monthly_spending
                .as_deref()
                .map(|s| parse_decimal(s, "monthly_spending")),
            id: self.id,
            name: self.name,
            transactions,
        }
    }
}

impl From<&FlexibleGoal> for FlexibleGoalDB {
    fn from(domain: &FlexibleGoal) -> Self {
        Self {
            id: domain.id.clone(),
            name: domain.name.clone(),
            target_amount: domain.target_amount.to_string(),
            deadline: domain.deadline.to_rfc3339(),
            created_at: domain.created_at.to_rfc3339(),
            monthly_income: domain.monthly_income.map(|d| d.to_string()),
            monthly_spending: domain.monthly_spending.map(|d| d.to_string()),
        }
    }
}

impl FlexibleTransactionDB {
    /// `None` for a row whose type is not recognised.
    pub fn into_domain(self) -> Option<FlexibleTransaction> {
        let transaction_type = match FlexibleTransactionType::from_str(&self.transaction_type) {
            Ok(kind) => kind,
            Err(e) => {
                log::error!("Skipping flexible transaction {}: {}", self.id, e);
                return None;
            }
        };
        Some(FlexibleTransaction {
            transaction_type,
            amount: parse_decimal(&self.amount, "amount"),
            timestamp: parse_timestamp(&self.timestamp, "timestamp"),
            id: self.id,
            goal_id: self.goal_id,
            note: self.note,
        })
    }
}

impl From<&FlexibleTransaction> for FlexibleTransactionDB {
    fn from(domain: &FlexibleTransaction) -> Self {
        Self {
            id: domain.id.clone(),
            goal_id: domain.goal_id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            amount: domain.amount.to_string(),
            note: domain.note.clone(),
            timestamp: domain.timestamp.to_rfc3339(),
        }
    }
}
