//! Flexible (off-chain) goal models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlexibleTransactionType {
    Deposit,
    Withdrawal,
}

impl FlexibleTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlexibleTransactionType::Deposit => "DEPOSIT",
            FlexibleTransactionType::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl std::str::FromStr for FlexibleTransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(FlexibleTransactionType::Deposit),
            "WITHDRAWAL" => Ok(FlexibleTransactionType::Withdrawal),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleTransaction {
    pub id: String,
    pub goal_id: String,
    pub transaction_type: FlexibleTransactionType,
    /// Always positive; the type gives the sign.
    pub amount: Decimal,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl FlexibleTransaction {
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            FlexibleTransactionType::Deposit => self.amount,
            FlexibleTransactionType::Withdrawal => -self.amount,
        }
    }
}

/// A savings goal tracked only in the local store.
///
/// The balance is never stored: it is the signed sum of `transactions`,
/// recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleGoal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Advisory only.
    pub monthly_income: Option<Decimal>,
    /// Advisory only.
    pub monthly_spending: Option<Decimal>,
    /// Oldest first.
    pub transactions: Vec<FlexibleTransaction>,
}

impl FlexibleGoal {
    pub fn current_balance(&self) -> Decimal {
        self.transactions.iter().map(|t| t.signed_amount()).sum()
    }

    /// Re-derived on every call, so it reverts after a withdrawal below target.
    pub fn goal_completed(&self) -> bool {
        self.current_balance() >= self.target_amount
    }

    pub fn total_deposited(&self) -> Decimal {
        self.deposits().map(|t| t.amount).sum()
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits().count()
    }

    fn deposits(&self) -> impl Iterator<Item = &FlexibleTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.transaction_type == FlexibleTransactionType::Deposit)
    }
}

/// A flexible goal with its derived figures, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleGoalSummary {
    #[serde(flatten)]
    pub goal: FlexibleGoal,
    pub current_balance: Decimal,
    pub goal_completed: bool,
}

impl From<FlexibleGoal> for FlexibleGoalSummary {
    fn from(goal: FlexibleGoal) -> Self {
        Self {
            current_balance: goal.current_balance(),
            goal_completed: goal.goal_completed(),
            goal,
        }
    }
}

/// Input model for creating a new flexible goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlexibleGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: DateTime<Utc>,
    pub monthly_income: Option<Decimal>,
    pub monthly_spending: Option<Decimal>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsUpdate {
    pub monthly_income: Option<Decimal>,
    pub monthly_spending: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionStatus {
    Completed,
    /// Nothing deposited yet, so there is no rate to project.
    NotStarted,
    OnTrack,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityStatus {
    WithinCapacity,
    BelowRequired,
    SpendingExceedsIncome,
}

/// What the reported income and spending leave for saving each month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsCapacity {
    pub monthly_capacity: Decimal,
    /// Share of income left over, in whole percent.
    pub savings_percent: Decimal,
    pub status: CapacityStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPrediction {
    /// At least 1.
    pub weeks_left: i64,
    pub required_per_week: Decimal,
    pub required_per_month: Decimal,
    /// Average deposited per week since creation.
    pub saving_rate: Decimal,
    pub predicted_completion: Option<DateTime<Utc>>,
    pub on_track: bool,
    pub status: PredictionStatus,
    /// Present only when both income and spending are reported.
    pub capacity: Option<SavingsCapacity>,
}
