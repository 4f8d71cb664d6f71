use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::flexible_model::{
    FinancialsUpdate, FlexibleGoal, FlexibleGoalSummary, FlexibleTransaction,
    FlexibleTransactionType, NewFlexibleGoal, SavingsPrediction,
};
use super::flexible_prediction::predict;
use super::flexible_traits::{FlexibleGoalRepositoryTrait, FlexibleGoalServiceTrait};
use crate::achievements::{evaluate, AchievementFacts, AchievementProgress, FLEXIBLE_ACHIEVEMENTS};
use crate::constants::MIN_GOAL_NAME_CHARS;
use crate::errors::{Result, ValidationError};

/// Service for flexible goals. No external ledger backs them, so every
/// mutation is serialized here and the balance is re-derived after it.
pub struct FlexibleGoalService {
    repository: Arc<dyn FlexibleGoalRepositoryTrait>,
    write_lock: Mutex<()>,
}

impl FlexibleGoalService {
    pub fn new(repository: Arc<dyn FlexibleGoalRepositoryTrait>) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    fn validate_new_goal(new_goal: &NewFlexibleGoal) -> Result<()> {
        if new_goal.name.trim().chars().count() < MIN_GOAL_NAME_CHARS {
            return Err(ValidationError::invalid(format!(
                "Goal name must be at least {} characters",
                MIN_GOAL_NAME_CHARS
            ))
            .into());
        }
        if new_goal.target_amount <= Decimal::ZERO {
            return Err(ValidationError::invalid("Target amount must be positive").into());
        }
        if new_goal.deadline <= Utc::now() {
            return Err(ValidationError::invalid("Deadline must be in the future").into());
        }
        Self::validate_financials(new_goal.monthly_income, new_goal.monthly_spending)
    }

    fn validate_financials(income: Option<Decimal>, spending: Option<Decimal>) -> Result<()> {
        if income.is_some_and(|v| v < Decimal::ZERO) || spending.is_some_and(|v| v < Decimal::ZERO) {
            return Err(
                ValidationError::invalid("Income and spending cannot be negative").into(),
            );
        }
        Ok(())
    }

    fn validate_amount(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::invalid("Amount must be positive").into());
        }
        Ok(())
    }

    async fn record(
        &self,
        goal_id: &str,
        transaction_type: FlexibleTransactionType,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<FlexibleGoalSummary> {
        Self::validate_amount(amount)?;
        let _write = self.write_lock.lock().await;

        let goal = self.repository.get_flexible_goal(goal_id)?;
        if transaction_type == FlexibleTransactionType::Withdrawal
            && amount > goal.current_balance()
        {
            return Err(ValidationError::invalid(format!(
                "Cannot withdraw {}; the balance is {}",
                amount,
                goal.current_balance()
            ))
            .into());
        }

        let transaction = FlexibleTransaction {
            id: Uuid::new_v4().to_string(),
            goal_id: goal.id.clone(),
            transaction_type,
            amount,
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            timestamp: Utc::now(),
        };
        self.repository.append_transaction(transaction).await?;
        debug!(
            "Recorded {} of {} for flexible goal {}",
            transaction_type.as_str(),
            amount,
            goal.id
        );

        self.get_goal(goal_id)
    }
}

#[async_trait]
impl FlexibleGoalServiceTrait for FlexibleGoalService {
    fn get_goals(&self) -> Result<Vec<FlexibleGoalSummary>> {
        Ok(self
            .repository
            .list_flexible_goals()?
            .into_iter()
            .map(FlexibleGoalSummary::from)
            .collect())
    }

    fn get_goal(&self, goal_id: &str) -> Result<FlexibleGoalSummary> {
        Ok(self.repository.get_flexible_goal(goal_id)?.into())
    }

    async fn create_goal(&self, new_goal: NewFlexibleGoal) -> Result<FlexibleGoalSummary> {
        Self::validate_new_goal(&new_goal)?;
        let goal = FlexibleGoal {
            id: Uuid::new_v4().to_string(),
            name: new_goal.name.trim().to_string(),
            target_amount: new_goal.target_amount,
            deadline: new_goal.deadline,
            created_at: Utc::now(),
            monthly_income: new_goal.monthly_income,
            monthly_spending: new_goal.monthly_spending,
            transactions: Vec::new(),
        };
        Ok(self.repository.insert_flexible_goal(goal).await?.into())
    }

    async fn deposit(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<FlexibleGoalSummary> {
        self.record(goal_id, FlexibleTransactionType::Deposit, amount, note)
            .await
    }

    /// Refused when `amount` exceeds the current balance.
    async fn withdraw(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<FlexibleGoalSummary> {
        self.record(goal_id, FlexibleTransactionType::Withdrawal, amount, note)
            .await
    }

    async fn update_financials(
        &self,
        goal_id: &str,
        update: FinancialsUpdate,
    ) -> Result<FlexibleGoalSummary> {
        Self::validate_financials(update.monthly_income, update.monthly_spending)?;
        let _write = self.write_lock.lock().await;

        let mut goal = self.repository.get_flexible_goal(goal_id)?;
        if let Some(income) = update.monthly_income {
            goal.monthly_income = Some(income);
        }
        if let Some(spending) = update.monthly_spending {
            goal.monthly_spending = Some(spending);
        }
        self.repository.update_flexible_goal(goal).await?;
        self.get_goal(goal_id)
    }

    async fn delete_goal(&self, goal_id: String) -> Result<usize> {
        let _write = self.write_lock.lock().await;
        self.repository.delete_flexible_goal(goal_id).await
    }

    fn achievements(&self, goal_id: &str) -> Result<AchievementProgress> {
        let goal = self.repository.get_flexible_goal(goal_id)?;
        Ok(evaluate(FLEXIBLE_ACHIEVEMENTS, &AchievementFacts::from(&goal)))
    }

    fn prediction(&self, goal_id: &str) -> Result<SavingsPrediction> {
        let goal = self.repository.get_flexible_goal(goal_id)?;
        Ok(predict(&goal, Utc::now()))
    }
}

impl From<&FlexibleGoal> for AchievementFacts {
    fn from(goal: &FlexibleGoal) -> Self {
        Self {
            deposit_count: goal.deposit_count(),
            target: goal.target_amount,
            saved: goal.current_balance(),
            completed: goal.goal_completed(),
        }
    }
}
