use crate::achievements::AchievementProgress;
use crate::errors::Result;
use crate::flexible::flexible_model::{
    FinancialsUpdate, FlexibleGoal, FlexibleGoalSummary, FlexibleTransaction, NewFlexibleGoal,
    SavingsPrediction,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for flexible goal repository operations
#[async_trait]
pub trait FlexibleGoalRepositoryTrait: Send + Sync {
    /// Goals with their transactions, oldest transaction first.
    fn list_flexible_goals(&self) -> Result<Vec<FlexibleGoal>>;
    fn get_flexible_goal(&self, goal_id: &str) -> Result<FlexibleGoal>;
    async fn insert_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal>;
    /// Replaces the goal's own fields. Transactions are untouched.
    async fn update_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal>;
    async fn append_transaction(&self, transaction: FlexibleTransaction)
        -> Result<FlexibleTransaction>;
    async fn delete_flexible_goal(&self, goal_id: String) -> Result<usize>;
}

/// Trait for flexible goal service operations
#[async_trait]
pub trait FlexibleGoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<FlexibleGoalSummary>>;
    fn get_goal(&self, goal_id: &str) -> Result<FlexibleGoalSummary>;
    async fn create_goal(&self, new_goal: NewFlexibleGoal) -> Result<FlexibleGoalSummary>;
    async fn deposit(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<FlexibleGoalSummary>;
    async fn withdraw(
        &self,
        goal_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<FlexibleGoalSummary>;
    async fn update_financials(
        &self,
        goal_id: &str,
        update: FinancialsUpdate,
    ) -> Result<FlexibleGoalSummary>;
    async fn delete_goal(&self, goal_id: String) -> Result<usize>;
    fn achievements(&self, goal_id: &str) -> Result<AchievementProgress>;
    fn prediction(&self, goal_id: &str) -> Result<SavingsPrediction>;
}
