use algosave_chain::Address;
use async_trait::async_trait;

use crate::achievements::AchievementProgress;
use crate::errors::Result;
use crate::goals::goals_model::{
    DepositHistoryEntry, Goal, GoalDeposit, GoalWithdrawal, MintedAchievement, NewGoal,
    PendingSubmission, TransactionStatus,
};
use crate::health::HealthReport;
use crate::nfts::AchievementNft;
use crate::reconciler::ReconciledView;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn list_goals(&self) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    async fn insert_goal(&self, goal: Goal) -> Result<Goal>;
    /// Deletes the goal and its local history.
    async fn delete_goal(&self, goal_id: String) -> Result<usize>;

    fn list_deposits(&self, goal_id: &str) -> Result<Vec<GoalDeposit>>;
    fn list_all_deposits(&self) -> Result<Vec<GoalDeposit>>;
    async fn append_deposit(&self, deposit: GoalDeposit) -> Result<GoalDeposit>;

    fn get_withdrawal(&self, goal_id: &str) -> Result<Option<GoalWithdrawal>>;
    async fn record_withdrawal(&self, withdrawal: GoalWithdrawal) -> Result<GoalWithdrawal>;

    /// Submissions of a goal whose outcome is still unresolved.
    fn list_pending_submissions(&self, goal_id: &str) -> Result<Vec<PendingSubmission>>;
    fn get_pending_submission(&self, transaction_id: &str) -> Result<Option<PendingSubmission>>;
    async fn save_pending_submission(
        &self,
        submission: PendingSubmission,
    ) -> Result<PendingSubmission>;
    async fn clear_pending_submission(&self, transaction_id: String) -> Result<usize>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<Goal>>;
    async fn create_goal(&self, sender: Address, new_goal: NewGoal) -> Result<Goal>;
    async fn resume_funding(&self, goal_id: &str, sender: Address) -> Result<ReconciledView>;
    async fn deposit(&self, goal_id: &str, sender: Address, amount: u64)
        -> Result<ReconciledView>;
    async fn withdraw(&self, goal_id: &str, sender: Address) -> Result<ReconciledView>;
    async fn mint_achievement(&self, goal_id: &str, sender: Address)
        -> Result<MintedAchievement>;
    async fn get_view(&self, goal_id: &str) -> Result<ReconciledView>;
    async fn list_views(&self) -> Result<Vec<ReconciledView>>;
    async fn transaction_status(&self, txid: &str) -> Result<TransactionStatus>;
    async fn achievements(&self, goal_id: &str) -> Result<AchievementProgress>;
    async fn health(&self, goal_id: &str) -> Result<HealthReport>;
    fn all_deposits(&self) -> Result<Vec<DepositHistoryEntry>>;
    fn list_nfts(&self) -> Result<Vec<AchievementNft>>;
    async fn delete_goal(&self, goal_id: String) -> Result<usize>;
}
