//! Goals domain models.

use algosave_chain::{Address, AlgodConfig, VaultState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DEFAULT_CONFIRMATION_ROUNDS;
use crate::errors::ValidationError;
use crate::nfts::AchievementNft;
use crate::reconciler::ReconciledView;

/// Local metadata for an on-chain goal. The vault itself is the source of
/// truth for every amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    /// Application id of the deployed vault. Never 0 for a stored goal.
    pub app_id: u64,
    /// Display only.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    /// MicroAlgos.
    pub target_amount: u64,
    pub deadline: DateTime<Utc>,
}

/// One confirmed deposit, kept for history and analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDeposit {
    pub id: String,
    pub goal_id: String,
    /// MicroAlgos.
    pub amount: u64,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A deposit joined with its goal's name, for cross-goal history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositHistoryEntry {
    pub goal_id: String,
    pub goal_name: String,
    pub amount: u64,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Record of a confirmed withdrawal. A vault is withdrawn at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithdrawal {
    pub goal_id: String,
    /// Contract balance released, in microAlgos.
    pub amount: u64,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Freshly fetched vault state. Re-read on every view; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnChainAggregate {
    pub owner: Address,
    pub target_amount: u64,
    pub total_saved: u64,
    /// Unix seconds.
    pub deadline: u64,
    pub completed: bool,
    pub contract_balance: u64,
}

impl From<VaultState> for OnChainAggregate {
    fn from(state: VaultState) -> Self {
        Self {
            owner: state.owner,
            target_amount: state.target_amount,
            total_saved: state.total_saved,
            deadline: state.deadline,
            completed: state.completed,
            contract_balance: state.balance,
        }
    }
}

impl OnChainAggregate {
    /// Whether `total_saved` is at least `percent`% of the target. Exact; a
    /// zero target never reaches anything.
    pub fn progress_reached(&self, percent: u64) -> bool {
        self.target_amount > 0
            && u128::from(self.total_saved) * 100
                >= u128::from(self.target_amount) * u128::from(percent)
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_amount == 0 {
            return 0.0;
        }
        self.total_saved as f64 / self.target_amount as f64 * 100.0
    }

    pub fn remaining_amount(&self) -> u64 {
        self.target_amount.saturating_sub(self.total_saved)
    }

    /// Past the deadline at `now` (unix seconds).
    pub fn deadline_passed(&self, now: i64) -> bool {
        self.deadline > 0 && now >= 0 && now as u64 >= self.deadline
    }
}

/// Lifecycle engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Rounds to wait for confirmation before reporting a transaction as
    /// pending.
    pub confirmation_rounds: u64,
    /// Block explorer linked from achievement assets.
    pub explorer_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&AlgodConfig::default())
    }
}

impl From<&AlgodConfig> for EngineConfig {
    fn from(config: &AlgodConfig) -> Self {
        Self {
            confirmation_rounds: DEFAULT_CONFIRMATION_ROUNDS,
            explorer_url: config.explorer_url.clone(),
        }
    }
}

/// Where a submitted transaction stands, for re-polling after a timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Confirmed { round: u64 },
    Rejected { reason: String },
    /// The node has no record of it: never received, or long expired.
    Unknown,
}

/// What a submitted transaction was meant to do for its goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingOperation {
    Fund,
    Deposit,
    Withdraw,
    Mint,
}

impl PendingOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingOperation::Fund => "FUND",
            PendingOperation::Deposit => "DEPOSIT",
            PendingOperation::Withdraw => "WITHDRAW",
            PendingOperation::Mint => "MINT",
        }
    }
}

impl FromStr for PendingOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FUND" => Ok(PendingOperation::Fund),
            "DEPOSIT" => Ok(PendingOperation::Deposit),
            "WITHDRAW" => Ok(PendingOperation::Withdraw),
            "MINT" => Ok(PendingOperation::Mint),
            other => Err(ValidationError::invalid(format!(
                "Unknown pending operation '{}'",
                other
            ))),
        }
    }
}

/// A transaction that left the client but was never seen confirmed.
///
/// Kept until its status is resolved so the confirmed effect can still be
/// recorded and the operation is not built a second time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmission {
    pub transaction_id: String,
    pub goal_id: String,
    pub operation: PendingOperation,
    /// Deposit amount, released balance, or saved total at mint time.
    pub amount: u64,
    /// Goal target at mint time; zero for other operations.
    pub target_amount: u64,
    /// Last round in which the transaction can still be committed.
    pub last_valid: u64,
    pub submitted_at: DateTime<Utc>,
}

/// Result of minting a goal's achievement asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MintedAchievement {
    pub nft: AchievementNft,
    pub view: ReconciledView,
}
