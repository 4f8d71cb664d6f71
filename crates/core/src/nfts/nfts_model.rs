use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of the single achievement asset minted for a completed goal.
///
/// Documents a past on-chain action. Never updated after it is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AchievementNft {
    pub id: String,
    pub goal_id: String,
    pub app_id: u64,
    pub asset_id: u64,
    pub mint_transaction_id: String,
    pub goal_name: String,
    /// Snapshot at mint time, in microAlgos.
    pub target_amount: u64,
    /// Snapshot at mint time, in microAlgos.
    pub total_saved: u64,
    pub minted_at: DateTime<Utc>,
}
