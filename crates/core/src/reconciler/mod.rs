//! Merges a freshly fetched vault aggregate with the local deposit log.
//!
//! The aggregate is authoritative for every amount and flag. The log only
//! feeds history, charts and the achievement rules that need a deposit count
//! or individual amounts. Nothing here writes back to either side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::goals::{derive_state, Goal, GoalDeposit, GoalState, GoalWithdrawal, OnChainAggregate};

/// Display-ready snapshot of one on-chain goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledView {
    pub goal: Goal,
    pub state: GoalState,
    pub aggregate: OnChainAggregate,
    /// Local history, oldest first. Cosmetic.
    pub deposits: Vec<GoalDeposit>,
    pub deposit_count: usize,
    pub withdrawal: Option<GoalWithdrawal>,
    pub can_deposit: bool,
    pub can_withdraw: bool,
    pub progress_percent: f64,
    pub remaining_amount: u64,
    pub fetched_at: DateTime<Utc>,
}

impl ReconciledView {
    pub fn total_saved(&self) -> u64 {
        self.aggregate.total_saved
    }

    pub fn is_completed(&self) -> bool {
        self.state == GoalState::Completed
    }
}

/// Builds the view for `goal` at `now`.
///
/// Log entries for other goals are ignored, and duplicate transaction ids
/// are kept once.
pub fn reconcile(
    goal: Goal,
    log: Vec<GoalDeposit>,
    aggregate: OnChainAggregate,
    withdrawal: Option<GoalWithdrawal>,
    now: DateTime<Utc>,
) -> ReconciledView {
    let mut seen = HashSet::new();
    let mut deposits: Vec<GoalDeposit> = log
        .into_iter()
        .filter(|d| d.goal_id == goal.id)
        .filter(|d| seen.insert(d.transaction_id.clone()))
        .collect();
    deposits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let state = derive_state(goal.app_id, &aggregate, withdrawal.as_ref(), now.timestamp());

    ReconciledView {
        deposit_count: deposits.len(),
        can_deposit: state.can_deposit(),
        can_withdraw: state.can_withdraw(),
        progress_percent: aggregate.progress_percent(),
        remaining_amount: aggregate.remaining_amount(),
        goal,
        state,
        aggregate,
        deposits,
        withdrawal,
        fetched_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algosave_chain::{Address, VAULT_MIN_BALANCE};
    use chrono::{Duration, TimeZone};

    fn goal() -> Goal {
        Goal {
            id: "goal-1".to_string(),
            app_id: 42,
            name: "Bike".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn deposit(goal_id: &str, txid: &str, amount: u64, day: i64) -> GoalDeposit {
        GoalDeposit {
            id: format!("d-{}", txid),
            goal_id: goal_id.to_string(),
            amount,
            transaction_id: txid.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
        }
    }

    fn aggregate(saved: u64) -> OnChainAggregate {
        OnChainAggregate {
            owner: Address::new([3u8; 32]),
            target_amount: 10_000_000,
            total_saved: saved,
            deadline: 1_900_000_000,
            completed: saved >= 10_000_000,
            contract_balance: VAULT_MIN_BALANCE + saved,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_aggregate_wins_over_log() {
        // The log claims 9 units, the chain says 4.
        let log = vec![
            deposit("goal-1", "A", 4_000_000, 1),
            deposit("goal-1", "B", 5_000_000, 2),
        ];
        let view = reconcile(goal(), log, aggregate(4_000_000), None, now());
        assert_eq!(view.total_saved(), 4_000_000);
        assert_eq!(view.remaining_amount, 6_000_000);
        assert_eq!(view.deposit_count, 2);
        assert_eq!(view.state, GoalState::Active);
    }

    #[test]
    fn test_log_is_filtered_deduplicated_and_sorted() {
        let log = vec![
            deposit("goal-1", "B", 2, 5),
            deposit("other", "X", 7, 0),
            deposit("goal-1", "A", 1, 1),
            deposit("goal-1", "B", 2, 5),
        ];
        let view = reconcile(goal(), log, aggregate(3), None, now());
        let ids: Vec<&str> = view.deposits.iter().map(|d| d.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_completion_comes_from_fresh_read() {
        let view = reconcile(goal(), vec![], aggregate(10_000_000), None, now());
        assert!(view.is_completed());
        assert!(view.can_withdraw);
        assert!(!view.can_deposit);
        assert_eq!(view.progress_percent, 100.0);
    }
}
