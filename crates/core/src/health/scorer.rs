//! Heuristic health score.
//!
//! A fixed base plus fixed deltas, clamped. Not a weighted average.

use super::model::{
    HealthFactor, HealthFactorKind, HealthReport, BASE_SCORE, MAX_SCORE, MIN_SCORE,
};
use crate::goals::OnChainAggregate;

const BASE_FEEDBACK: &str = "Base score for starting a goal.";
const NO_FACTOR_FEEDBACK: &str = "Make a deposit to improve your score.";

/// Scores a goal from its deposit count and a fresh aggregate at `now`
/// (unix seconds).
pub fn score_goal(deposit_count: usize, aggregate: &OnChainAggregate, now: i64) -> HealthReport {
    let completed = aggregate.completed || aggregate.progress_reached(100);
    let mut kinds = Vec::new();

    if completed {
        kinds.push(HealthFactorKind::GoalCompleted);
    }
    if deposit_count > 0 {
        kinds.push(HealthFactorKind::FirstDeposit);
    }
    if deposit_count > 2 {
        kinds.push(HealthFactorKind::ConsistentDeposits);
    }
    if !completed && aggregate.progress_reached(50) {
        kinds.push(HealthFactorKind::HalfwayProgress);
    }
    // strictly after the deadline second
    let deadline_passed = aggregate.deadline > 0 && now > 0 && now as u64 > aggregate.deadline;
    if deadline_passed && !completed {
        kinds.push(HealthFactorKind::DeadlinePassed);
    }

    let raw = BASE_SCORE + kinds.iter().map(|k| k.delta()).sum::<i32>();

    let mut feedback = vec![BASE_FEEDBACK.to_string()];
    feedback.extend(kinds.iter().map(|k| k.feedback().to_string()));
    if kinds.is_empty() {
        feedback.push(NO_FACTOR_FEEDBACK.to_string());
    }

    HealthReport {
        score: raw.clamp(MIN_SCORE, MAX_SCORE),
        factors: kinds
            .into_iter()
            .map(|kind| HealthFactor {
                kind,
                delta: kind.delta(),
            })
            .collect(),
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algosave_chain::Address;

    const NOW: i64 = 1_800_000_000;

    fn aggregate(saved: u64, deadline: u64) -> OnChainAggregate {
        OnChainAggregate {
            owner: Address::ZERO,
            target_amount: 10_000_000,
            total_saved: saved,
            deadline,
            completed: saved >= 10_000_000,
            contract_balance: 100_000 + saved,
        }
    }

    #[test]
    fn test_new_goal_scores_base() {
        let report = score_goal(0, &aggregate(0, NOW as u64 + 1000), NOW);
        assert_eq!(report.score, 50);
        assert!(report.factors.is_empty());
        assert_eq!(
            report.feedback,
            vec![BASE_FEEDBACK.to_string(), NO_FACTOR_FEEDBACK.to_string()]
        );
    }

    #[test]
    fn test_consistent_halfway_saver() {
        let report = score_goal(3, &aggregate(5_000_000, NOW as u64 + 1000), NOW);
        // 50 + 10 + 15 + 10
        assert_eq!(report.score, 85);
        assert_eq!(report.feedback.len(), 4);
    }

    #[test]
    fn test_completed_goal_caps_at_max() {
        let report = score_goal(5, &aggregate(10_000_000, NOW as u64 - 10), NOW);
        // 50 + 25 + 10 + 15, no halfway or deadline penalty once completed
        assert_eq!(report.score, 100);
        assert!(!report
            .factors
            .iter()
            .any(|f| f.kind == HealthFactorKind::DeadlinePassed));
    }

    #[test]
    fn test_missed_deadline_penalty() {
        let report = score_goal(0, &aggregate(0, NOW as u64 - 10), NOW);
        assert_eq!(report.score, 35);
        assert_eq!(report.factors[0].delta, -15);
    }

    #[test]
    fn test_deadline_second_itself_is_not_passed() {
        let report = score_goal(1, &aggregate(1, NOW as u64), NOW);
        assert_eq!(report.score, 60);
    }

    #[test]
    fn test_score_is_deterministic() {
        let agg = aggregate(6_000_000, NOW as u64 + 5);
        assert_eq!(score_goal(4, &agg, NOW), score_goal(4, &agg, NOW));
    }
}
