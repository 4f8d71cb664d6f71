//! Badge definitions and their evaluation.
//!
//! Every rule is re-evaluated from scratch on each call and nothing is
//! stored, so a badge whose condition stops holding (for example after a
//! flexible-goal withdrawal) reads as locked again.

use rust_decimal::Decimal;

use super::achievements_model::{
    Achievement, AchievementFacts, AchievementProgress, AchievementTier, Milestone,
};
use crate::constants::MICRO_ALGOS_PER_ALGO;
use crate::reconciler::ReconciledView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    DepositCount(usize),
    ProgressPercent(u32),
    Completed,
    SavedAtLeast(u64),
    /// Saved strictly more than a positive target.
    Overachiever,
}

impl AchievementRule {
    pub fn holds(&self, facts: &AchievementFacts) -> bool {
        match *self {
            AchievementRule::DepositCount(n) => facts.deposit_count >= n,
            AchievementRule::ProgressPercent(p) => facts.progress_reached(p),
            AchievementRule::Completed => facts.completed,
            AchievementRule::SavedAtLeast(amount) => facts.saved >= Decimal::from(amount),
            AchievementRule::Overachiever => {
                facts.target > Decimal::ZERO && facts.saved > facts.target
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: AchievementTier,
    pub rule: AchievementRule,
}

const fn def(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tier: AchievementTier,
    rule: AchievementRule,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        name,
        description,
        tier,
        rule,
    }
}

use AchievementRule::*;
use AchievementTier::*;

/// Badges for on-chain vaults. Amounts are microAlgos.
pub const VAULT_ACHIEVEMENTS: &[AchievementDefinition] = &[
    def("first_deposit", "First Step", "Make your first deposit", Bronze, DepositCount(1)),
    def("five_deposits", "Consistent Saver", "Make 5 deposits", Silver, DepositCount(5)),
    def("ten_deposits", "Dedicated Depositor", "Make 10 deposits", Gold, DepositCount(10)),
    def("twenty_deposits", "Savings Master", "Make 20 deposits", Platinum, DepositCount(20)),
    def("ten_percent", "10% There", "Reach 10% of your goal", Bronze, ProgressPercent(10)),
    def("quarter_way", "Quarter Way", "Reach 25% of your goal", Silver, ProgressPercent(25)),
    def("halfway", "Halfway Hero", "Reach 50% of your goal", Gold, ProgressPercent(50)),
    def("three_quarters", "Almost There", "Reach 75% of your goal", Platinum, ProgressPercent(75)),
    def("goal_completed", "Goal Crusher", "Complete your savings goal", Diamond, Completed),
    def("save_1_algo", "First ALGO", "Save at least 1 ALGO", Bronze, SavedAtLeast(MICRO_ALGOS_PER_ALGO)),
    def("save_10_algo", "Double Digits", "Save at least 10 ALGO", Silver, SavedAtLeast(10 * MICRO_ALGOS_PER_ALGO)),
    def("save_50_algo", "Serious Saver", "Save at least 50 ALGO", Gold, SavedAtLeast(50 * MICRO_ALGOS_PER_ALGO)),
    def("save_100_algo", "Century Saver", "Save at least 100 ALGO", Platinum, SavedAtLeast(100 * MICRO_ALGOS_PER_ALGO)),
    def("overachiever", "Overachiever", "Save more than your target amount", Diamond, Overachiever),
];

/// Badges for flexible goals. Amounts are whole currency units.
pub const FLEXIBLE_ACHIEVEMENTS: &[AchievementDefinition] = &[
    def("first_step", "First Step", "Make your first deposit", Bronze, DepositCount(1)),
    def("consistent", "Consistent Saver", "Make 5 deposits", Silver, DepositCount(5)),
    def("ten_percent", "10% There", "Reach 10% of your goal", Bronze, ProgressPercent(10)),
    def("quarter", "Quarter Way", "Reach 25% of your goal", Silver, ProgressPercent(25)),
    def("halfway", "Halfway Hero", "Reach 50% of your goal", Gold, ProgressPercent(50)),
    def("three_quarter", "Almost There", "Reach 75% of your goal", Platinum, ProgressPercent(75)),
    def("completed", "Goal Crusher", "Complete your savings goal", Diamond, Completed),
    def("save_1000", "First Thousand", "Save at least 1,000", Bronze, SavedAtLeast(1_000)),
    def("save_10000", "Five Figures", "Save at least 10,000", Silver, SavedAtLeast(10_000)),
    def("save_50000", "Serious Saver", "Save at least 50,000", Gold, SavedAtLeast(50_000)),
    def("overachiever", "Overachiever", "Save more than your target", Diamond, Overachiever),
];

/// Evaluates `definitions` against `facts`.
pub fn evaluate(definitions: &[AchievementDefinition], facts: &AchievementFacts) -> AchievementProgress {
    let achievements: Vec<Achievement> = definitions
        .iter()
        .map(|d| Achievement {
            id: d.id.to_string(),
            name: d.name.to_string(),
            description: d.description.to_string(),
            tier: d.tier,
            unlocked: d.rule.holds(facts),
        })
        .collect();

    AchievementProgress {
        total_unlocked: achievements.iter().filter(|a| a.unlocked).count(),
        total_possible: achievements.len(),
        next_milestone: next_milestone(definitions, facts),
        achievements,
    }
}

/// The lowest progress badge not yet reached, then completion.
fn next_milestone(definitions: &[AchievementDefinition], facts: &AchievementFacts) -> Option<Milestone> {
    let mut progress: Vec<(&AchievementDefinition, u32)> = definitions
        .iter()
        .filter_map(|d| match d.rule {
            ProgressPercent(p) => Some((d, p)),
            _ => None,
        })
        .collect();
    progress.sort_by_key(|(_, p)| *p);

    if let Some((d, p)) = progress.into_iter().find(|(_, p)| !facts.progress_reached(*p)) {
        return Some(Milestone {
            achievement_id: d.id.to_string(),
            name: d.name.to_string(),
            required_percent: Some(p),
        });
    }
    if facts.completed {
        return None;
    }
    definitions
        .iter()
        .find(|d| d.rule == Completed)
        .map(|d| Milestone {
            achievement_id: d.id.to_string(),
            name: d.name.to_string(),
            required_percent: None,
        })
}

impl From<&ReconciledView> for AchievementFacts {
    fn from(view: &ReconciledView) -> Self {
        let aggregate = &view.aggregate;
        Self {
            deposit_count: view.deposit_count,
            target: Decimal::from(aggregate.target_amount),
            saved: Decimal::from(aggregate.total_saved),
            completed: aggregate.completed || aggregate.progress_reached(100),
        }
    }
}

/// Badges for an on-chain goal.
pub fn vault_achievements(view: &ReconciledView) -> AchievementProgress {
    evaluate(VAULT_ACHIEVEMENTS, &AchievementFacts::from(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn facts(count: usize, target: Decimal, saved: Decimal, completed: bool) -> AchievementFacts {
        AchievementFacts {
            deposit_count: count,
            target,
            saved,
            completed,
        }
    }

    #[test]
    fn test_definition_ids_are_unique() {
        for defs in [VAULT_ACHIEVEMENTS, FLEXIBLE_ACHIEVEMENTS] {
            let mut ids: Vec<&str> = defs.iter().map(|d| d.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), defs.len());
        }
    }

    #[test]
    fn test_fresh_vault_unlocks_nothing() {
        let progress = evaluate(VAULT_ACHIEVEMENTS, &facts(0, dec!(10000000), dec!(0), false));
        assert_eq!(progress.total_unlocked, 0);
        assert_eq!(progress.total_possible, 14);
        let next = progress.next_milestone.unwrap();
        assert_eq!(next.achievement_id, "ten_percent");
        assert_eq!(next.required_percent, Some(10));
    }

    #[test]
    fn test_progress_thresholds_are_inclusive() {
        let progress = evaluate(
            VAULT_ACHIEVEMENTS,
            &facts(2, dec!(10000000), dec!(2500000), false),
        );
        assert!(progress.is_unlocked("first_deposit"));
        assert!(progress.is_unlocked("ten_percent"));
        assert!(progress.is_unlocked("quarter_way"));
        assert!(!progress.is_unlocked("halfway"));
        assert!(progress.is_unlocked("save_1_algo"));
        assert_eq!(progress.next_milestone.unwrap().achievement_id, "halfway");
    }

    #[test]
    fn test_zero_target_never_reaches_progress() {
        let progress = evaluate(VAULT_ACHIEVEMENTS, &facts(1, dec!(0), dec!(5000000), false));
        assert!(!progress.is_unlocked("ten_percent"));
        assert!(!progress.is_unlocked("overachiever"));
    }

    #[test]
    fn test_completion_and_overachiever() {
        let progress = evaluate(
            VAULT_ACHIEVEMENTS,
            &facts(6, dec!(10000000), dec!(12000000), true),
        );
        assert!(progress.is_unlocked("goal_completed"));
        assert!(progress.is_unlocked("overachiever"));
        assert!(progress.is_unlocked("save_10_algo"));
        assert_eq!(progress.next_milestone, None);
    }

    #[test]
    fn test_past_three_quarters_points_at_completion() {
        let progress = evaluate(
            FLEXIBLE_ACHIEVEMENTS,
            &facts(3, dec!(1000), dec!(800), false),
        );
        let next = progress.next_milestone.unwrap();
        assert_eq!(next.achievement_id, "completed");
        assert_eq!(next.required_percent, None);
    }

    #[test]
    fn test_badge_relocks_when_balance_drops() {
        // Badges carry no stored unlock flag; a lower balance locks them again.
        let before = evaluate(FLEXIBLE_ACHIEVEMENTS, &facts(2, dec!(1000), dec!(600), false));
        assert!(before.is_unlocked("halfway"));
        let after = evaluate(FLEXIBLE_ACHIEVEMENTS, &facts(2, dec!(1000), dec!(400), false));
        assert!(!after.is_unlocked("halfway"));
    }
}
