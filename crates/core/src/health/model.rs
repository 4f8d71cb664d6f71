//! Goal health models.

use serde::{Deserialize, Serialize};

/// Starting score for any deployed goal.
pub const BASE_SCORE: i32 = 50;
pub const MIN_SCORE: i32 = 10;
pub const MAX_SCORE: i32 = 100;

/// A condition that moved the score away from the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthFactorKind {
    GoalCompleted,
    FirstDeposit,
    ConsistentDeposits,
    HalfwayProgress,
    DeadlinePassed,
}

impl HealthFactorKind {
    pub fn delta(&self) -> i32 {
        match self {
            HealthFactorKind::GoalCompleted => 25,
            HealthFactorKind::FirstDeposit => 10,
            HealthFactorKind::ConsistentDeposits => 15,
            HealthFactorKind::HalfwayProgress => 10,
            HealthFactorKind::DeadlinePassed => -15,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            HealthFactorKind::GoalCompleted => "+25: Goal completed! Fantastic discipline.",
            HealthFactorKind::FirstDeposit => "+10: You've started! The first step is the hardest.",
            HealthFactorKind::ConsistentDeposits => {
                "+15: Consistent savings are building a strong habit."
            }
            HealthFactorKind::HalfwayProgress => "+10: Over 50% of the way there. Keep it up!",
            HealthFactorKind::DeadlinePassed => {
                "-15: Deadline passed, but don't give up on your goal!"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactor {
    pub kind: HealthFactorKind,
    pub delta: i32,
}

/// Health score of one on-chain goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Clamped to `[MIN_SCORE, MAX_SCORE]`.
    pub score: i32,
    pub factors: Vec<HealthFactor>,
    /// Base line first, then one line per factor in evaluation order.
    pub feedback: Vec<String>,
}
