//! Achievement models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

/// One badge as evaluated right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: AchievementTier,
    pub unlocked: bool,
}

/// The next badge the user is working toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub achievement_id: String,
    pub name: String,
    /// Progress percentage that unlocks it. `None` for goal completion.
    pub required_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub achievements: Vec<Achievement>,
    pub total_unlocked: usize,
    pub total_possible: usize,
    pub next_milestone: Option<Milestone>,
}

impl AchievementProgress {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id && a.unlocked)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.unlocked)
    }
}

/// Everything the rules look at. Amounts share one unit: microAlgos for
/// vaults, currency units for flexible goals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementFacts {
    pub deposit_count: usize,
    pub target: Decimal,
    pub saved: Decimal,
    pub completed: bool,
}

impl AchievementFacts {
    pub fn progress_reached(&self, percent: u32) -> bool {
        self.target > Decimal::ZERO
            && self.saved * Decimal::ONE_HUNDRED >= self.target * Decimal::from(percent)
    }
}
