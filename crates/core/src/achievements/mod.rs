//! Achievement badges for vault and flexible goals.

mod achievements_model;
mod achievements_rules;

pub use achievements_model::{
    Achievement, AchievementFacts, AchievementProgress, AchievementTier, Milestone,
};
pub use achievements_rules::{
    evaluate, vault_achievements, AchievementDefinition, AchievementRule, FLEXIBLE_ACHIEVEMENTS,
    VAULT_ACHIEVEMENTS,
};
