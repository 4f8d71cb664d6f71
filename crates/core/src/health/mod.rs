//! Goal health scoring.

pub mod model;
mod scorer;

pub use model::{HealthFactor, HealthFactorKind, HealthReport};
pub use scorer::score_goal;
