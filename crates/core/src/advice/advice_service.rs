//! Advice with a deterministic fallback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use std::sync::Arc;

use super::advice_model::{AdviceContext, AdviceReply, AdviceSource};
use crate::errors::Result;

const PLAN_ADVICE: &str = "To achieve your goal, break it into weekly milestones. Calculate how much you need per week: (target - saved) / weeks_left. Automate your savings if possible, and track progress weekly!";
const BEHIND_ADVICE: &str = "Don't worry about being behind! Reassess your budget: can you cut 10-15% of non-essential spending? Even small increases in weekly savings compound over time.";
const MOTIVATE_ADVICE: &str = "Remember why you started! Visualize achieving your goal. Every deposit, no matter how small, is progress. You're building discipline that will serve you for life!";
const STRATEGY_ADVICE: &str = "Try the 50/30/20 rule: 50% needs, 30% wants, 20% savings. If your goal needs more, temporarily adjust to 50/25/25. Track every expense for a week to find hidden savings.";
const DEFAULT_ADVICE: &str = "Stay consistent with your savings plan. Break your target into weekly amounts, track your progress, and celebrate milestones along the way!";

/// The external text service.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn generate(&self, context: &AdviceContext) -> Result<String>;
}

pub struct AdviceService {
    provider: Option<Arc<dyn AdviceProvider>>,
}

impl AdviceService {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Only the canned answers.
    pub fn offline() -> Self {
        Self { provider: None }
    }

    /// Never fails: provider errors and empty replies fall back to the
    /// canned answer for the question.
    pub async fn advise(&self, context: &AdviceContext) -> AdviceReply {
        if let Some(provider) = &self.provider {
            match provider.generate(context).await {
                Ok(text) if !text.trim().is_empty() => {
                    return AdviceReply {
                        text,
                        source: AdviceSource::Provider,
                    }
                }
                Ok(_) => warn!("Advice provider returned an empty reply, using fallback"),
                Err(e) => warn!("Advice provider failed, using fallback: {}", e),
            }
        }
        AdviceReply {
            text: fallback_advice(context, Utc::now()),
            source: AdviceSource::Fallback,
        }
    }
}

/// Canned advice routed on keywords in the question.
pub fn fallback_advice(context: &AdviceContext, now: DateTime<Utc>) -> String {
    let question = context.effective_question().to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| question.contains(w));
    let per_week = context.per_week(now);
    let currency = &context.currency;

    if has(&["plan", "how"]) {
        return format!(
            "To reach your {} goal, you need to save approximately {:.2} {}/week. {}",
            context.goal_name, per_week, currency, PLAN_ADVICE
        );
    }
    if has(&["behind", "catch up"]) {
        return BEHIND_ADVICE.to_string();
    }
    if has(&["motivat", "give up"]) {
        return MOTIVATE_ADVICE.to_string();
    }
    if has(&["strateg", "budget"]) {
        return STRATEGY_ADVICE.to_string();
    }
    format!(
        "You need {:.2} {} more in {} weeks ({:.2} {}/week). {}",
        context.remaining(),
        currency,
        context.weeks_left(now),
        per_week,
        currency,
        DEFAULT_ADVICE
    )
}
