use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FLEXIBLE_CURRENCY, MICRO_ALGOS_PER_ALGO, VAULT_CURRENCY};
use crate::flexible::{weeks_left, FlexibleGoal};
use crate::reconciler::ReconciledView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub role: ConversationRole,
    pub content: String,
}

/// Summary of a goal handed to the advice text service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceContext {
    pub goal_name: String,
    /// Whole currency units.
    pub target_amount: Decimal,
    pub current_saved: Decimal,
    pub deadline: DateTime<Utc>,
    pub currency: String,
    pub monthly_income: Option<Decimal>,
    pub monthly_spending: Option<Decimal>,
    pub question: Option<String>,
    pub history: Vec<ConversationTurn>,
}

impl AdviceContext {
    /// Context for a vault, in whole ALGO.
    pub fn for_vault(view: &ReconciledView) -> Self {
        let micro = Decimal::from(MICRO_ALGOS_PER_ALGO);
        let deadline = i64::try_from(view.aggregate.deadline)
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or(view.fetched_at);
        Self {
            goal_name: view.goal.name.clone(),
            target_amount: Decimal::from(view.aggregate.target_amount) / micro,
            current_saved: Decimal::from(view.aggregate.total_saved) / micro,
            deadline,
            currency: VAULT_CURRENCY.to_string(),
            monthly_income: None,
            monthly_spending: None,
            question: None,
            history: Vec::new(),
        }
    }

    pub fn for_flexible(goal: &FlexibleGoal) -> Self {
        Self {
            goal_name: goal.name.clone(),
            target_amount: goal.target_amount,
            current_saved: goal.current_balance(),
            deadline: goal.deadline,
            currency: FLEXIBLE_CURRENCY.to_string(),
            monthly_income: goal.monthly_income,
            monthly_spending: goal.monthly_spending,
            question: None,
            history: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// The user's question, or a request for a plan when none was asked.
    pub fn effective_question(&self) -> String {
        match self.question.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => format!(
                "Create a plan to help me achieve my \"{}\" goal.",
                self.goal_name
            ),
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.target_amount - self.current_saved
    }

    pub fn weeks_left(&self, now: DateTime<Utc>) -> i64 {
        weeks_left(self.deadline, now)
    }

    pub fn per_week(&self, now: DateTime<Utc>) -> Decimal {
        self.remaining() / Decimal::from(self.weeks_left(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdviceSource {
    Provider,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceReply {
    pub text: String,
    pub source: AdviceSource,
}
