//! Goal advice. The text itself comes from an external provider; this module
//! builds its context and answers on its own when the provider cannot.

mod advice_model;
mod advice_service;

pub use advice_model::{
    AdviceContext, AdviceReply, AdviceSource, ConversationRole, ConversationTurn,
};
pub use advice_service::{fallback_advice, AdviceProvider, AdviceService};
