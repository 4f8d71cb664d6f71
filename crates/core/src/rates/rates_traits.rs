use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

/// A live quote for one ALGO in a fiat currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self, fiat: &str) -> Result<Decimal>;
}
