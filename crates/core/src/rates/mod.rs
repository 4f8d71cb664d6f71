//! ALGO to fiat display rates. Read-only and never part of goal state.

mod coingecko;
mod rates_provider;
mod rates_traits;

pub use coingecko::CoinGeckoRateSource;
pub use rates_provider::{CachedRateProvider, FALLBACK_ALGO_INR_RATE, RATE_CACHE_TTL_SECONDS};
pub use rates_traits::RateSource;
