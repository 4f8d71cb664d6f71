use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::rates_traits::RateSource;

/// Used until a fetch has ever succeeded.
pub const FALLBACK_ALGO_INR_RATE: Decimal = dec!(150);
pub const RATE_CACHE_TTL_SECONDS: i64 = 300;

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: Decimal,
    fetched_at: DateTime<Utc>,
}

/// Display-only conversion rate with a short cache.
///
/// Never fails: a failed fetch serves the last cached rate, or the fixed
/// fallback when nothing was ever fetched.
pub struct CachedRateProvider {
    source: Arc<dyn RateSource>,
    ttl: Duration,
    fallback: Decimal,
    cache: RwLock<HashMap<String, CachedRate>>,
}

impl CachedRateProvider {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            source,
            ttl: Duration::seconds(RATE_CACHE_TTL_SECONDS),
            fallback: FALLBACK_ALGO_INR_RATE,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn rate(&self, fiat: &str) -> Decimal {
        self.rate_at(fiat, Utc::now()).await
    }

    pub async fn rate_at(&self, fiat: &str, now: DateTime<Utc>) -> Decimal {
        let key = fiat.to_uppercase();
        let cached = self.cached(&key);

        if let Some(entry) = cached {
            if now - entry.fetched_at < self.ttl {
                return entry.rate;
            }
        }

        match self.source.fetch_rate(&key).await {
            Ok(rate) => {
                debug!("Fetched ALGO/{} rate {}", key, rate);
                if let Ok(mut cache) = self.cache.write() {
                    cache.insert(
                        key,
                        CachedRate {
                            rate,
                            fetched_at: now,
                        },
                    );
                }
                rate
            }
            Err(e) => {
                warn!("Failed to fetch ALGO/{} rate, using fallback: {}", key, e);
                cached.map(|entry| entry.rate).unwrap_or(self.fallback)
            }
        }
    }

    /// Last known rate without touching the network.
    pub fn cached_rate(&self, fiat: &str) -> Decimal {
        self.cached(&fiat.to_uppercase())
            .map(|entry| entry.rate)
            .unwrap_or(self.fallback)
    }

    /// Whole ALGO converted at the last known rate.
    pub fn convert(&self, algo: Decimal, fiat: &str) -> Decimal {
        algo * self.cached_rate(fiat)
    }

    fn cached(&self, key: &str) -> Option<CachedRate> {
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, Result};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct ScriptedSource {
        rate: Decimal,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(rate: Decimal) -> Arc<Self> {
            Arc::new(Self {
                rate,
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RateSource for ScriptedSource {
        async fn fetch_rate(&self, _fiat: &str) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(Error::Network("offline".to_string()))
            } else {
                Ok(self.rate)
            }
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_serves_cache_within_ttl() {
        let source = ScriptedSource::new(dec!(18.5));
        let provider = CachedRateProvider::new(source.clone());

        assert_eq!(provider.rate_at("inr", t0()).await, dec!(18.5));
        assert_eq!(
            provider.rate_at("INR", t0() + Duration::seconds(299)).await,
            dec!(18.5)
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        provider.rate_at("INR", t0() + Duration::seconds(300)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_uses_last_rate_then_fallback() {
        let source = ScriptedSource::new(dec!(18.5));
        source.failing.store(true, Ordering::SeqCst);
        let provider = CachedRateProvider::new(source.clone());

        assert_eq!(provider.rate_at("INR", t0()).await, FALLBACK_ALGO_INR_RATE);

        source.failing.store(false, Ordering::SeqCst);
        provider.rate_at("INR", t0()).await;
        source.failing.store(true, Ordering::SeqCst);
        let later = t0() + Duration::minutes(30);
        assert_eq!(provider.rate_at("INR", later).await, dec!(18.5));
    }

    #[tokio::test]
    async fn test_convert_uses_cached_rate() {
        let provider = CachedRateProvider::new(ScriptedSource::new(dec!(20)));
        assert_eq!(provider.convert(dec!(2.5), "INR"), dec!(375));
        provider.rate_at("INR", t0()).await;
        assert_eq!(provider.convert(dec!(2.5), "INR"), dec!(50));
    }
}
