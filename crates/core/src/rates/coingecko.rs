use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;

use super::rates_traits::RateSource;
use crate::errors::{Error, Result};

const BASE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
const COIN_ID: &str = "algorand";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `{"algorand": {"inr": 15.2}}`
type SimplePriceResponse = HashMap<String, HashMap<String, Decimal>>;

/// Public CoinGecko simple-price endpoint. No key required.
pub struct CoinGeckoRateSource {
    client: Client,
    base_url: String,
}

impl CoinGeckoRateSource {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for CoinGeckoRateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for CoinGeckoRateSource {
    async fn fetch_rate(&self, fiat: &str) -> Result<Decimal> {
        let fiat = fiat.to_lowercase();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ids", COIN_ID), ("vs_currencies", fiat.as_str())])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Rate request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Rate request returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Rate response unreadable: {}", e)))?;
        parse_rate(&body, &fiat)
    }
}

/// Extracts the ALGO price in `fiat` (lowercase) from a simple-price body.
fn parse_rate(body: &str, fiat: &str) -> Result<Decimal> {
    let prices: SimplePriceResponse = serde_json::from_str(body)
        .map_err(|e| Error::Network(format!("Malformed rate response: {}", e)))?;

    prices
        .get(COIN_ID)
        .and_then(|by_fiat| by_fiat.get(fiat))
        .copied()
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
        .ok_or_else(|| Error::NotFound(format!("No ALGO rate for {}", fiat)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simple_price_parses_api_shape() {
        let body = r#"{"algorand":{"inr":15.23,"usd":0.1834}}"#;
        assert_eq!(parse_rate(body, "inr").unwrap(), dec!(15.23));
        assert_eq!(parse_rate(body, "usd").unwrap(), dec!(0.1834));
    }

    #[test]
    fn test_missing_or_zero_rate_is_not_found() {
        let body = r#"{"algorand":{"inr":0}}"#;
        assert_eq!(parse_rate(body, "inr").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(parse_rate(body, "eur").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(parse_rate("{}", "inr").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_error_body_is_malformed() {
        let body = r#"{"status":{"error_code":429,"error_message":"rate limited"}}"#;
        assert_eq!(parse_rate(body, "inr").unwrap_err().kind(), ErrorKind::Network);
    }
}
