//! HTTP client for an algod node.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;

use super::models::*;
use super::ChainClient;
use crate::address::Address;
use crate::config::AlgodConfig;
use crate::errors::{ChainError, Result};
use crate::transaction::SuggestedParams;

const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Talks to the algod v2 REST API.
#[derive(Debug, Clone)]
pub struct AlgodClient {
    client: reqwest::Client,
    base_url: String,
}

impl AlgodClient {
    pub fn new(config: &AlgodConfig) -> Result<Self> {
        config.validate()?;
        let mut headers = HeaderMap::new();
        if !config.token.is_empty() {
            let token = HeaderValue::from_str(&config.token)
                .map_err(|_| ChainError::Config("Invalid algod token format".to_string()))?;
            headers.insert(TOKEN_HEADER, token);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    /// Parse a JSON response body, mapping node errors to their kinds.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("algod response ({}): {}", status, body);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(classify_error(status, message));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize algod response. Body: {}, Error: {}", body, e);
            ChainError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }
}

/// Maps a failed response to a distinct error kind.
pub(crate) fn classify_error(status: StatusCode, message: String) -> ChainError {
    match status {
        StatusCode::NOT_FOUND => ChainError::NotFound(message),
        StatusCode::BAD_REQUEST if message.to_lowercase().contains("fee too low") => {
            ChainError::FeeTooLow(message)
        }
        StatusCode::BAD_REQUEST => ChainError::Rejected(message),
        _ => ChainError::api(status.as_u16(), message),
    }
}

#[async_trait]
impl ChainClient for AlgodClient {
    async fn suggested_params(&self) -> Result<SuggestedParams> {
        let params: TransactionParamsResponse = self.get("/v2/transactions/params").await?;
        let hash = BASE64
            .decode(params.genesis_hash.as_bytes())
            .map_err(|e| ChainError::api(200, format!("Invalid genesis hash: {}", e)))?;
        let genesis_hash: [u8; 32] = hash
            .as_slice()
            .try_into()
            .map_err(|_| ChainError::api(200, "Genesis hash is not 32 bytes"))?;

        Ok(SuggestedParams {
            fee_per_byte: params.fee,
            min_fee: params.min_fee,
            last_round: params.last_round,
            genesis_id: params.genesis_id,
            genesis_hash,
        })
    }

    async fn submit(&self, signed: &[Vec<u8>]) -> Result<String> {
        let body: Vec<u8> = signed.concat();
        debug!("Submitting {} signed transaction(s), {} bytes", signed.len(), body.len());

        let response = self
            .client
            .post(self.url("/v2/transactions"))
            .header(CONTENT_TYPE, "application/x-binary")
            .body(body)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        Ok(submitted.tx_id)
    }

    async fn pending_transaction(&self, txid: &str) -> Result<PendingTransaction> {
        self.get(&format!("/v2/transactions/pending/{}", txid)).await
    }

    async fn status(&self) -> Result<NodeStatus> {
        self.get("/v2/status").await
    }

    async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus> {
        self.get(&format!("/v2/status/wait-for-block-after/{}", round))
            .await
    }

    async fn fetch_global_state(&self, app_id: u64) -> Result<GlobalState> {
        let app: ApplicationResponse = self.get(&format!("/v2/applications/{}", app_id)).await?;

        let mut state = GlobalState::new();
        for entry in app.params.global_state {
            let key = BASE64
                .decode(entry.key.as_bytes())
                .map_err(|e| ChainError::malformed_state(app_id, format!("bad key: {}", e)))?;
            let value = match entry.value.kind {
                1 => StateValue::Bytes(BASE64.decode(entry.value.bytes.as_bytes()).map_err(
                    |e| ChainError::malformed_state(app_id, format!("bad bytes value: {}", e)),
                )?),
                2 => StateValue::Uint(entry.value.uint),
                other => {
                    return Err(ChainError::malformed_state(
                        app_id,
                        format!("unknown value type {}", other),
                    ))
                }
            };
            state.insert(String::from_utf8_lossy(&key).into_owned(), value);
        }
        Ok(state)
    }

    async fn fetch_account_balance(&self, address: &Address) -> Result<u64> {
        let account: AccountResponse = self.get(&format!("/v2/accounts/{}", address)).await?;
        Ok(account.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_too_low_is_distinct() {
        let err = classify_error(
            StatusCode::BAD_REQUEST,
            "TransactionPool.Remember: transaction ABC: fee too low: 1000 < 2000".to_string(),
        );
        assert!(matches!(err, ChainError::FeeTooLow(_)));
    }

    #[test]
    fn test_other_rejections() {
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, "overspend".to_string()),
            ChainError::Rejected(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, "application does not exist".to_string()),
            ChainError::NotFound(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::SERVICE_UNAVAILABLE, "busy".to_string()),
            ChainError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn test_pending_transaction_parses_node_shape() {
        let json = r#"{"confirmed-round": 1234, "pool-error": "", "application-index": 99}"#;
        let pending: PendingTransaction = serde_json::from_str(json).unwrap();
        assert!(pending.is_confirmed());
        assert_eq!(pending.application_index, Some(99));
        assert_eq!(pending.asset_index, None);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = AlgodConfig {
            server: "ftp://node".to_string(),
            ..Default::default()
        };
        assert!(AlgodClient::new(&config).is_err());
    }
}
