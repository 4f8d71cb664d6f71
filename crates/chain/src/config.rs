//! Node connection settings.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{ChainError, Result};

pub const DEFAULT_ALGOD_SERVER: &str = "https://testnet-api.algonode.cloud";
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.explorer.perawallet.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_SERVER: &str = "ALGOSAVE_ALGOD_SERVER";
const ENV_TOKEN: &str = "ALGOSAVE_ALGOD_TOKEN";
const ENV_EXPLORER: &str = "ALGOSAVE_EXPLORER_URL";
const ENV_TIMEOUT: &str = "ALGOSAVE_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgodConfig {
    pub server: String,
    /// Sent as `X-Algo-API-Token` when non-empty. Public endpoints need none.
    pub token: String,
    /// Block explorer used for the back-link stored in minted assets.
    pub explorer_url: String,
    pub timeout_secs: u64,
}

impl Default for AlgodConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_ALGOD_SERVER.to_string(),
            token: String::new(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AlgodConfig {
    /// TestNet defaults overridden by `ALGOSAVE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(server) = lookup(ENV_SERVER).filter(|s| !s.trim().is_empty()) {
            config.server = server.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            config.token = token;
        }
        if let Some(explorer) = lookup(ENV_EXPLORER).filter(|s| !s.trim().is_empty()) {
            config.explorer_url = explorer.trim().to_string();
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                ChainError::Config(format!("{} must be a whole number, got {:?}", ENV_TIMEOUT, timeout))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server.starts_with("http://") || self.server.starts_with("https://")) {
            return Err(ChainError::Config(format!(
                "algod server must be an http(s) URL, got {:?}",
                self.server
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ChainError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Explorer page for an application.
    pub fn application_url(&self, app_id: u64) -> String {
        format!("{}/application/{}", self.explorer_url.trim_end_matches('/'), app_id)
    }
}
