//! Response shapes of the algod v2 REST API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /v2/transactions/params`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionParamsResponse {
    pub fee: u64,
    #[serde(rename = "genesis-hash")]
    pub genesis_hash: String,
    #[serde(rename = "genesis-id")]
    pub genesis_id: String,
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "min-fee")]
    pub min_fee: u64,
}

/// `POST /v2/transactions`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}

/// `GET /v2/transactions/pending/{txid}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransaction {
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    /// Non-empty once the node has dropped the transaction.
    #[serde(default)]
    pub pool_error: String,
    /// Set when the transaction created an application.
    #[serde(default)]
    pub application_index: Option<u64>,
    /// Set when the transaction created an asset.
    #[serde(default)]
    pub asset_index: Option<u64>,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.unwrap_or(0) > 0
    }
}

/// `GET /v2/status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
}

/// `GET /v2/applications/{id}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApplicationResponse {
    pub params: ApplicationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApplicationParams {
    #[serde(rename = "global-state", default)]
    pub global_state: Vec<StateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StateEntry {
    /// Base64 key.
    pub key: String,
    pub value: TealValue,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TealValue {
    /// 1 = bytes, 2 = uint.
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub bytes: String,
    #[serde(default)]
    pub uint: u64,
}

/// `GET /v2/accounts/{address}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountResponse {
    pub amount: u64,
}

/// A decoded global-state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateValue {
    Bytes(Vec<u8>),
    Uint(u64),
}

/// Global state keyed by slot name.
pub type GlobalState = BTreeMap<String, StateValue>;
