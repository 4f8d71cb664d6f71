use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Rounds a freshly built transaction stays valid for.
pub const VALIDITY_WINDOW: u64 = 1000;

/// Network parameters returned by `GET /v2/transactions/params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedParams {
    /// Fee per encoded byte; zero on an uncongested network.
    pub fee_per_byte: u64,
    pub min_fee: u64,
    pub last_round: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

impl SuggestedParams {
    pub fn first_valid(&self) -> u64 {
        self.last_round
    }

    pub fn last_valid(&self) -> u64 {
        self.last_round.saturating_add(VALIDITY_WINDOW)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnComplete {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

impl OnComplete {
    pub fn code(&self) -> u64 {
        match self {
            OnComplete::NoOp => 0,
            OnComplete::OptIn => 1,
            OnComplete::CloseOut => 2,
            OnComplete::ClearState => 3,
            OnComplete::UpdateApplication => 4,
            OnComplete::DeleteApplication => 5,
        }
    }
}

/// Storage slots an application reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSchema {
    pub num_uints: u64,
    pub num_byte_slices: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub receiver: Address,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCall {
    /// Zero when creating an application.
    pub app_id: u64,
    pub on_complete: OnComplete,
    pub app_args: Vec<Vec<u8>>,
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub global_schema: Option<StateSchema>,
    pub local_schema: Option<StateSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Payment(Payment),
    ApplicationCall(ApplicationCall),
    AssetCreate(AssetParams),
}

impl TransactionKind {
    /// The wire `type` field.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TransactionKind::Payment(_) => "pay",
            TransactionKind::ApplicationCall(_) => "appl",
            TransactionKind::AssetCreate(_) => "acfg",
        }
    }
}

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
    pub note: Vec<u8>,
    pub group: Option<[u8; 32]>,
    pub kind: TransactionKind,
}

impl Transaction {
    /// A transaction with zero fee; call [`Transaction::with_suggested_fee`] or set
    /// `fee` before signing.
    pub fn new(sender: Address, params: &SuggestedParams, kind: TransactionKind) -> Self {
        Self {
            sender,
            fee: 0,
            first_valid: params.first_valid(),
            last_valid: params.last_valid(),
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            note: Vec::new(),
            group: None,
            kind,
        }
    }

    pub fn with_note(mut self, note: Vec<u8>) -> Self {
        self.note = note;
        self
    }

    pub fn as_payment(&self) -> Option<&Payment> {
        match &self.kind {
            TransactionKind::Payment(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_application_call(&self) -> Option<&ApplicationCall> {
        match &self.kind {
            TransactionKind::ApplicationCall(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_asset_create(&self) -> Option<&AssetParams> {
        match &self.kind {
            TransactionKind::AssetCreate(a) => Some(a),
            _ => None,
        }
    }
}
