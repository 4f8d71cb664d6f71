//! Unsigned transactions for each vault operation.
//!
//! Nothing here touches the network: the caller fetches [`SuggestedParams`]
//! once, builds, signs and submits.

use log::debug;
use serde::Serialize;

use crate::abi::AbiValue;
use crate::address::Address;
use crate::errors::{ChainError, Result};
use crate::transaction::{
    ApplicationCall, AssetParams, OnComplete, Payment, SuggestedParams, Transaction,
    TransactionGroup, TransactionKind,
};
use crate::vault::{self, VaultMethod, VAULT_GLOBAL_SCHEMA, VAULT_MIN_BALANCE};

/// Protocol minimum fee, used when the node reports none.
pub const MIN_TXN_FEE: u64 = 1000;

pub const ASSET_NAME_MAX_BYTES: usize = 32;
pub const ASSET_URL_MAX_BYTES: usize = 96;
pub const NOTE_MAX_BYTES: usize = 1024;

pub const ACHIEVEMENT_UNIT_NAME: &str = "ASACHV";
const ACHIEVEMENT_NAME_PREFIX: &str = "ASAchv-";
/// Goal names inside the metadata note are capped so the note stays under
/// [`NOTE_MAX_BYTES`].
const NOTE_GOAL_NAME_MAX_BYTES: usize = 256;

/// Snapshot of a completed goal recorded in its achievement asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementMint {
    pub app_id: u64,
    pub goal_name: String,
    pub target_amount: u64,
    pub total_saved: u64,
    /// RFC 3339 timestamp.
    pub completed_at: String,
}

#[derive(Serialize)]
struct Arc3Metadata<'a> {
    standard: &'static str,
    name: String,
    description: String,
    properties: Arc3Properties<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Arc3Properties<'a> {
    goal_name: &'a str,
    target_amount: u64,
    total_saved: u64,
    app_id: u64,
    completed_at: &'a str,
}

/// Builds vault transactions for one sender against one set of network
/// parameters.
#[derive(Debug, Clone)]
pub struct VaultTransactionBuilder<'a> {
    sender: Address,
    params: &'a SuggestedParams,
}

impl<'a> VaultTransactionBuilder<'a> {
    pub fn new(sender: Address, params: &'a SuggestedParams) -> Self {
        Self { sender, params }
    }

    fn min_fee(&self) -> u64 {
        if self.params.min_fee == 0 {
            MIN_TXN_FEE
        } else {
            self.params.min_fee
        }
    }

    fn finish(&self, kind: TransactionKind) -> Result<Transaction> {
        Transaction::new(self.sender, self.params, kind)
            .with_suggested_fee(self.params.fee_per_byte, self.min_fee())
    }

    /// Creates the vault application. The owner is the sender.
    pub fn deploy(&self, target_amount: u64, deadline: u64) -> Result<TransactionGroup> {
        if target_amount == 0 {
            return Err(ChainError::InvalidArgument(
                "target amount must be positive".to_string(),
            ));
        }
        let call = VaultMethod::CreateGoal.abi().encode_call(&[
            AbiValue::Address(self.sender),
            AbiValue::Uint(target_amount),
            AbiValue::Uint(deadline),
        ])?;

        let txn = self.finish(TransactionKind::ApplicationCall(ApplicationCall {
            app_id: 0,
            on_complete: OnComplete::NoOp,
            app_args: call.app_args(),
            approval_program: vault::approval_program()?,
            clear_program: vault::clear_program()?,
            global_schema: Some(VAULT_GLOBAL_SCHEMA),
            local_schema: None,
        }))?;
        debug!("Built deploy transaction, fee {}", txn.fee);
        Ok(TransactionGroup::single(txn))
    }

    /// Pays the contract account its minimum balance.
    pub fn fund(&self, app_id: u64) -> Result<TransactionGroup> {
        require_app(app_id)?;
        let txn = self.finish(TransactionKind::Payment(Payment {
            receiver: Address::for_application(app_id),
            amount: VAULT_MIN_BALANCE,
        }))?;
        Ok(TransactionGroup::single(txn))
    }

    /// `[payment to vault, deposit call]`, grouped.
    pub fn deposit(&self, app_id: u64, amount: u64) -> Result<TransactionGroup> {
        require_app(app_id)?;
        if amount == 0 {
            return Err(ChainError::InvalidArgument(
                "deposit amount must be positive".to_string(),
            ));
        }
        let method = VaultMethod::Deposit.abi();
        let payment = self.finish(TransactionKind::Payment(Payment {
            receiver: Address::for_application(app_id),
            amount,
        }))?;
        let call = self.finish(TransactionKind::ApplicationCall(ApplicationCall {
            app_id,
            app_args: method.encode_call(&[])?.app_args(),
            ..Default::default()
        }))?;

        let group = TransactionGroup::for_method_call(&method, vec![payment], call)?;
        check_deposit_group(&group, app_id)?;
        Ok(group)
    }

    /// The withdraw call. Its flat fee of twice the minimum also pays for the
    /// payment the contract issues back to the owner.
    pub fn withdraw(&self, app_id: u64) -> Result<TransactionGroup> {
        require_app(app_id)?;
        let call = VaultMethod::Withdraw.abi().encode_call(&[])?;
        let txn = Transaction::new(
            self.sender,
            self.params,
            TransactionKind::ApplicationCall(ApplicationCall {
                app_id,
                app_args: call.app_args(),
                ..Default::default()
            }),
        )
        .with_flat_fee(2 * self.min_fee());
        Ok(TransactionGroup::single(txn))
    }

    /// A single-unit asset documenting a completed goal, with ARC-3 metadata
    /// in the note and a link back to the vault.
    pub fn mint_achievement(
        &self,
        mint: &AchievementMint,
        explorer_url: &str,
    ) -> Result<TransactionGroup> {
        require_app(mint.app_id)?;

        let url = format!(
            "{}/application/{}#arc3",
            explorer_url.trim_end_matches('/'),
            mint.app_id
        );
        if url.len() > ASSET_URL_MAX_BYTES {
            return Err(ChainError::InvalidArgument(format!(
                "asset URL is {} bytes, the limit is {}",
                url.len(),
                ASSET_URL_MAX_BYTES
            )));
        }

        let note = achievement_note(mint)?;
        let manager = Some(self.sender);
        let txn = Transaction::new(
            self.sender,
            self.params,
            TransactionKind::AssetCreate(AssetParams {
                total: 1,
                decimals: 0,
                default_frozen: false,
                unit_name: ACHIEVEMENT_UNIT_NAME.to_string(),
                asset_name: achievement_asset_name(&mint.goal_name),
                url,
                manager,
                reserve: manager,
                freeze: manager,
                clawback: manager,
            }),
        )
        .with_note(note)
        .with_suggested_fee(self.params.fee_per_byte, self.min_fee())?;
        Ok(TransactionGroup::single(txn))
    }
}

fn require_app(app_id: u64) -> Result<()> {
    if app_id == 0 {
        return Err(ChainError::InvalidArgument(
            "application id 0 is not a deployed vault".to_string(),
        ));
    }
    Ok(())
}

/// The payment immediately preceding the deposit call must pay that vault's
/// account and share the call's group id.
pub fn check_deposit_group(group: &TransactionGroup, app_id: u64) -> Result<()> {
    let txns = group.transactions();
    let selector = VaultMethod::Deposit.selector();
    let is_deposit_call = |t: &Transaction| {
        t.as_application_call()
            .map(|c| c.app_id == app_id && c.app_args.first().map(Vec::as_slice) == Some(&selector[..]))
            .unwrap_or(false)
    };
    let call_index = txns
        .iter()
        .position(is_deposit_call)
        .ok_or_else(|| ChainError::InvalidGroup("no deposit call in group".to_string()))?;

    let payment_txn = call_index.checked_sub(1).map(|i| &txns[i]).ok_or_else(|| {
        ChainError::InvalidGroup("deposit call has no preceding payment".to_string())
    })?;
    let payment = payment_txn.as_payment().ok_or_else(|| {
        ChainError::InvalidGroup("transaction before the deposit call is not a payment".to_string())
    })?;

    if payment.receiver != Address::for_application(app_id) {
        return Err(ChainError::InvalidGroup(
            "deposit payment does not pay the vault account".to_string(),
        ));
    }
    if payment_txn.group.is_none() || payment_txn.group != txns[call_index].group {
        return Err(ChainError::InvalidGroup(
            "deposit payment and call do not share a group id".to_string(),
        ));
    }
    Ok(())
}

/// `ASAchv-` followed by the whitespace-free goal name, cut on a character
/// boundary to fit the asset name limit.
pub fn achievement_asset_name(goal_name: &str) -> String {
    let compact: String = goal_name.chars().filter(|c| !c.is_whitespace()).collect();
    let budget = ASSET_NAME_MAX_BYTES - ACHIEVEMENT_NAME_PREFIX.len();
    format!("{}{}", ACHIEVEMENT_NAME_PREFIX, truncate_utf8(&compact, budget))
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a char
/// boundary.
pub fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn achievement_note(mint: &AchievementMint) -> Result<Vec<u8>> {
    let goal_name = truncate_utf8(&mint.goal_name, NOTE_GOAL_NAME_MAX_BYTES);
    let metadata = Arc3Metadata {
        standard: "arc3",
        name: format!("AlgoSave Achievement: {}", goal_name),
        description: format!("Goal \"{}\" completed on AlgoSave", goal_name),
        properties: Arc3Properties {
            goal_name,
            target_amount: mint.target_amount,
            total_saved: mint.total_saved,
            app_id: mint.app_id,
            completed_at: &mint.completed_at,
        },
    };
    let note = serde_json::to_vec(&metadata)?;
    if note.len() > NOTE_MAX_BYTES {
        return Err(ChainError::InvalidArgument(format!(
            "metadata note is {} bytes, the limit is {}",
            note.len(),
            NOTE_MAX_BYTES
        )));
    }
    Ok(note)
}
