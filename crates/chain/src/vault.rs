//! The savings-vault contract: its compiled programs, method interface and
//! global-state schema.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::abi::{AbiArg, AbiMethod, AbiType, TransactionRef};
use crate::address::Address;
use crate::client::{ChainClient, GlobalState, StateValue};
use crate::errors::{ChainError, Result};
use crate::transaction::StateSchema;

const APPROVAL_PROGRAM_B64: &str = "CCACAQAmBgpnb2FsX293bmVyC3RvdGFsX3NhdmVkDmdvYWxfY29tcGxldGVkCGRlYWRsaW5lBOSoxwANdGFyZ2V0X2Ftb3VudDEYIxJAACQ2GgAnBBJAACU2GgCABDYl5OsSQAAyNhoAgAS3NV/REkAAWQA2GgAnBBJEQgAAKDYaAWcnBTYaAhdnKzYaAxdnKSNnKiNnIkMxAChkEkQyBytkDEQqZCMSRDEWIgk4BzIKEkQpKWQxFiIJOAgIZylkJwVkD0EAAyoiZyJDMQAoZBJEKmQiEjIHK2QPEUSxIrIQKGSyByOyCCOyAShksgmzIkM=";
const CLEAR_PROGRAM_B64: &str = "CIEB";

/// Minimum balance a contract account must hold, in microAlgos.
pub const VAULT_MIN_BALANCE: u64 = 100_000;

/// 4 integers and 1 byte slice.
pub const VAULT_GLOBAL_SCHEMA: StateSchema = StateSchema {
    num_uints: 4,
    num_byte_slices: 1,
};

pub const KEY_OWNER: &str = "goal_owner";
pub const KEY_TARGET: &str = "target_amount";
pub const KEY_TOTAL_SAVED: &str = "total_saved";
pub const KEY_DEADLINE: &str = "deadline";
pub const KEY_COMPLETED: &str = "goal_completed";

pub fn approval_program() -> Result<Vec<u8>> {
    decode_program(APPROVAL_PROGRAM_B64)
}

pub fn clear_program() -> Result<Vec<u8>> {
    decode_program(CLEAR_PROGRAM_B64)
}

fn decode_program(b64: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(b64)
        .map_err(|e| ChainError::Encoding(format!("invalid program constant: {}", e)))
}

/// Methods the vault routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultMethod {
    CreateGoal,
    Deposit,
    Withdraw,
}

impl VaultMethod {
    pub fn abi(&self) -> AbiMethod {
        match self {
            VaultMethod::CreateGoal => AbiMethod::from_parts(
                "create_goal",
                vec![
                    AbiArg::new("owner", AbiType::Address),
                    AbiArg::new("target_amount", AbiType::Uint(64)),
                    AbiArg::new("deadline", AbiType::Uint(64)),
                ],
                None,
            ),
            VaultMethod::Deposit => AbiMethod::from_parts(
                "deposit",
                vec![AbiArg::new(
                    "payment",
                    AbiType::Transaction(TransactionRef::Payment),
                )],
                None,
            ),
            VaultMethod::Withdraw => AbiMethod::from_parts("withdraw", vec![], None),
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        self.abi().selector()
    }
}

/// The on-chain aggregate of one vault, plus the balance of its account.
///
/// Never cached: each read replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultState {
    pub owner: Address,
    pub target_amount: u64,
    pub total_saved: u64,
    /// Unix seconds.
    pub deadline: u64,
    pub completed: bool,
    pub balance: u64,
}

impl VaultState {
    /// The aggregate of a vault that was never deployed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes global state. Every slot is required; a missing or mistyped
    /// slot means the application is not a vault.
    pub fn decode(app_id: u64, state: &GlobalState, balance: u64) -> Result<Self> {
        let owner = match state.get(KEY_OWNER) {
            Some(StateValue::Bytes(bytes)) => Address::from_slice(bytes).map_err(|_| {
                ChainError::malformed_state(app_id, format!("'{}' is not an address", KEY_OWNER))
            })?,
            Some(StateValue::Uint(_)) => {
                return Err(ChainError::malformed_state(
                    app_id,
                    format!("'{}' should be bytes", KEY_OWNER),
                ))
            }
            None => {
                return Err(ChainError::malformed_state(
                    app_id,
                    format!("missing key '{}'", KEY_OWNER),
                ))
            }
        };

        Ok(Self {
            owner,
            target_amount: required_uint(app_id, state, KEY_TARGET)?,
            total_saved: required_uint(app_id, state, KEY_TOTAL_SAVED)?,
            deadline: required_uint(app_id, state, KEY_DEADLINE)?,
            completed: required_uint(app_id, state, KEY_COMPLETED)? != 0,
            balance,
        })
    }
}

fn required_uint(app_id: u64, state: &GlobalState, key: &str) -> Result<u64> {
    match state.get(key) {
        Some(StateValue::Uint(v)) => Ok(*v),
        Some(StateValue::Bytes(_)) => Err(ChainError::malformed_state(
            app_id,
            format!("'{}' should be an integer", key),
        )),
        None => Err(ChainError::malformed_state(
            app_id,
            format!("missing key '{}'", key),
        )),
    }
}

/// Fetches and decodes a vault's state and balance. Application id 0 is the
/// placeholder for "not deployed" and returns [`VaultState::empty`] without a
/// network call.
pub async fn read_vault_state<C: ChainClient + ?Sized>(client: &C, app_id: u64) -> Result<VaultState> {
    if app_id == 0 {
        return Ok(VaultState::empty());
    }
    let address = Address::for_application(app_id);
    let (global, balance) = tokio::join!(
        client.fetch_global_state(app_id),
        client.fetch_account_balance(&address)
    );
    let balance = match balance {
        Ok(balance) => balance,
        Err(ChainError::NotFound(_)) => 0,
        Err(e) => return Err(e),
    };
    VaultState::decode(app_id, &global?, balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> GlobalState {
        let mut state = GlobalState::new();
        state.insert(KEY_OWNER.to_string(), StateValue::Bytes(vec![5u8; 32]));
        state.insert(KEY_TARGET.to_string(), StateValue::Uint(10_000_000));
        state.insert(KEY_TOTAL_SAVED.to_string(), StateValue::Uint(4_000_000));
        state.insert(KEY_DEADLINE.to_string(), StateValue::Uint(1_800_000_000));
        state.insert(KEY_COMPLETED.to_string(), StateValue::Uint(0));
        state
    }

    #[test]
    fn test_programs_decode() {
        let approval = approval_program().unwrap();
        assert!(!approval.is_empty());
        // TEAL version byte
        assert_eq!(approval[0], 8);
        assert_eq!(clear_program().unwrap(), vec![0x08, 0x81, 0x01]);
    }

    #[test]
    fn test_method_selectors() {
        assert_eq!(VaultMethod::CreateGoal.selector(), [0xe4, 0xa8, 0xc7, 0x00]);
        assert_eq!(VaultMethod::Deposit.selector(), [0x36, 0x25, 0xe4, 0xeb]);
        assert_eq!(VaultMethod::Withdraw.selector(), [0xb7, 0x35, 0x5f, 0xd1]);
    }

    #[test]
    fn test_decode_full_state() {
        let state = VaultState::decode(7, &full_state(), 4_100_000).unwrap();
        assert_eq!(state.owner, Address::new([5u8; 32]));
        assert_eq!(state.target_amount, 10_000_000);
        assert_eq!(state.total_saved, 4_000_000);
        assert!(!state.completed);
        assert_eq!(state.balance, 4_100_000);
    }

    #[test]
    fn test_missing_slot_is_malformed_not_zero() {
        for key in [KEY_OWNER, KEY_TARGET, KEY_TOTAL_SAVED, KEY_DEADLINE, KEY_COMPLETED] {
            let mut state = full_state();
            state.remove(key);
            let err = VaultState::decode(7, &state, 0).unwrap_err();
            assert!(
                matches!(err, ChainError::MalformedState { app_id: 7, .. }),
                "removing {key} should fail"
            );
        }
    }

    #[test]
    fn test_mistyped_slot_is_malformed() {
        let mut state = full_state();
        state.insert(KEY_TOTAL_SAVED.to_string(), StateValue::Bytes(vec![1]));
        assert!(VaultState::decode(7, &state, 0).is_err());
    }
}
