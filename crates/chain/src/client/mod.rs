//! Ledger access.
//!
//! [`ChainClient`] is the narrow surface the rest of the workspace needs from
//! a node. [`AlgodClient`] implements it over HTTP; tests substitute an
//! in-memory ledger.

mod algod;
mod models;

pub use algod::AlgodClient;
pub use models::{GlobalState, NodeStatus, PendingTransaction, StateValue};

use async_trait::async_trait;
use log::{debug, warn};

use crate::address::Address;
use crate::errors::{ChainError, Result, RetryClass};
use crate::transaction::SuggestedParams;

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn suggested_params(&self) -> Result<SuggestedParams>;

    /// Submits a signed group (or single transaction) and returns the id of
    /// its first transaction.
    async fn submit(&self, signed: &[Vec<u8>]) -> Result<String>;

    async fn pending_transaction(&self, txid: &str) -> Result<PendingTransaction>;

    async fn status(&self) -> Result<NodeStatus>;

    /// Blocks until the node has seen a round after `round`.
    async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus>;

    async fn fetch_global_state(&self, app_id: u64) -> Result<GlobalState>;

    async fn fetch_account_balance(&self, address: &Address) -> Result<u64>;
}

/// Waits up to `max_rounds` rounds for `txid` to be confirmed.
///
/// A timeout means the outcome is unknown: the transaction may still land.
/// Callers must re-read state instead of submitting again.
pub async fn await_confirmation<C: ChainClient + ?Sized>(
    client: &C,
    txid: &str,
    max_rounds: u64,
) -> Result<PendingTransaction> {
    let max_rounds = max_rounds.max(1);
    let start_round = client.status().await?.last_round + 1;
    let mut current_round = start_round;

    while current_round < start_round + max_rounds {
        match client.pending_transaction(txid).await {
            Ok(pending) if pending.is_confirmed() => {
                debug!(
                    "Transaction {} confirmed in round {:?}",
                    txid, pending.confirmed_round
                );
                return Ok(pending);
            }
            Ok(pending) if !pending.pool_error.is_empty() => {
                return Err(ChainError::PoolRejected {
                    txid: txid.to_string(),
                    reason: pending.pool_error,
                });
            }
            Ok(_) => {}
            // Not yet visible to this node, or a transient transport failure.
            Err(ChainError::NotFound(_)) => {}
            Err(e) if e.retry_class() == RetryClass::Retry => {
                warn!("Polling transaction {} failed, will retry: {}", txid, e);
            }
            Err(e) => return Err(e),
        }
        client.wait_for_block_after(current_round).await?;
        current_round += 1;
    }

    Err(ChainError::ConfirmationTimeout {
        txid: txid.to_string(),
        rounds: max_rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Confirms after a fixed number of polls, or reports a pool error.
    struct ScriptedClient {
        polls: Mutex<u64>,
        confirm_after: Option<u64>,
        pool_error: Option<String>,
    }

    impl ScriptedClient {
        fn new(confirm_after: Option<u64>, pool_error: Option<&str>) -> Self {
            Self {
                polls: Mutex::new(0),
                confirm_after,
                pool_error: pool_error.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl ChainClient for ScriptedClient {
        async fn suggested_params(&self) -> Result<SuggestedParams> {
            unimplemented!()
        }
        async fn submit(&self, _signed: &[Vec<u8>]) -> Result<String> {
            unimplemented!()
        }
        async fn pending_transaction(&self, _txid: &str) -> Result<PendingTransaction> {
            let mut polls = self.polls.lock().unwrap();
            *polls += 1;
            if let Some(reason) = &self.pool_error {
                return Ok(PendingTransaction {
                    pool_error: reason.clone(),
                    ..Default::default()
                });
            }
            match self.confirm_after {
                Some(n) if *polls >= n => Ok(PendingTransaction {
                    confirmed_round: Some(100 + *polls),
                    ..Default::default()
                }),
                _ => Ok(PendingTransaction::default()),
            }
        }
        async fn status(&self) -> Result<NodeStatus> {
            Ok(NodeStatus { last_round: 100 })
        }
        async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus> {
            Ok(NodeStatus {
                last_round: round + 1,
            })
        }
        async fn fetch_global_state(&self, _app_id: u64) -> Result<GlobalState> {
            unimplemented!()
        }
        async fn fetch_account_balance(&self, _address: &Address) -> Result<u64> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_confirms_within_budget() {
        let client = ScriptedClient::new(Some(3), None);
        let pending = await_confirmation(&client, "TX1", 4).await.unwrap();
        assert_eq!(pending.confirmed_round, Some(103));
    }

    #[tokio::test]
    async fn test_times_out_with_unknown_outcome() {
        let client = ScriptedClient::new(Some(10), None);
        let err = await_confirmation(&client, "TX2", 4).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::ConfirmationTimeout { ref txid, rounds: 4 } if txid == "TX2"
        ));
        assert_eq!(err.retry_class(), RetryClass::RepollState);
        assert_eq!(*client.polls.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_pool_error_is_reported() {
        let client = ScriptedClient::new(None, Some("overspend"));
        let err = await_confirmation(&client, "TX3", 4).await.unwrap_err();
        assert!(matches!(err, ChainError::PoolRejected { .. }));
    }
}
