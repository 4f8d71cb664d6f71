//! The signing collaborator.
//!
//! Key custody lives outside this workspace (a wallet, a hardware device, a
//! KMS). The core only needs signed bytes back, in the order it asked.

use async_trait::async_trait;

use crate::errors::{ChainError, Result};
use crate::transaction::{Transaction, TransactionGroup};

#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Signs `transactions` and returns one signed encoding per input, in the
    /// same order. A user declining must surface as
    /// [`ChainError::UserRejected`].
    async fn sign_transactions(&self, transactions: &[Transaction]) -> Result<Vec<Vec<u8>>>;
}

/// Signs a whole group and checks the signer honoured the contract.
pub async fn sign_group<S: TransactionSigner + ?Sized>(
    signer: &S,
    group: &TransactionGroup,
) -> Result<Vec<Vec<u8>>> {
    let signed = signer.sign_transactions(group.transactions()).await?;
    if signed.len() != group.len() {
        return Err(ChainError::Signer(format!(
            "asked to sign {} transaction(s), got {}",
            group.len(),
            signed.len()
        )));
    }
    if signed.iter().any(Vec::is_empty) {
        return Err(ChainError::Signer("signer returned an empty transaction".to_string()));
    }
    Ok(signed)
}
