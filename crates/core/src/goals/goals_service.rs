use algosave_chain::{
    await_confirmation, read_vault_state, sign_group, AchievementMint, Address, ChainClient,
    ChainError, PendingTransaction, TransactionGroup, TransactionSigner, VaultTransactionBuilder,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::goals_lifecycle::{
    ensure_can_deposit, ensure_can_withdraw, ensure_owner, validate_new_goal, GoalState,
};
use super::goals_model::{
    DepositHistoryEntry, EngineConfig, Goal, GoalDeposit, GoalWithdrawal, MintedAchievement,
    NewGoal, OnChainAggregate, PendingOperation, PendingSubmission, TransactionStatus,
};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::achievements::{vault_achievements, AchievementProgress};
use crate::errors::{Error, Result, ValidationError};
use crate::health::{score_goal, HealthReport};
use crate::nfts::{AchievementNft, NftRepositoryTrait};
use crate::reconciler::{reconcile, ReconciledView};

/// Lifecycle engine for on-chain goals.
///
/// Deposits, withdrawals, funding and mints are single-flight per vault.
/// Reads never take the per-vault lock.
pub struct GoalService {
    chain: Arc<dyn ChainClient>,
    signer: Arc<dyn TransactionSigner>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    nft_repository: Arc<dyn NftRepositoryTrait>,
    config: EngineConfig,
    in_flight: DashMap<u64, ()>,
    /// Mints confirmed this session, kept even when the store is down.
    minted: DashMap<String, AchievementNft>,
    /// Unresolved submissions by transaction id, kept even when the store is
    /// down.
    pending: DashMap<String, PendingSubmission>,
}

/// What an operation submits for a goal, recorded if the outcome goes
/// unknown.
struct Intent<'a> {
    goal: &'a Goal,
    operation: PendingOperation,
    amount: u64,
    target_amount: u64,
}

impl<'a> Intent<'a> {
    fn new(goal: &'a Goal, operation: PendingOperation, amount: u64) -> Self {
        Self {
            goal,
            operation,
            amount,
            target_amount: 0,
        }
    }
}

/// Releases a vault's in-flight slot when the operation ends, however it ends.
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<u64, ()>,
    app_id: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.app_id);
    }
}

impl GoalService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        signer: Arc<dyn TransactionSigner>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        nft_repository: Arc<dyn NftRepositoryTrait>,
        config: EngineConfig,
    ) -> Self {
        Self {
            chain,
            signer,
            goal_repository,
            nft_repository,
            config,
            in_flight: DashMap::new(),
            minted: DashMap::new(),
            pending: DashMap::new(),
        }
    }

    fn begin_operation(&self, goal: &Goal) -> Result<InFlightGuard<'_>> {
        match self.in_flight.entry(goal.app_id) {
            Entry::Occupied(_) => Err(Error::OperationInFlight(goal.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightGuard {
                    in_flight: &self.in_flight,
                    app_id: goal.app_id,
                })
            }
        }
    }

    async fn fetch_aggregate(&self, app_id: u64) -> Result<OnChainAggregate> {
        let state = read_vault_state(self.chain.as_ref(), app_id).await?;
        Ok(state.into())
    }

    /// Fresh aggregate plus whatever local history is available.
    async fn build_view(&self, goal: Goal) -> Result<ReconciledView> {
        let aggregate = self.fetch_aggregate(goal.app_id).await?;
        let log = self.goal_repository.list_deposits(&goal.id).unwrap_or_else(|e| {
            warn!("Deposit history unavailable for goal {}: {}", goal.id, e);
            Vec::new()
        });
        let withdrawal = self.goal_repository.get_withdrawal(&goal.id).unwrap_or_else(|e| {
            warn!("Withdrawal record unavailable for goal {}: {}", goal.id, e);
            None
        });
        Ok(reconcile(goal, log, aggregate, withdrawal, Utc::now()))
    }

    /// Signs, submits and waits for a group. Returns the first transaction id
    /// with its confirmation.
    ///
    /// The id is fixed before anything is sent, so every failure after the
    /// bytes leave is reported against it as an unknown outcome.
    async fn sign_and_confirm(
        &self,
        group: &TransactionGroup,
    ) -> Result<(String, PendingTransaction)> {
        let txid = group
            .ids()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::TransactionBuild("group is empty".to_string()))?;
        let signed = sign_group(self.signer.as_ref(), group).await?;
        self.chain
            .submit(&signed)
            .await
            .map_err(|e| Error::from_submission(&txid, e))?;
        debug!("Submitted group of {} with first id {}", group.len(), txid);
        let pending =
            await_confirmation(self.chain.as_ref(), &txid, self.config.confirmation_rounds)
                .await
                .map_err(|e| Error::from_confirmation(&txid, e))?;
        Ok((txid, pending))
    }

    /// [`Self::sign_and_confirm`] for a goal operation. An unknown outcome is
    /// remembered until [`Self::resolve_submission`] settles it.
    async fn confirm_for_goal(
        &self,
        group: &TransactionGroup,
        intent: Intent<'_>,
    ) -> Result<(String, PendingTransaction)> {
        let result = self.sign_and_confirm(group).await;
        if let Err(e) = &result {
            if let Some(txid) = e.pending_txid() {
                let last_valid = group
                    .transactions()
                    .iter()
                    .map(|t| t.last_valid)
                    .min()
                    .unwrap_or_default();
                self.remember_pending(PendingSubmission {
                    transaction_id: txid.to_string(),
                    goal_id: intent.goal.id.clone(),
                    operation: intent.operation,
                    amount: intent.amount,
                    target_amount: intent.target_amount,
                    last_valid,
                    submitted_at: Utc::now(),
                })
                .await;
            }
        }
        result
    }

    async fn remember_pending(&self, submission: PendingSubmission) {
        warn!(
            "{} for goal {} left unconfirmed as {}",
            submission.operation.as_str(),
            submission.goal_id,
            submission.transaction_id
        );
        self.pending
            .insert(submission.transaction_id.clone(), submission.clone());
        if let Err(e) = self.goal_repository.save_pending_submission(submission).await {
            warn!("Pending submission not saved locally: {}", e);
        }
    }

    async fn forget_pending(&self, txid: &str) {
        self.pending.remove(txid);
        if let Err(e) = self
            .goal_repository
            .clear_pending_submission(txid.to_string())
            .await
        {
            warn!("Could not clear pending submission {}: {}", txid, e);
        }
    }

    fn find_pending(&self, txid: &str) -> Option<PendingSubmission> {
        if let Some(found) = self.pending.get(txid) {
            return Some(found.value().clone());
        }
        self.goal_repository
            .get_pending_submission(txid)
            .unwrap_or_else(|e| {
                warn!("Pending submissions unavailable: {}", e);
                None
            })
    }

    fn pending_for_goal(&self, goal_id: &str) -> Vec<PendingSubmission> {
        let mut by_txid: HashMap<String, PendingSubmission> = self
            .goal_repository
            .list_pending_submissions(goal_id)
            .unwrap_or_else(|e| {
                warn!("Pending submissions unavailable for goal {}: {}", goal_id, e);
                Vec::new()
            })
            .into_iter()
            .map(|p| (p.transaction_id.clone(), p))
            .collect();
        for entry in self.pending.iter().filter(|e| e.value().goal_id == goal_id) {
            by_txid
                .entry(entry.key().clone())
                .or_insert_with(|| entry.value().clone());
        }
        let mut pending: Vec<PendingSubmission> = by_txid.into_values().collect();
        pending.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        pending
    }

    async fn poll_status(&self, txid: &str) -> Result<(TransactionStatus, PendingTransaction)> {
        match self.chain.pending_transaction(txid).await {
            Ok(pending) if pending.is_confirmed() => Ok((
                TransactionStatus::Confirmed {
                    round: pending.confirmed_round.unwrap_or_default(),
                },
                pending,
            )),
            Ok(pending) if !pending.pool_error.is_empty() => Ok((
                TransactionStatus::Rejected {
                    reason: pending.pool_error.clone(),
                },
                pending,
            )),
            Ok(pending) => Ok((TransactionStatus::Pending, pending)),
            Err(ChainError::NotFound(_)) => {
                Ok((TransactionStatus::Unknown, PendingTransaction::default()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Polls an unresolved submission and settles it when its outcome is
    /// final: a confirmation records its effect, a rejection or an expired
    /// validity window drops it.
    async fn resolve_submission(
        &self,
        submission: PendingSubmission,
    ) -> Result<TransactionStatus> {
        let txid = submission.transaction_id.clone();
        let (status, pending) = self.poll_status(&txid).await?;
        match &status {
            TransactionStatus::Confirmed { .. } => {
                self.record_confirmed(&submission, &pending).await;
                self.forget_pending(&txid).await;
            }
            TransactionStatus::Rejected { reason } => {
                info!("Submission {} was rejected: {}", txid, reason);
                self.forget_pending(&txid).await;
            }
            TransactionStatus::Unknown => {
                let last_round = self.chain.status().await?.last_round;
                if last_round > submission.last_valid {
                    info!(
                        "Submission {} unknown past its last valid round {}, dropping it",
                        txid, submission.last_valid
                    );
                    self.forget_pending(&txid).await;
                }
            }
            TransactionStatus::Pending => {}
        }
        Ok(status)
    }

    /// Writes the local record a confirmed submission would have written.
    async fn record_confirmed(
        &self,
        submission: &PendingSubmission,
        pending: &PendingTransaction,
    ) {
        let txid = submission.transaction_id.clone();
        match submission.operation {
            PendingOperation::Fund => {
                info!("Late funding of goal {} confirmed: {}", submission.goal_id, txid);
            }
            PendingOperation::Deposit => {
                let record = GoalDeposit {
                    id: Uuid::new_v4().to_string(),
                    goal_id: submission.goal_id.clone(),
                    amount: submission.amount,
                    transaction_id: txid,
                    timestamp: Utc::now(),
                };
                if let Err(e) = self.goal_repository.append_deposit(record).await {
                    warn!(
                        "Late deposit confirmed but not added to history for goal {}: {}",
                        submission.goal_id, e
                    );
                }
            }
            PendingOperation::Withdraw => {
                let record = GoalWithdrawal {
                    goal_id: submission.goal_id.clone(),
                    amount: submission.amount,
                    transaction_id: txid,
                    timestamp: Utc::now(),
                };
                if let Err(e) = self.goal_repository.record_withdrawal(record).await {
                    warn!(
                        "Late withdrawal confirmed but not recorded for goal {}: {}",
                        submission.goal_id, e
                    );
                }
            }
            PendingOperation::Mint => {
                let asset_id = match pending.asset_index {
                    Some(id) if id != 0 => id,
                    _ => {
                        warn!("Mint {} confirmed without an asset id", txid);
                        return;
                    }
                };
                let goal = match self.goal_repository.get_goal(&submission.goal_id) {
                    Ok(goal) => goal,
                    Err(e) => {
                        warn!("Mint {} confirmed for an unreadable goal: {}", txid, e);
                        return;
                    }
                };
                let nft = AchievementNft {
                    id: Uuid::new_v4().to_string(),
                    goal_id: goal.id.clone(),
                    app_id: goal.app_id,
                    asset_id,
                    mint_transaction_id: txid,
                    goal_name: goal.name,
                    target_amount: submission.target_amount,
                    total_saved: submission.amount,
                    minted_at: Utc::now(),
                };
                self.store_nft(nft).await;
            }
        }
    }

    async fn store_nft(&self, nft: AchievementNft) {
        info!("Minted achievement asset {} for goal {}", nft.asset_id, nft.goal_id);
        self.minted.insert(nft.goal_id.clone(), nft.clone());
        match self.nft_repository.save_nft(nft).await {
            Ok(_) | Err(Error::AlreadyMinted(_)) => {}
            Err(e) => warn!("Achievement minted but not saved locally: {}", e),
        }
    }

    /// Resolves a goal's earlier submissions before building a new one.
    /// Fails while any of them could still land.
    async fn settle_pending(&self, goal: &Goal) -> Result<()> {
        for submission in self.pending_for_goal(&goal.id) {
            let txid = submission.transaction_id.clone();
            let status = self.resolve_submission(submission).await?;
            let unresolved = match status {
                TransactionStatus::Pending => true,
                TransactionStatus::Unknown => self.find_pending(&txid).is_some(),
                TransactionStatus::Confirmed { .. } | TransactionStatus::Rejected { .. } => false,
            };
            if unresolved {
                return Err(Error::OutcomeUnknown {
                    txid,
                    reason: "an earlier submission for this goal is unresolved".to_string(),
                });
            }
        }
        Ok(())
    }

    async fn fund(&self, sender: Address, goal: &Goal) -> Result<()> {
        let params = self.chain.suggested_params().await?;
        let group = VaultTransactionBuilder::new(sender, &params).fund(goal.app_id)?;
        let (txid, _) = self
            .confirm_for_goal(&group, Intent::new(goal, PendingOperation::Fund, 0))
            .await?;
        info!("Funded vault {} for goal {} in {}", goal.app_id, goal.id, txid);
        Ok(())
    }

    fn existing_nft(&self, goal_id: &str) -> Option<AchievementNft> {
        if let Some(nft) = self.minted.get(goal_id) {
            return Some(nft.value().clone());
        }
        match self.nft_repository.get_nft_for_goal(goal_id) {
            Ok(found) => found,
            Err(e) => {
                warn!("Could not read achievement records for goal {}: {}", goal_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        self.goal_repository.list_goals()
    }

    /// Deploys and funds a new vault.
    ///
    /// If funding fails after the deployment confirmed, the goal is still
    /// recorded and reads as `Deploying`; see [`GoalServiceTrait::resume_funding`].
    async fn create_goal(&self, sender: Address, new_goal: NewGoal) -> Result<Goal> {
        validate_new_goal(&new_goal, Utc::now())?;
        let deadline = u64::try_from(new_goal.deadline.timestamp())
            .map_err(|_| ValidationError::invalid("Deadline is out of range"))?;

        let params = self.chain.suggested_params().await?;
        let deploy =
            VaultTransactionBuilder::new(sender, &params).deploy(new_goal.target_amount, deadline)?;
        let (txid, pending) = self.sign_and_confirm(&deploy).await?;

        let app_id = match pending.application_index {
            Some(id) if id != 0 => id,
            _ => {
                return Err(Error::DeploymentFailed(format!(
                    "transaction {} confirmed without an application id",
                    txid
                )))
            }
        };
        info!("Deployed vault {} for goal '{}'", app_id, new_goal.name.trim());

        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            app_id,
            name: new_goal.name.trim().to_string(),
            created_at: Utc::now(),
        };
        let goal = match self.goal_repository.insert_goal(goal.clone()).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Vault {} deployed but its goal record was not saved: {}", app_id, e);
                goal
            }
        };

        self.fund(sender, &goal).await?;
        Ok(goal)
    }

    async fn resume_funding(&self, goal_id: &str, sender: Address) -> Result<ReconciledView> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        let _guard = self.begin_operation(&goal)?;
        self.settle_pending(&goal).await?;

        let view = self.build_view(goal.clone()).await?;
        if view.state != GoalState::Deploying {
            return Err(ValidationError::invalid(format!(
                "Vault {} is not awaiting funds",
                goal.app_id
            ))
            .into());
        }
        self.fund(sender, &goal).await?;
        self.build_view(goal).await
    }

    async fn deposit(
        &self,
        goal_id: &str,
        sender: Address,
        amount: u64,
    ) -> Result<ReconciledView> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        let _guard = self.begin_operation(&goal)?;
        self.settle_pending(&goal).await?;

        let before = self.build_view(goal.clone()).await?;
        ensure_can_deposit(before.state, amount)?;
        ensure_owner(&sender, &before.aggregate)?;

        let params = self.chain.suggested_params().await?;
        let group = VaultTransactionBuilder::new(sender, &params).deposit(goal.app_id, amount)?;
        let (txid, _) = self
            .confirm_for_goal(&group, Intent::new(&goal, PendingOperation::Deposit, amount))
            .await?;
        info!("Deposit of {} into vault {} confirmed: {}", amount, goal.app_id, txid);

        let record = GoalDeposit {
            id: Uuid::new_v4().to_string(),
            goal_id: goal.id.clone(),
            amount,
            transaction_id: txid,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.goal_repository.append_deposit(record).await {
            warn!("Deposit confirmed but not added to history for goal {}: {}", goal.id, e);
        }

        self.build_view(goal).await
    }

    async fn withdraw(&self, goal_id: &str, sender: Address) -> Result<ReconciledView> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        let _guard = self.begin_operation(&goal)?;
        self.settle_pending(&goal).await?;

        let before = self.build_view(goal.clone()).await?;
        ensure_can_withdraw(before.state)?;
        ensure_owner(&sender, &before.aggregate)?;

        let params = self.chain.suggested_params().await?;
        let group = VaultTransactionBuilder::new(sender, &params).withdraw(goal.app_id)?;
        let intent = Intent::new(
            &goal,
            PendingOperation::Withdraw,
            before.aggregate.contract_balance,
        );
        let (txid, _) = self.confirm_for_goal(&group, intent).await?;
        info!("Withdrawal from vault {} confirmed: {}", goal.app_id, txid);

        let record = GoalWithdrawal {
            goal_id: goal.id.clone(),
            amount: before.aggregate.contract_balance,
            transaction_id: txid,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.goal_repository.record_withdrawal(record).await {
            warn!("Withdrawal confirmed but not recorded for goal {}: {}", goal.id, e);
        }

        self.build_view(goal).await
    }

    async fn mint_achievement(&self, goal_id: &str, sender: Address) -> Result<MintedAchievement> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        let _guard = self.begin_operation(&goal)?;
        self.settle_pending(&goal).await?;

        if self.existing_nft(&goal.id).is_some() {
            return Err(Error::AlreadyMinted(goal.id.clone()));
        }

        let before = self.build_view(goal.clone()).await?;
        let aggregate = &before.aggregate;
        if !(aggregate.completed || aggregate.progress_reached(100)) {
            return Err(ValidationError::invalid(
                "Only a completed goal can mint its achievement",
            )
            .into());
        }
        ensure_owner(&sender, aggregate)?;

        let mint = AchievementMint {
            app_id: goal.app_id,
            goal_name: goal.name.clone(),
            target_amount: aggregate.target_amount,
            total_saved: aggregate.total_saved,
            completed_at: Utc::now().to_rfc3339(),
        };
        let params = self.chain.suggested_params().await?;
        let group = VaultTransactionBuilder::new(sender, &params)
            .mint_achievement(&mint, &self.config.explorer_url)?;
        let intent = Intent {
            target_amount: mint.target_amount,
            ..Intent::new(&goal, PendingOperation::Mint, mint.total_saved)
        };
        let (txid, pending) = self.confirm_for_goal(&group, intent).await?;

        let asset_id = match pending.asset_index {
            Some(id) if id != 0 => id,
            _ => {
                return Err(Error::AssetCreationFailed(format!(
                    "transaction {} confirmed without an asset id",
                    txid
                )))
            }
        };
        let nft = AchievementNft {
            id: Uuid::new_v4().to_string(),
            goal_id: goal.id.clone(),
            app_id: goal.app_id,
            asset_id,
            mint_transaction_id: txid,
            goal_name: goal.name.clone(),
            target_amount: mint.target_amount,
            total_saved: mint.total_saved,
            minted_at: Utc::now(),
        };
        self.store_nft(nft.clone()).await;

        let view = self.build_view(goal).await?;
        Ok(MintedAchievement { nft, view })
    }

    async fn get_view(&self, goal_id: &str) -> Result<ReconciledView> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        self.build_view(goal).await
    }

    /// Views for every goal, fetched concurrently. Goals whose vault cannot
    /// be read are skipped unless every read failed.
    async fn list_views(&self) -> Result<Vec<ReconciledView>> {
        let goals = self.goal_repository.list_goals()?;
        if goals.is_empty() {
            return Ok(Vec::new());
        }

        let results = join_all(goals.into_iter().map(|goal| self.build_view(goal))).await;
        let mut views = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(view) => views.push(view),
                Err(e) => {
                    warn!("Skipping goal whose vault could not be read: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if views.is_empty() => Err(e),
            _ => Ok(views),
        }
    }

    /// Current status of `txid`. A submission this engine left unresolved
    /// is settled as a side effect, recording its deposit, withdrawal or
    /// achievement once confirmed.
    async fn transaction_status(&self, txid: &str) -> Result<TransactionStatus> {
        match self.find_pending(txid) {
            Some(submission) => self.resolve_submission(submission).await,
            None => Ok(self.poll_status(txid).await?.0),
        }
    }

    async fn achievements(&self, goal_id: &str) -> Result<AchievementProgress> {
        let view = self.get_view(goal_id).await?;
        Ok(vault_achievements(&view))
    }

    async fn health(&self, goal_id: &str) -> Result<HealthReport> {
        let view = self.get_view(goal_id).await?;
        Ok(score_goal(
            view.deposit_count,
            &view.aggregate,
            view.fetched_at.timestamp(),
        ))
    }

    /// Deposit history across goals, oldest first. Entries of deleted goals
    /// are dropped.
    fn all_deposits(&self) -> Result<Vec<DepositHistoryEntry>> {
        let names: HashMap<String, String> = self
            .goal_repository
            .list_goals()?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let mut entries: Vec<DepositHistoryEntry> = self
            .goal_repository
            .list_all_deposits()?
            .into_iter()
            .filter_map(|d| {
                names.get(&d.goal_id).map(|name| DepositHistoryEntry {
                    goal_name: name.clone(),
                    goal_id: d.goal_id,
                    amount: d.amount,
                    transaction_id: d.transaction_id,
                    timestamp: d.timestamp,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(entries)
    }

    fn list_nfts(&self) -> Result<Vec<AchievementNft>> {
        let mut by_goal: HashMap<String, AchievementNft> = match self.nft_repository.list_nfts() {
            Ok(nfts) => nfts.into_iter().map(|n| (n.goal_id.clone(), n)).collect(),
            Err(e) => {
                warn!("Achievement records unavailable: {}", e);
                HashMap::new()
            }
        };
        for entry in self.minted.iter() {
            by_goal
                .entry(entry.key().clone())
                .or_insert_with(|| entry.value().clone());
        }

        let mut nfts: Vec<AchievementNft> = by_goal.into_values().collect();
        nfts.sort_by(|a, b| a.minted_at.cmp(&b.minted_at));
        Ok(nfts)
    }

    /// Removes local metadata only. The vault stays on chain.
    async fn delete_goal(&self, goal_id: String) -> Result<usize> {
        if let Ok(goal) = self.goal_repository.get_goal(&goal_id) {
            info!(
                "Deleting goal {}; vault {} remains on chain",
                goal.id, goal.app_id
            );
        }
        self.pending.retain(|_, p| p.goal_id != goal_id);
        self.goal_repository.delete_goal(goal_id).await
    }
}
