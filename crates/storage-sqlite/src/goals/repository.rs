use algosave_core::goals::{
    Goal, GoalDeposit, GoalRepositoryTrait, GoalWithdrawal, PendingSubmission,
};
use algosave_core::{Error, Result};

use super::model::{GoalDB, GoalDepositDB, GoalWithdrawalDB, PendingSubmissionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{goal_deposits, goal_withdrawals, goals, pending_submissions};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }

    fn load_deposits(&self, goal_filter: Option<&str>) -> Result<Vec<GoalDeposit>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = goal_deposits::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(goal_id) = goal_filter {
            query = query.filter(goal_deposits::goal_id.eq(goal_id.to_string()));
        }
        let rows = query
            .select(GoalDepositDB::as_select())
            .load::<GoalDepositDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut deposits: Vec<GoalDeposit> = rows.into_iter().map(GoalDeposit::from).collect();
        deposits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(deposits)
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut result: Vec<Goal> = rows.into_iter().map(Goal::from).collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Goal::from)
            .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))
    }

    async fn insert_goal(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::try_from(goal)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(result_db))
            })
            .await
    }

    async fn delete_goal(&self, goal_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Deposits and the withdrawal go with it (ON DELETE CASCADE).
                Ok(diesel::delete(goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn list_deposits(&self, goal_id: &str) -> Result<Vec<GoalDeposit>> {
        self.load_deposits(Some(goal_id))
    }

    fn list_all_deposits(&self) -> Result<Vec<GoalDeposit>> {
        self.load_deposits(None)
    }

    async fn append_deposit(&self, deposit: GoalDeposit) -> Result<GoalDeposit> {
        let deposit_db = GoalDepositDB::try_from(deposit.clone())?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalDeposit> {
                // A transaction already logged for this goal is kept as is.
                diesel::insert_or_ignore_into(goal_deposits::table)
                    .values(&deposit_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deposit)
            })
            .await
    }

    fn get_withdrawal(&self, goal_id: &str) -> Result<Option<GoalWithdrawal>> {
        let mut conn = get_connection(&self.pool)?;
        let row = goal_withdrawals::table
            .find(goal_id)
            .select(GoalWithdrawalDB::as_select())
            .first::<GoalWithdrawalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(GoalWithdrawal::from))
    }

    async fn record_withdrawal(&self, withdrawal: GoalWithdrawal) -> Result<GoalWithdrawal> {
        let withdrawal_db = GoalWithdrawalDB::try_from(withdrawal)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalWithdrawal> {
                let result_db = diesel::insert_into(goal_withdrawals::table)
                    .values(&withdrawal_db)
                    .returning(GoalWithdrawalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(GoalWithdrawal::from(result_db))
            })
            .await
    }

    fn list_pending_submissions(&self, goal_id: &str) -> Result<Vec<PendingSubmission>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = pending_submissions::table
            .filter(pending_submissions::goal_id.eq(goal_id))
            .select(PendingSubmissionDB::as_select())
            .load::<PendingSubmissionDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut pending = rows
            .into_iter()
            .map(PendingSubmission::try_from)
            .collect::<Result<Vec<_>>>()?;
        pending.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(pending)
    }

    fn get_pending_submission(&self, transaction_id: &str) -> Result<Option<PendingSubmission>> {
        let mut conn = get_connection(&self.pool)?;
        pending_submissions::table
            .find(transaction_id)
            .select(PendingSubmissionDB::as_select())
            .first::<PendingSubmissionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(PendingSubmission::try_from)
            .transpose()
    }

    async fn save_pending_submission(
        &self,
        submission: PendingSubmission,
    ) -> Result<PendingSubmission> {
        let submission_db = PendingSubmissionDB::try_from(submission.clone())?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PendingSubmission> {
                // The same transaction is only tracked once.
                diesel::insert_or_ignore_into(pending_submissions::table)
                    .values(&submission_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(submission)
            })
            .await
    }

    async fn clear_pending_submission(&self, transaction_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(pending_submissions::table.find(transaction_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
