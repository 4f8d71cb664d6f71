use algosave_core::flexible::{FlexibleGoal, FlexibleGoalRepositoryTrait, FlexibleTransaction};
use algosave_core::{Error, Result};

use super::model::{FlexibleGoalDB, FlexibleTransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{flexible_goals, flexible_transactions};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct FlexibleGoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl FlexibleGoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        FlexibleGoalRepository { pool, writer }
    }
}

/// Loads the transactions of `goals` and attaches them, oldest first.
fn with_transactions(
    conn: &mut SqliteConnection,
    goals: Vec<FlexibleGoalDB>,
) -> Result<Vec<FlexibleGoal>> {
    let rows = FlexibleTransactionDB::belonging_to(&goals)
        .select(FlexibleTransactionDB::as_select())
        .load::<FlexibleTransactionDB>(conn)
        .map_err(StorageError::from)?;

    let grouped = rows.grouped_by(&goals);
    Ok(goals
        .into_iter()
        .zip(grouped)
        .map(|(goal, rows)| {
            let mut transactions: Vec<FlexibleTransaction> = rows
                .into_iter()
                .filter_map(FlexibleTransactionDB::into_domain)
                .collect();
            transactions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
            goal.into_domain(transactions)
        })
        .collect())
}

fn load_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<FlexibleGoal> {
    let goal = flexible_goals::table
        .find(goal_id)
        .select(FlexibleGoalDB::as_select())
        .first::<FlexibleGoalDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::NotFound(format!("flexible goal {}", goal_id)))?;
    with_transactions(conn, vec![goal])?
        .pop()
        .ok_or_else(|| Error::NotFound(format!("flexible goal {}", goal_id)))
}

#[async_trait]
impl FlexibleGoalRepositoryTrait for FlexibleGoalRepository {
    fn list_flexible_goals(&self) -> Result<Vec<FlexibleGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals = flexible_goals::table
            .select(FlexibleGoalDB::as_select())
            .load::<FlexibleGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut result = with_transactions(&mut conn, goals)?;
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    fn get_flexible_goal(&self, goal_id: &str) -> Result<FlexibleGoal> {
        let mut conn = get_connection(&self.pool)?;
        load_goal(&mut conn, goal_id)
    }

    async fn insert_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal> {
        let goal_db = FlexibleGoalDB::from(&goal);
        let transactions: Vec<FlexibleTransactionDB> =
            goal.transactions.iter().map(FlexibleTransactionDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FlexibleGoal> {
                diesel::insert_into(flexible_goals::table)
                    .values(&goal_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if !transactions.is_empty() {
                    diesel::insert_into(flexible_transactions::table)
                        .values(&transactions)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                load_goal(conn, &goal_db.id)
            })
            .await
    }

    async fn update_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal> {
        let goal_db = FlexibleGoalDB::from(&goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FlexibleGoal> {
                let updated = diesel::update(flexible_goals::table.find(&goal_db.id))
                    .set(&goal_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::NotFound(format!("flexible goal {}", goal_db.id)));
                }
                load_goal(conn, &goal_db.id)
            })
            .await
    }

    async fn append_transaction(
        &self,
        transaction: FlexibleTransaction,
    ) -> Result<FlexibleTransaction> {
        let transaction_db = FlexibleTransactionDB::from(&transaction);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FlexibleTransaction> {
                let exists = flexible_goals::table
                    .find(&transaction_db.goal_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?
                    > 0;
                if !exists {
                    return Err(Error::NotFound(format!(
                        "flexible goal {}",
                        transaction_db.goal_id
                    )));
                }
                diesel::insert_into(flexible_transactions::table)
                    .values(&transaction_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(transaction)
            })
            .await
    }

    async fn delete_flexible_goal(&self, goal_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(flexible_goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use algosave_core::errors::ErrorKind;
    use algosave_core::flexible::FlexibleTransactionType;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn create_test_repository() -> (FlexibleGoalRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (FlexibleGoalRepository::new(pool, writer), temp_dir)
    }

    fn goal(id: &str) -> FlexibleGoal {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        FlexibleGoal {
            id: id.to_string(),
            name: "New phone".to_string(),
            target_amount: dec!(20000),
            deadline: created_at + Duration::weeks(10),
            created_at,
            monthly_income: Some(dec!(50000)),
            monthly_spending: None,
            transactions: Vec::new(),
        }
    }

    fn transaction(
        goal_id: &str,
        id: &str,
        transaction_type: FlexibleTransactionType,
        amount: rust_decimal::Decimal,
        hours: i64,
    ) -> FlexibleTransaction {
        FlexibleTransaction {
            id: id.to_string(),
            goal_id: goal_id.to_string(),
            transaction_type,
            amount,
            note: Some(format!("note {}", id)),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap() + Duration::hours(hours),
        }
    }

    #[tokio::test]
    async fn test_goal_with_transactions_round_trip() {
        let (repo, _dir) = create_test_repository().await;
        repo.insert_flexible_goal(goal("f1")).await.unwrap();

        repo.append_transaction(transaction(
            "f1",
            "t2",
            FlexibleTransactionType::Withdrawal,
            dec!(500.25),
            2,
        ))
        .await
        .unwrap();
        repo.append_transaction(transaction(
            "f1",
            "t1",
            FlexibleTransactionType::Deposit,
            dec!(1500.75),
            1,
        ))
        .await
        .unwrap();

        let loaded = repo.get_flexible_goal("f1").unwrap();
        let ids: Vec<&str> = loaded.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(loaded.current_balance(), dec!(1000.50));
        assert_eq!(loaded.monthly_income, Some(dec!(50000)));
        assert_eq!(loaded.monthly_spending, None);
        assert_eq!(repo.list_flexible_goals().unwrap(), vec![loaded]);
    }

    #[tokio::test]
    async fn test_update_keeps_transactions() {
        let (repo, _dir) = create_test_repository().await;
        repo.insert_flexible_goal(goal("f1")).await.unwrap();
        repo.append_transaction(transaction(
            "f1",
            "t1",
            FlexibleTransactionType::Deposit,
            dec!(100),
            0,
        ))
        .await
        .unwrap();

        let mut changed = goal("f1");
        changed.monthly_income = None;
        changed.monthly_spending = Some(dec!(30000));
        let updated = repo.update_flexible_goal(changed).await.unwrap();
        assert_eq!(updated.transactions.len(), 1);
        assert_eq!(updated.monthly_income, None);
        assert_eq!(updated.monthly_spending, Some(dec!(30000)));

        let err = repo.update_flexible_goal(goal("nope")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_append_to_missing_goal_is_not_found() {
        let (repo, _dir) = create_test_repository().await;
        let err = repo
            .append_transaction(transaction(
                "ghost",
                "t1",
                FlexibleTransactionType::Deposit,
                dec!(1),
                0,
            ))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (repo, _dir) = create_test_repository().await;
        repo.insert_flexible_goal(goal("f1")).await.unwrap();
        repo.append_transaction(transaction(
            "f1",
            "t1",
            FlexibleTransactionType::Deposit,
            dec!(10),
            0,
        ))
        .await
        .unwrap();

        assert_eq!(repo.delete_flexible_goal("f1".to_string()).await.unwrap(), 1);
        assert!(repo.list_flexible_goals().unwrap().is_empty());
        assert_eq!(repo.get_flexible_goal("f1").unwrap_err().kind(), ErrorKind::NotFound);
    }
}
