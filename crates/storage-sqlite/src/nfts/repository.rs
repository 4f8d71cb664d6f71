use algosave_core::nfts::{AchievementNft, NftRepositoryTrait};
use algosave_core::{Error, Result};

use super::model::AchievementNftDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, StorageError};
use crate::schema::achievement_nfts;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;

/// Mint records. They outlive the local goal they were minted for.
pub struct NftRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl NftRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        NftRepository { pool, writer }
    }
}

#[async_trait]
impl NftRepositoryTrait for NftRepository {
    fn list_nfts(&self) -> Result<Vec<AchievementNft>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = achievement_nfts::table
            .select(AchievementNftDB::as_select())
            .load::<AchievementNftDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut nfts: Vec<AchievementNft> = rows.into_iter().map(AchievementNft::from).collect();
        nfts.sort_by(|a, b| a.minted_at.cmp(&b.minted_at));
        Ok(nfts)
    }

    fn get_nft_for_goal(&self, goal_id: &str) -> Result<Option<AchievementNft>> {
        let mut conn = get_connection(&self.pool)?;
        let row = achievement_nfts::table
            .filter(achievement_nfts::goal_id.eq(goal_id))
            .select(AchievementNftDB::as_select())
            .first::<AchievementNftDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AchievementNft::from))
    }

    async fn save_nft(&self, nft: AchievementNft) -> Result<AchievementNft> {
        let nft_db = AchievementNftDB::try_from(nft)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AchievementNft> {
                let goal_id = nft_db.goal_id.clone();
                diesel::insert_into(achievement_nfts::table)
                    .values(&nft_db)
                    .returning(AchievementNftDB::as_returning())
                    .get_result(conn)
                    .map(AchievementNft::from)
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            Error::AlreadyMinted(goal_id)
                        } else {
                            StorageError::from(e).into()
                        }
                    })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use algosave_core::errors::ErrorKind;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    async fn create_test_repository() -> (NftRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (NftRepository::new(pool, writer), temp_dir)
    }

    fn nft(id: &str, goal_id: &str, day: u32) -> AchievementNft {
        AchievementNft {
            id: id.to_string(),
            goal_id: goal_id.to_string(),
            app_id: 2001,
            asset_id: 3001,
            mint_transaction_id: format!("MINT-{}", id),
            goal_name: "Bike".to_string(),
            target_amount: 10_000_000,
            total_saved: 10_000_000,
            minted_at: Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_and_lookup() {
        let (repo, _dir) = create_test_repository().await;
        repo.save_nft(nft("n2", "g2", 9)).await.unwrap();
        repo.save_nft(nft("n1", "g1", 3)).await.unwrap();

        assert_eq!(repo.get_nft_for_goal("g1").unwrap(), Some(nft("n1", "g1", 3)));
        assert!(repo.get_nft_for_goal("g3").unwrap().is_none());
        let ids: Vec<String> = repo.list_nfts().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
    }

    #[tokio::test]
    async fn test_second_mint_for_goal_is_refused() {
        let (repo, _dir) = create_test_repository().await;
        repo.save_nft(nft("n1", "g1", 3)).await.unwrap();
        let err = repo.save_nft(nft("n9", "g1", 4)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyMinted);
        assert_eq!(repo.list_nfts().unwrap().len(), 1);
    }
}
