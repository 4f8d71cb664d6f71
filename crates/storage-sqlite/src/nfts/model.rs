//! Database model for achievement NFT records.

use diesel::prelude::*;

use algosave_core::errors::Error;
use algosave_core::nfts::AchievementNft;

use crate::utils::{from_db_u64, parse_timestamp, to_db_u64};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::achievement_nfts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AchievementNftDB {
    pub id: String,
    pub goal_id: String,
    pub app_id: i64,
    pub asset_id: i64,
    pub mint_transaction_id: String,
    pub goal_name: String,
    pub target_amount: i64,
    pub total_saved: i64,
    pub minted_at: String,
}

impl From<AchievementNftDB> for AchievementNft {
    fn from(db: AchievementNftDB) -> Self {
        Self {
            app_id: from_db_u64(db.app_id, "app_id"),
            asset_id: from_db_u64(db.asset_id, "asset_id"),
            target_amount: from_db_u64(db.target_amount, "target_amount"),
            total_saved: from_db_u64(db.total_saved, "total_saved"),
            minted_at: parse_timestamp(&db.minted_at, "minted_at"),
            id: db.id,
            goal_id: db.goal_id,
            mint_transaction_id: db.mint_transaction_id,
            goal_name: db.goal_name,
        }
    }
}

impl TryFrom<AchievementNft> for AchievementNftDB {
    type Error = Error;

    fn try_from(domain: AchievementNft) -> Result<Self, Self::Error> {
        Ok(Self {
            app_id: to_db_u64(domain.app_id, "app_id")?,
            asset_id: to_db_u64(domain.asset_id, "asset_id")?,
            target_amount: to_db_u64(domain.target_amount, "target_amount")?,
            total_saved: to_db_u64(domain.total_saved, "total_saved")?,
            minted_at: domain.minted_at.to_rfc3339(),
            id: domain.id,
            goal_id: domain.goal_id,
            mint_transaction_id: domain.mint_transaction_id,
            goal_name: domain.goal_name,
        })
    }
}
