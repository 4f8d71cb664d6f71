use crate::errors::Result;
use crate::nfts::nfts_model::AchievementNft;
use async_trait::async_trait;

/// Trait for achievement NFT repository operations
#[async_trait]
pub trait NftRepositoryTrait: Send + Sync {
    fn list_nfts(&self) -> Result<Vec<AchievementNft>>;
    fn get_nft_for_goal(&self, goal_id: &str) -> Result<Option<AchievementNft>>;
    /// Saves a new record. A second record for the same goal is refused with
    /// [`crate::Error::AlreadyMinted`].
    async fn save_nft(&self, nft: AchievementNft) -> Result<AchievementNft>;
}
