//! Achievement NFT records.

mod nfts_model;
mod nfts_traits;

pub use nfts_model::AchievementNft;
pub use nfts_traits::NftRepositoryTrait;
