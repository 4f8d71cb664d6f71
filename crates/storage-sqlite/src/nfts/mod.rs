//! SQLite storage implementation for achievement NFT records.

mod model;
mod repository;

pub use model::AchievementNftDB;
pub use repository::NftRepository;
