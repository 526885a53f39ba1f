use async_trait::async_trait;
use emblem_primitives::badge::BadgeRecord;

use crate::client::ClientResult;

/// Source of earned badges ordered by global badge number.
#[async_trait]
pub trait BadgeIndexer: Send + Sync {
    /// Fetches at most `tree_size` records starting at global index
    /// `starting_index`.  An empty result signals there is no more data.
    async fn fetch_window(
        &self,
        starting_index: u64,
        tree_size: u64,
    ) -> ClientResult<Vec<BadgeRecord>>;
}
