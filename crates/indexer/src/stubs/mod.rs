//! In-memory indexer used by tests and the simulator.

use async_trait::async_trait;
use emblem_primitives::badge::BadgeRecord;
use parking_lot::Mutex;

use crate::{client::ClientResult, error::ClientError, traits::BadgeIndexer};

/// Serves windows out of a fixed, ordered record list.
#[derive(Debug, Default)]
pub struct StaticIndexer {
    records: Vec<BadgeRecord>,
    fail_from: Option<(u64, ClientError)>,
    requests: Mutex<Vec<(u64, u64)>>,
}

impl StaticIndexer {
    pub fn new(records: Vec<BadgeRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Makes every request starting at or after `index` fail with `err`.
    pub fn failing_from(mut self, index: u64, err: ClientError) -> Self {
        self.fail_from = Some((index, err));
        self
    }

    /// Every `(starting_index, tree_size)` asked for so far.
    pub fn requests(&self) -> Vec<(u64, u64)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl BadgeIndexer for StaticIndexer {
    async fn fetch_window(
        &self,
        starting_index: u64,
        tree_size: u64,
    ) -> ClientResult<Vec<BadgeRecord>> {
        self.requests.lock().push((starting_index, tree_size));

        if let Some((from, err)) = &self.fail_from {
            if starting_index >= *from {
                return Err(err.clone());
            }
        }

        let len = self.records.len() as u64;
        let start = starting_index.min(len) as usize;
        let end = starting_index.saturating_add(tree_size).min(len) as usize;
        Ok(self.records[start..end].to_vec())
    }
}
