use emblem_merkle::{Commitment, MerkleTree};
use emblem_primitives::badge::BadgeRecord;
use tracing::*;

use crate::{error::DriverError, traits::BadgeIndexer};

/// Output of one build: the commitment to send, the tree to serve proofs
/// from, and the records the tree was built over.
#[derive(Clone, Debug)]
pub struct BuiltCommitment {
    pub commitment: Commitment,
    pub tree: MerkleTree,
    pub records: Vec<BadgeRecord>,
}

/// Pulls records from an indexer in fixed-size pages.
#[derive(Debug)]
pub struct PaginationDriver<I> {
    indexer: I,
    page_size: u64,
}

impl<I: BadgeIndexer> PaginationDriver<I> {
    pub fn new(indexer: I, page_size: u64) -> Result<Self, DriverError> {
        if page_size == 0 {
            return Err(DriverError::ZeroPageSize);
        }
        Ok(Self { indexer, page_size })
    }

    pub fn indexer(&self) -> &I {
        &self.indexer
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Gathers up to `tree_size` records starting at `starting_index`, stopping
    /// early if the indexer runs out of data.
    pub async fn collect(
        &self,
        starting_index: u64,
        tree_size: u64,
    ) -> Result<Vec<BadgeRecord>, DriverError> {
        let mut records = Vec::new();
        let mut next = starting_index;
        let end = starting_index.saturating_add(tree_size);

        while next < end {
            let want = (end - next).min(self.page_size);
            let mut page = self.indexer.fetch_window(next, want).await?;
            if page.is_empty() {
                debug!(%next, "indexer has no more records");
                break;
            }

            // an indexer handing back more than asked for must not widen the range
            page.truncate(want as usize);
            next += page.len() as u64;
            records.extend(page);
        }

        info!(
            %starting_index,
            requested = tree_size,
            collected = records.len(),
            "collected badges"
        );
        Ok(records)
    }

    /// Collects a window and commits to whatever was gathered.
    pub async fn build_commitment(
        &self,
        starting_index: u64,
        tree_size: u64,
    ) -> Result<BuiltCommitment, DriverError> {
        let records = self.collect(starting_index, tree_size).await?;
        if records.is_empty() {
            return Err(DriverError::EmptyCommitment(starting_index));
        }

        let tree = MerkleTree::from_records(&records)?;
        let commitment = Commitment::from_tree(&tree, starting_index);
        info!(
            root = %commitment.root,
            range_start = commitment.range_start,
            range_size = commitment.range_size,
            "built commitment"
        );

        Ok(BuiltCommitment {
            commitment,
            tree,
            records,
        })
    }
}
