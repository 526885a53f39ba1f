use std::{collections::BTreeSet, sync::Arc};

use emblem_db::{traits::RootDatabase, types::PostedRootRecord};
use emblem_merkle::{depth_for, Commitment};
use emblem_primitives::{
    buf::{Buf20, Buf32},
    constants::UNFURL_BATCH_SIZE,
};
use emblem_tunnel::{CommitmentMessage, MessageHandler};
use tracing::*;

use crate::{
    errors::UnfurlError,
    types::{MintEvent, UnfurlEntry},
};

/// Verifies proofs against posted roots and mints each leaf at most once.
///
/// Every mutating call either fully succeeds with a single write to the root
/// store or returns an error having written nothing.
#[derive(Debug)]
pub struct BadgeRegistry<D> {
    db: Arc<D>,
}

impl<D> Clone for BadgeRegistry<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<D: RootDatabase> BadgeRegistry<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<D> {
        &self.db
    }

    /// Records a posted root.  Posting a root again replaces its range but keeps
    /// the tree positions already unfurled from it.
    pub fn store_root(&self, commitment: &Commitment) -> Result<(), UnfurlError> {
        if commitment.range_size == 0 {
            return Err(UnfurlError::EmptyRange(commitment.root));
        }
        if commitment.checked_range_end().is_none() {
            return Err(UnfurlError::RangeOverflow {
                root: commitment.root,
                range_start: commitment.range_start,
                range_size: commitment.range_size,
            });
        }

        let record = match self.db.get_posted_root(&commitment.root)? {
            Some(mut existing) => {
                if existing.commitment() != commitment {
                    warn!(
                        root = %commitment.root,
                        old_start = existing.range_start(),
                        old_size = existing.range_size(),
                        new_start = commitment.range_start,
                        new_size = commitment.range_size,
                        "replacing range of posted root"
                    );
                }
                existing.set_range(commitment.range_start, commitment.range_size);
                existing
            }
            None => PostedRootRecord::new(*commitment),
        };

        self.db.put_posted_root(record)?;
        info!(
            root = %commitment.root,
            range_start = commitment.range_start,
            range_size = commitment.range_size,
            "stored root"
        );
        Ok(())
    }

    pub fn posted_root(&self, root: &Buf32) -> Result<Option<PostedRootRecord>, UnfurlError> {
        Ok(self.db.get_posted_root(root)?)
    }

    /// Verifies every entry of the batch against `root` and, only if all of them
    /// pass, marks them processed and returns their mint events in input order.
    pub fn unfurl_batch(
        &self,
        entries: &[UnfurlEntry],
        root: &Buf32,
    ) -> Result<Vec<MintEvent>, UnfurlError> {
        if entries.is_empty() {
            return Err(UnfurlError::EmptyBatch);
        }
        if entries.len() > UNFURL_BATCH_SIZE {
            return Err(UnfurlError::BatchTooLarge(entries.len(), UNFURL_BATCH_SIZE));
        }

        let mut record = self
            .db
            .get_posted_root(root)?
            .ok_or(UnfurlError::UnknownRoot(*root))?;

        let commitment = *record.commitment();
        let depth = depth_for(commitment.range_size);

        let locals = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| check_entry(i, entry, &commitment, depth))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = BTreeSet::new();
        for (i, (entry, local)) in entries.iter().zip(locals).enumerate() {
            if record.is_processed(local) || !seen.insert(local) {
                return Err(UnfurlError::DuplicateUnfurl {
                    entry: i,
                    leaf_index: entry.leaf_index,
                });
            }
        }

        record.mark_processed(seen);
        self.db.put_posted_root(record)?;

        let events = entries
            .iter()
            .map(|e| MintEvent {
                root: *root,
                leaf_index: e.leaf_index,
                winner: *e.record.winner(),
                badge_definition_number: e.record.badge_definition_number(),
            })
            .collect::<Vec<_>>();

        info!(%root, minted = events.len(), "unfurled batch");
        Ok(events)
    }
}

/// Checks one entry against the committed range and root, returning its
/// position in the tree.  The proof must be exactly as deep as the committed
/// tree and its sibling sides must spell out the claimed index, so a valid
/// proof cannot be replayed under another index.
fn check_entry(
    entry_idx: usize,
    entry: &UnfurlEntry,
    commitment: &Commitment,
    depth: usize,
) -> Result<u64, UnfurlError> {
    let local = commitment
        .local_index(entry.leaf_index)
        .ok_or(UnfurlError::LeafOutOfRange {
            entry: entry_idx,
            leaf_index: entry.leaf_index,
            range_start: commitment.range_start,
            range_end: commitment.range_end(),
        })?;

    let leaf = entry.record.leaf_hash();
    let bound = entry.proof.len() == depth && entry.proof.implied_index() == Some(local);
    if !bound || !entry.proof.verify(&leaf, &commitment.root) {
        debug!(
            entry = entry_idx,
            leaf_index = entry.leaf_index,
            %bound,
            "rejecting unfurl entry"
        );
        return Err(UnfurlError::ProofVerification {
            entry: entry_idx,
            leaf_index: entry.leaf_index,
            root: commitment.root,
        });
    }

    Ok(local)
}

impl<D: RootDatabase> MessageHandler for BadgeRegistry<D> {
    fn handle_commitment(
        &self,
        state_id: u64,
        sender: &Buf20,
        msg: CommitmentMessage,
    ) -> anyhow::Result<()> {
        debug!(%state_id, %sender, root = %msg.root, "storing root from tunnel");
        self.store_root(&msg.into())?;
        Ok(())
    }
}
