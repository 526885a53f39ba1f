//! Module for database local types

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use emblem_merkle::Commitment;
use emblem_primitives::buf::Buf32;
use serde::{Deserialize, Serialize};

/// Child-side record of a posted root and the leaves already unfurled from it.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct PostedRootRecord {
    commitment: Commitment,

    /// Positions inside the committed tree that have been minted.  Keyed by
    /// tree position rather than global index so moving the range of a root
    /// never frees a spent leaf.
    processed: BTreeSet<u64>,
}

impl PostedRootRecord {
    pub fn new(commitment: Commitment) -> Self {
        Self {
            commitment,
            processed: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Buf32 {
        &self.commitment.root
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn range_start(&self) -> u64 {
        self.commitment.range_start
    }

    pub fn range_size(&self) -> u64 {
        self.commitment.range_size
    }

    pub fn processed(&self) -> &BTreeSet<u64> {
        &self.processed
    }

    pub fn is_processed(&self, local_index: u64) -> bool {
        self.processed.contains(&local_index)
    }

    /// Number of leaves of the current range already minted.
    pub fn processed_count(&self) -> u64 {
        self.processed.range(..self.range_size()).count() as u64
    }

    /// Replaces the tagged range, keeping everything already processed.
    pub fn set_range(&mut self, range_start: u64, range_size: u64) {
        self.commitment.range_start = range_start;
        self.commitment.range_size = range_size;
    }

    /// Marks tree positions as processed.  Callers must have checked none were
    /// processed before.
    pub fn mark_processed(&mut self, local_indexes: impl IntoIterator<Item = u64>) {
        self.processed.extend(local_indexes);
    }

    /// Whether every leaf of the committed range has been unfurled.
    pub fn is_fully_unfurled(&self) -> bool {
        self.processed_count() == self.range_size()
    }
}
