use std::ops::Range;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use emblem_primitives::buf::Buf32;
use serde::{Deserialize, Serialize};

use crate::tree::MerkleTree;

/// A merkle root tagged with the half-open range of global leaf indexes it
/// commits to.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct Commitment {
    pub root: Buf32,
    pub range_start: u64,
    pub range_size: u64,
}

impl Commitment {
    pub fn new(root: Buf32, range_start: u64, range_size: u64) -> Self {
        Self {
            root,
            range_start,
            range_size,
        }
    }

    /// Tags a built tree with the global index of its first leaf.
    pub fn from_tree(tree: &MerkleTree, range_start: u64) -> Self {
        Self::new(tree.root(), range_start, tree.leaf_count())
    }

    /// Exclusive end of the committed range, saturating at the top of the index space.
    pub fn range_end(&self) -> u64 {
        self.range_start.saturating_add(self.range_size)
    }

    /// Exclusive end of the committed range, `None` if it does not fit in a `u64`.
    pub fn checked_range_end(&self) -> Option<u64> {
        self.range_start.checked_add(self.range_size)
    }

    pub fn range(&self) -> Range<u64> {
        self.range_start..self.range_end()
    }

    pub fn covers(&self, global_index: u64) -> bool {
        self.range().contains(&global_index)
    }

    /// Position of a global index inside the committed tree, if covered.
    pub fn local_index(&self, global_index: u64) -> Option<u64> {
        self.covers(global_index)
            .then(|| global_index - self.range_start)
    }
}
