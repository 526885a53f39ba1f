use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use emblem_primitives::{buf::Buf32, hash::hash_pair};
use serde::{Deserialize, Serialize};

/// Which side of the path node a sibling sits on.
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
#[serde(rename_all = "lowercase")]
pub enum SiblingSide {
    Left,
    Right,
}

impl SiblingSide {
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One level of an inclusion proof.
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
pub struct ProofStep {
    pub sibling: Buf32,
    pub side: SiblingSide,
}

impl ProofStep {
    pub fn new(sibling: Buf32, side: SiblingSide) -> Self {
        Self { sibling, side }
    }

    /// Combines the running hash with this step's sibling.
    pub fn apply(&self, running: &Buf32) -> Buf32 {
        match self.side {
            SiblingSide::Left => hash_pair(&self.sibling, running),
            SiblingSide::Right => hash_pair(running, &self.sibling),
        }
    }
}

/// Single-leaf inclusion proof, ordered from the leaf level up to the root.
#[derive(
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct MerkleProof {
    steps: Vec<ProofStep>,
}

impl MerkleProof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut Vec<ProofStep> {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Computes the root implied by `leaf` and the proof's siblings.
    pub fn compute_root(&self, leaf: &Buf32) -> Buf32 {
        // `cur` is the intermediate hash at each level, once every step is
        // applied it becomes the root
        self.steps
            .iter()
            .fold(*leaf, |cur, step| step.apply(&cur))
    }

    /// Verifies the inclusion of `leaf` against the claimed `root`.
    pub fn verify(&self, leaf: &Buf32, root: &Buf32) -> bool {
        self.compute_root(leaf) == *root
    }

    /// Reconstructs the leaf position within its tree from the sibling sides.
    ///
    /// A sibling on the left means the path node was the right child, so that
    /// level contributes a set bit.  Returns `None` for proofs deeper than an
    /// index can address.
    pub fn implied_index(&self) -> Option<u64> {
        if self.steps.len() > u64::BITS as usize {
            return None;
        }

        let idx = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.side == SiblingSide::Left)
            .fold(0u64, |acc, (level, _)| acc | (1 << level));
        Some(idx)
    }
}
