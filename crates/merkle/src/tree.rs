use emblem_primitives::{badge::BadgeRecord, buf::Buf32, hash::hash_pair};
use tracing::*;

use crate::{
    error::MerkleError,
    proof::{MerkleProof, ProofStep, SiblingSide},
};

/// Fully materialized merkle tree.
///
/// `levels[0]` holds the leaves and the last level holds only the root.  Odd
/// levels are stored without their duplicated tail, the duplicate is implied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MerkleTree {
    levels: Vec<Vec<Buf32>>,
}

impl MerkleTree {
    /// Builds the tree bottom-up from an ordered, non-empty leaf sequence.
    pub fn build(leaves: Vec<Buf32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::NoElements);
        }

        let mut levels = vec![leaves];
        while let Some(cur) = levels.last().filter(|l| l.len() > 1) {
            let next = cur
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    [a] => hash_pair(a, a),
                    _ => unreachable!("merkle: chunk of two"),
                })
                .collect::<Vec<_>>();
            levels.push(next);
        }

        trace!(leaves = levels[0].len(), depth = levels.len() - 1, "built merkle tree");
        Ok(Self { levels })
    }

    /// Hashes the records in order and builds the tree over them.
    pub fn from_records(records: &[BadgeRecord]) -> Result<Self, MerkleError> {
        Self::build(records.iter().map(BadgeRecord::leaf_hash).collect())
    }

    pub fn root(&self) -> Buf32 {
        // a built tree always ends in a single root node
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> u64 {
        self.levels[0].len() as u64
    }

    /// Number of proof steps for every leaf of this tree.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn leaf(&self, index: u64) -> Option<&Buf32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.levels[0].get(i))
    }

    /// Generates the inclusion proof for the leaf at `index`.
    pub fn proof_for(&self, index: u64) -> Result<MerkleProof, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfBounds(index, self.leaf_count()));
        }

        let mut cur_index = index as usize;
        let mut steps = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            let step = if cur_index % 2 == 0 {
                // the last node of an odd level is its own sibling
                let sibling = level.get(cur_index + 1).unwrap_or(&level[cur_index]);
                ProofStep::new(*sibling, SiblingSide::Right)
            } else {
                ProofStep::new(level[cur_index - 1], SiblingSide::Left)
            };
            steps.push(step);
            cur_index >>= 1;
        }

        Ok(MerkleProof::new(steps))
    }
}

/// Proof depth of a tree with `leaf_count` leaves.
pub fn depth_for(leaf_count: u64) -> usize {
    let mut depth = 0;
    let mut width = leaf_count;
    while width > 1 {
        width = width.div_ceil(2);
        depth += 1;
    }
    depth
}

#[cfg(test)]
mod tests {
    use emblem_primitives::{buf::Buf20, hash};
    use emblem_test_utils::badges::sample_records;

    use super::*;

    fn leaves(n: u8) -> Vec<Buf32> {
        (0..n).map(|i| hash::raw(&[i])).collect()
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(MerkleTree::build(vec![]), Err(MerkleError::NoElements));
        assert_eq!(MerkleTree::from_records(&[]), Err(MerkleError::NoElements));
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let l = leaves(1);
        let tree = MerkleTree::build(l.clone()).unwrap();
        assert_eq!(tree.root(), l[0]);
        assert_eq!(tree.depth(), 0);
        assert!(tree.proof_for(0).unwrap().is_empty());
    }

    #[test]
    fn test_two_leaves() {
        let l = leaves(2);
        let tree = MerkleTree::build(l.clone()).unwrap();
        assert_eq!(tree.root(), hash_pair(&l[0], &l[1]));
    }

    #[test]
    fn test_odd_count_duplicates_last() {
        let records = [
            BadgeRecord::new(Buf20::from([0xaa; 20]), 1),
            BadgeRecord::new(Buf20::from([0xbb; 20]), 2),
            BadgeRecord::new(Buf20::from([0xcc; 20]), 3),
        ];
        let l: Vec<_> = records.iter().map(BadgeRecord::leaf_hash).collect();
        let tree = MerkleTree::from_records(&records).unwrap();

        let left = hash_pair(&l[0], &l[1]);
        let right = hash_pair(&l[2], &l[2]);
        assert_eq!(tree.root(), hash_pair(&left, &right));

        let proof = tree.proof_for(2).unwrap();
        assert_eq!(proof.len(), 2);
        assert_eq!(proof.steps()[0], ProofStep::new(l[2], SiblingSide::Right));
        assert_eq!(proof.steps()[1], ProofStep::new(left, SiblingSide::Left));
        assert!(proof.verify(&l[2], &tree.root()));
    }

    #[test]
    fn test_all_proofs_verify() {
        for n in 1..=33u8 {
            let tree = MerkleTree::build(leaves(n)).unwrap();
            assert_eq!(tree.depth(), depth_for(n as u64), "depth for {n}");
            for i in 0..n as u64 {
                let proof = tree.proof_for(i).unwrap();
                let leaf = tree.leaf(i).unwrap();
                assert!(proof.verify(leaf, &tree.root()), "leaf {i} of {n}");
                assert_eq!(proof.implied_index(), Some(i));
                assert_eq!(proof.len(), tree.depth());
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = sample_records(21);
        let a = MerkleTree::from_records(&records).unwrap();
        let b = MerkleTree::from_records(&records).unwrap();
        assert_eq!(a.root(), b.root());
        for i in 0..records.len() as u64 {
            assert_eq!(a.proof_for(i).unwrap(), b.proof_for(i).unwrap());
        }
    }

    #[test]
    fn test_reordering_changes_root() {
        let mut l = leaves(6);
        let before = MerkleTree::build(l.clone()).unwrap().root();
        l.swap(1, 4);
        let after = MerkleTree::build(l).unwrap().root();
        assert_ne!(before, after);
    }

    #[test]
    fn test_record_change_changes_root() {
        let mut records = sample_records(9);
        let before = MerkleTree::from_records(&records).unwrap().root();
        let r = records[5];
        records[5] = BadgeRecord::new(*r.winner(), r.badge_definition_number() ^ 1);
        let after = MerkleTree::from_records(&records).unwrap().root();
        assert_ne!(before, after);
    }

    #[test]
    fn test_tampered_proof_is_rejected() {
        let tree = MerkleTree::build(leaves(11)).unwrap();
        let root = tree.root();
        for i in 0..tree.leaf_count() {
            let leaf = *tree.leaf(i).unwrap();
            let proof = tree.proof_for(i).unwrap();

            // replay the honest path so we know which steps are self-paired
            let mut running = leaf;
            for (level, step) in proof.steps().iter().enumerate() {
                let mut bad = proof.clone();
                bad.steps_mut()[level].sibling = {
                    let mut bytes = step.sibling.to_bytes();
                    bytes[level % 32] ^= 0x01;
                    Buf32::from(bytes)
                };
                assert!(!bad.verify(&leaf, &root), "sibling tamper leaf {i} lvl {level}");

                // swapping sides is a no-op only when a node is paired with itself
                if step.sibling != running {
                    let mut flipped = proof.clone();
                    flipped.steps_mut()[level].side = step.side.flip();
                    assert!(!flipped.verify(&leaf, &root), "side flip leaf {i} lvl {level}");
                }
                running = step.apply(&running);
            }
        }
    }

    #[test]
    fn test_proof_out_of_bounds() {
        let tree = MerkleTree::build(leaves(4)).unwrap();
        assert_eq!(tree.proof_for(4), Err(MerkleError::IndexOutOfBounds(4, 4)));
    }

    #[test]
    fn test_depth_for() {
        assert_eq!(depth_for(1), 0);
        assert_eq!(depth_for(2), 1);
        assert_eq!(depth_for(3), 2);
        assert_eq!(depth_for(4), 2);
        assert_eq!(depth_for(5), 3);
        assert_eq!(depth_for(16), 4);
        assert_eq!(depth_for(17), 5);
    }
}
