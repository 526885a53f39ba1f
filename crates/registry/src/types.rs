use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use emblem_merkle::MerkleProof;
use emblem_primitives::{
    badge::BadgeRecord,
    buf::{Buf20, Buf32},
};
use serde::{Deserialize, Serialize};

/// One badge to redeem, with the global index it claims and its proof.
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
pub struct UnfurlEntry {
    pub record: BadgeRecord,
    pub leaf_index: u64,
    pub proof: MerkleProof,
}

impl UnfurlEntry {
    pub fn new(record: BadgeRecord, leaf_index: u64, proof: MerkleProof) -> Self {
        Self {
            record,
            leaf_index,
            proof,
        }
    }
}

/// Effect of a successful unfurl, one per entry.
#[derive(
    Copy,
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
pub struct MintEvent {
    pub root: Buf32,
    pub leaf_index: u64,
    pub winner: Buf20,
    pub badge_definition_number: i8,
}
