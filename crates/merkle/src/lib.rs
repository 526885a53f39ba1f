//! Positional merkle commitments over ordered badge leaves.
//!
//! Pairs are combined in the order they appear (never sorted) and an odd node
//! at the end of a level is paired with itself.  Proofs carry an explicit side
//! for every sibling so a verifier can replay the exact topology without ever
//! seeing the full leaf set.

pub mod commitment;
pub mod error;
pub mod proof;
pub mod tree;

pub use commitment::Commitment;
pub use error::MerkleError;
pub use proof::{MerkleProof, ProofStep, SiblingSide};
pub use tree::{depth_for, MerkleTree};
