use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// No root is defined for an empty commitment.
    #[error("no elements present in merkle tree")]
    NoElements,

    #[error("leaf index {0} exceeds tree of {1} leaves")]
    IndexOutOfBounds(u64, u64),

    #[error("range of {1} leaves starting at {0} overflows the index space")]
    RangeOverflow(u64, u64),
}
