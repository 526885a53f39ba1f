use emblem_db::DbError;
use emblem_primitives::buf::Buf32;
use thiserror::Error;

/// Reasons a `store_root` or `unfurl_batch` call is rejected.  Every variant
/// that concerns a single entry names its position in the batch.
#[derive(Debug, Error)]
pub enum UnfurlError {
    #[error("empty unfurl batch")]
    EmptyBatch,

    #[error("unfurl batch of {0} entries exceeds limit of {1}")]
    BatchTooLarge(usize, usize),

    #[error("unknown commitment {0}")]
    UnknownRoot(Buf32),

    #[error("commitment {0} covers no leaves")]
    EmptyRange(Buf32),

    #[error("commitment {root} range {range_start}+{range_size} overflows the index space")]
    RangeOverflow {
        root: Buf32,
        range_start: u64,
        range_size: u64,
    },

    #[error("entry {entry}: leaf {leaf_index} outside committed range {range_start}..{range_end}")]
    LeafOutOfRange {
        entry: usize,
        leaf_index: u64,
        range_start: u64,
        range_end: u64,
    },

    #[error("entry {entry}: proof for leaf {leaf_index} does not verify against {root}")]
    ProofVerification {
        entry: usize,
        leaf_index: u64,
        root: Buf32,
    },

    #[error("entry {entry}: leaf {leaf_index} already unfurled")]
    DuplicateUnfurl { entry: usize, leaf_index: u64 },

    #[error("db: {0}")]
    Db(#[from] DbError),
}
