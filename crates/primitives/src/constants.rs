//! Protocol constants shared by the root and child sides.

/// Maximum number of entries accepted by a single `unfurl_batch` call.
pub const UNFURL_BATCH_SIZE: usize = 16;

/// Width in bytes of a packed badge record (`address ‖ int8`).
pub const BADGE_ENCODED_LEN: usize = 21;
