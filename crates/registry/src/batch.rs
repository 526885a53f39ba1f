//! Helpers for callers driving a whole committed range through the registry.

use emblem_merkle::{MerkleError, MerkleTree};
use emblem_primitives::{badge::BadgeRecord, constants::UNFURL_BATCH_SIZE};

use crate::types::UnfurlEntry;

/// Builds one unfurl entry per record, tagged with global indexes starting at
/// `range_start`.  `records` must be the exact sequence `tree` was built from,
/// and the range end must fit in a `u64`.
pub fn unfurl_entries_for_range(
    tree: &MerkleTree,
    records: &[BadgeRecord],
    range_start: u64,
) -> Result<Vec<UnfurlEntry>, MerkleError> {
    let len = records.len() as u64;
    if range_start.checked_add(len).is_none() {
        return Err(MerkleError::RangeOverflow(range_start, len));
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let local = i as u64;
            let proof = tree.proof_for(local)?;
            Ok(UnfurlEntry::new(*record, range_start + local, proof))
        })
        .collect()
}

/// Splits entries into batches the registry will accept.  The last batch holds
/// whatever is left over, it is never dropped for being short.
pub fn plan_batches(entries: Vec<UnfurlEntry>) -> Vec<Vec<UnfurlEntry>> {
    entries
        .chunks(UNFURL_BATCH_SIZE)
        .map(<[UnfurlEntry]>::to_vec)
        .collect()
}
