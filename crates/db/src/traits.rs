//! Trait definitions for low level database interfaces.

use emblem_primitives::buf::Buf32;

use crate::{types::PostedRootRecord, DbResult};

/// Store of roots posted through the tunnel, keyed by root value.
///
/// Operations are NOT VALIDATED at this level, the registry is responsible for
/// only writing records it has fully checked.  Records are never deleted.
pub trait RootDatabase {
    /// Writes the record, replacing any record for the same root in one step.
    fn put_posted_root(&self, record: PostedRootRecord) -> DbResult<()>;

    /// Gets the record for a root, if it was ever posted.
    fn get_posted_root(&self, root: &Buf32) -> DbResult<Option<PostedRootRecord>>;

    /// Number of distinct roots ever posted.
    fn get_root_count(&self) -> DbResult<u64>;
}
