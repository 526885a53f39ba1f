use std::collections::HashMap;

use emblem_primitives::buf::Buf32;
use parking_lot::RwLock;

use crate::{traits::RootDatabase, types::PostedRootRecord, DbResult};

/// In-memory root store.  Records are kept borsh-encoded so reads never hand
/// out aliases of stored state.
#[derive(Debug, Default)]
pub struct StubRootDb {
    roots: RwLock<HashMap<Buf32, Vec<u8>>>,
}

impl StubRootDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RootDatabase for StubRootDb {
    fn put_posted_root(&self, record: PostedRootRecord) -> DbResult<()> {
        let enc = borsh::to_vec(&record)?;
        let mut tbl = self.roots.write();
        tbl.insert(*record.root(), enc);
        Ok(())
    }

    fn get_posted_root(&self, root: &Buf32) -> DbResult<Option<PostedRootRecord>> {
        let tbl = self.roots.read();
        tbl.get(root)
            .map(|enc| borsh::from_slice::<PostedRootRecord>(enc))
            .transpose()
            .map_err(Into::into)
    }

    fn get_root_count(&self) -> DbResult<u64> {
        Ok(self.roots.read().len() as u64)
    }
}
