//! Shared setup for the end-to-end badge flows.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use emblem_common::logging;
use emblem_db::stubs::StubRootDb;
use emblem_indexer::{stubs::StaticIndexer, BuiltCommitment, PaginationDriver};
use emblem_merkle::Commitment;
use emblem_primitives::buf::Buf20;
use emblem_registry::BadgeRegistry;
use emblem_test_utils::badges::sample_records;
use emblem_tunnel::{ChildTunnel, QueuedTransport, RootTunnel, TunnelResult};
use tracing::debug;

pub(crate) const ROOT_ADDR: Buf20 = Buf20::new([0xa1; 20]);
pub(crate) const CHILD_ADDR: Buf20 = Buf20::new([0xc1; 20]);

/// Number of badges the stub indexer knows about.
pub(crate) const INDEXED_BADGES: usize = 100;

static LOGGING: Once = Once::new();

pub(crate) fn init_logging() {
    LOGGING.call_once(|| {
        let _ = logging::init(logging::LoggerConfig::with_base_name("integration-tests"));
    });
}

/// Both tunnel ends wired over one queued transport, with the child side
/// delivering into a registry backed by the in-memory root store.
pub(crate) struct Harness {
    pub(crate) transport: Arc<QueuedTransport>,
    pub(crate) root_tunnel: RootTunnel<Arc<QueuedTransport>>,
    pub(crate) child_tunnel: ChildTunnel<BadgeRegistry<StubRootDb>>,
    pub(crate) registry: BadgeRegistry<StubRootDb>,
}

impl Harness {
    /// Endpoints exist but nothing is mapped yet.
    pub(crate) fn unmapped() -> Self {
        init_logging();
        let transport = Arc::new(QueuedTransport::new());
        let registry = BadgeRegistry::new(Arc::new(StubRootDb::new()));
        Self {
            root_tunnel: RootTunnel::new(ROOT_ADDR, transport.clone()),
            child_tunnel: ChildTunnel::new(CHILD_ADDR, registry.clone()),
            transport,
            registry,
        }
    }

    pub(crate) fn mapped() -> Self {
        let mut h = Self::unmapped();
        h.root_tunnel.set_child_tunnel(CHILD_ADDR);
        h.child_tunnel.set_root_tunnel(ROOT_ADDR);
        h
    }

    /// Delivers everything queued on the transport, in order.
    pub(crate) fn deliver_all(&mut self) -> Vec<TunnelResult<u64>> {
        self.transport
            .drain()
            .iter()
            .map(|msg| {
                let res = self.child_tunnel.deliver(msg);
                debug!(msg_id = %msg.compute_id(), ok = res.is_ok(), "delivered");
                res
            })
            .collect()
    }
}

pub(crate) fn indexer() -> StaticIndexer {
    StaticIndexer::new(sample_records(INDEXED_BADGES))
}

/// Builds the commitment for a window of the stub indexer's badges.
pub(crate) async fn build_window(starting_index: u64, tree_size: u64) -> BuiltCommitment {
    let driver = PaginationDriver::new(indexer(), 7).expect("test: driver");
    driver
        .build_commitment(starting_index, tree_size)
        .await
        .expect("test: build commitment")
}

pub(crate) fn commitment_of(built: &BuiltCommitment) -> Commitment {
    built.commitment
}
