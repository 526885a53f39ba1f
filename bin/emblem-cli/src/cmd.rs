use std::sync::Arc;

use anyhow::{anyhow, Context};
use emblem_config::{Config, DeploymentConfig};
use emblem_db::{stubs::StubRootDb, traits::RootDatabase, types::PostedRootRecord};
use emblem_indexer::BuiltCommitment;
use emblem_merkle::{Commitment, MerkleProof};
use emblem_primitives::prelude::*;
use emblem_registry::{plan_batches, unfurl_entries_for_range, BadgeRegistry};
use emblem_tunnel::{ChildTunnel, QueuedTransport, RootTunnel};
use serde::Serialize;
use tracing::*;

use crate::{
    args::{SubcBuildRoot, SubcInspect, SubcProof, SubcSimulate, SubcStoreRoot, Subcommand},
    helpers::init_driver,
};

type LocalRegistry = BadgeRegistry<StubRootDb>;

#[derive(Debug, Serialize)]
pub struct ProofOutput {
    pub root: Buf32,
    pub leaf_index: u64,
    pub record: BadgeRecord,
    pub leaf: Buf32,
    pub proof: MerkleProof,
}

#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub deployment: String,
    pub commitment: Commitment,
    pub msg_id: String,
    pub state_id: u64,
    pub batches: usize,
    pub minted: usize,
    pub fully_unfurled: bool,
}

/// Child-side state of one posted root.
#[derive(Debug, Serialize)]
pub struct PostedRootView {
    pub commitment: Commitment,
    pub processed: u64,
    pub fully_unfurled: bool,
}

impl From<&PostedRootRecord> for PostedRootView {
    fn from(record: &PostedRootRecord) -> Self {
        Self {
            commitment: *record.commitment(),
            processed: record.processed_count(),
            fully_unfurled: record.is_fully_unfurled(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ControllerView {
    pub address: Buf20,
    pub fx_root: Buf20,
    pub checkpoint_manager: Buf20,
    pub child_tunnel: Option<Buf20>,
}

#[derive(Debug, Serialize)]
pub struct RegistryView {
    pub address: Buf20,
    pub fx_child: Buf20,
    pub root_tunnel: Option<Buf20>,
    pub latest_state_id: u64,
}

#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub deployment: String,
    pub controller: ControllerView,
    pub registry: RegistryView,
    pub posted_root: Option<PostedRootView>,
}

/// Both tunnel ends of a deployment mapped to each other over a queued
/// transport, with the registry behind the child end.
struct LocalBridge {
    transport: Arc<QueuedTransport>,
    registry: LocalRegistry,
    root_tunnel: RootTunnel<Arc<QueuedTransport>>,
    child_tunnel: ChildTunnel<LocalRegistry>,
}

impl LocalBridge {
    fn connect(deployment: &DeploymentConfig) -> Self {
        let transport = Arc::new(QueuedTransport::new());
        let registry = BadgeRegistry::new(Arc::new(StubRootDb::new()));

        let mut root_tunnel = RootTunnel::new(*deployment.root_tunnel(), transport.clone());
        let mut child_tunnel = ChildTunnel::new(*deployment.child_tunnel(), registry.clone());
        root_tunnel.set_child_tunnel(*deployment.child_tunnel());
        child_tunnel.set_root_tunnel(*deployment.root_tunnel());

        Self {
            transport,
            registry,
            root_tunnel,
            child_tunnel,
        }
    }

    /// Sends a commitment and delivers everything queued, returning the message
    /// id and the last state id the child assigned.
    fn post(&mut self, commitment: &Commitment) -> anyhow::Result<(String, u64)> {
        let msg_id = self.root_tunnel.send_commitment(commitment)?;

        let mut state_id = 0;
        for msg in self.transport.drain() {
            state_id = self
                .child_tunnel
                .deliver(&msg)
                .with_context(|| format!("delivering {}", msg.compute_id()))?;
        }
        Ok((msg_id.to_string(), state_id))
    }
}

pub async fn exec_subc(cmd: Subcommand, config: &Config) -> anyhow::Result<()> {
    match cmd {
        Subcommand::BuildRoot(subc) => exec_build_root(subc, config).await,
        Subcommand::Proof(subc) => exec_proof(subc, config).await,
        Subcommand::Simulate(subc) => exec_simulate(subc, config).await,
        Subcommand::StoreRoot(subc) => exec_store_root(subc, config).await,
        Subcommand::Inspect(subc) => exec_inspect(subc, config).await,
    }
}

async fn exec_build_root(cmd: SubcBuildRoot, config: &Config) -> anyhow::Result<()> {
    let driver = init_driver(&config.indexer)?;
    let built = driver
        .build_commitment(cmd.starting_index, cmd.tree_size)
        .await?;
    print_json(&built.commitment)
}

async fn exec_proof(cmd: SubcProof, config: &Config) -> anyhow::Result<()> {
    let driver = init_driver(&config.indexer)?;
    let built = driver
        .build_commitment(cmd.starting_index, cmd.tree_size)
        .await?;
    print_json(&proof_output(&built, cmd.leaf)?)
}

async fn exec_simulate(cmd: SubcSimulate, config: &Config) -> anyhow::Result<()> {
    let driver = init_driver(&config.indexer)?;
    let built = driver
        .build_commitment(cmd.starting_index, cmd.tree_size)
        .await?;
    let summary = run_simulation(&config.deployment, &built)?;
    print_json(&summary)
}

async fn exec_store_root(cmd: SubcStoreRoot, config: &Config) -> anyhow::Result<()> {
    let commitment = match cmd.root {
        Some(root) => Commitment::new(root, cmd.starting_index, cmd.tree_size),
        None => {
            let driver = init_driver(&config.indexer)?;
            driver
                .build_commitment(cmd.starting_index, cmd.tree_size)
                .await?
                .commitment
        }
    };

    let registry = BadgeRegistry::new(Arc::new(StubRootDb::new()));
    print_json(&store_root_direct(&registry, &commitment)?)
}

async fn exec_inspect(cmd: SubcInspect, config: &Config) -> anyhow::Result<()> {
    let built = match (cmd.starting_index, cmd.tree_size) {
        (Some(start), Some(size)) => {
            let driver = init_driver(&config.indexer)?;
            Some(driver.build_commitment(start, size).await?)
        }
        (None, None) => None,
        _ => return Err(anyhow!("inspect needs both -i and -s, or neither")),
    };
    print_json(&run_inspection(&config.deployment, built.as_ref())?)
}

fn print_json<T: Serialize>(v: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

/// Looks up the proof for a global leaf index of a built commitment.
pub fn proof_output(built: &BuiltCommitment, leaf_index: u64) -> anyhow::Result<ProofOutput> {
    let commitment = &built.commitment;
    let local = commitment.local_index(leaf_index).ok_or_else(|| {
        anyhow!(
            "leaf {leaf_index} not in committed range {}..{}",
            commitment.range_start,
            commitment.range_end()
        )
    })?;

    let record = *built
        .records
        .get(local as usize)
        .ok_or_else(|| anyhow!("no record for leaf {leaf_index}"))?;

    Ok(ProofOutput {
        root: commitment.root,
        leaf_index,
        record,
        leaf: record.leaf_hash(),
        proof: built.tree.proof_for(local)?,
    })
}

/// Stores a commitment through the administrative path, skipping the tunnel.
pub fn store_root_direct<D: RootDatabase>(
    registry: &BadgeRegistry<D>,
    commitment: &Commitment,
) -> anyhow::Result<PostedRootView> {
    registry.store_root(commitment)?;
    let record = registry
        .posted_root(&commitment.root)?
        .ok_or_else(|| anyhow!("root {} missing after store", commitment.root))?;

    info!(root = %commitment.root, "stored root through admin path");
    Ok(PostedRootView::from(&record))
}

/// Reports both tunnel ends of a deployment.  With a built window the
/// commitment is posted through the tunnel first so its record shows up too.
pub fn run_inspection(
    deployment: &DeploymentConfig,
    built: Option<&BuiltCommitment>,
) -> anyhow::Result<InspectOutput> {
    let mut bridge = LocalBridge::connect(deployment);

    let posted_root = match built {
        Some(built) => {
            bridge.post(&built.commitment)?;
            bridge
                .registry
                .posted_root(&built.commitment.root)?
                .as_ref()
                .map(PostedRootView::from)
        }
        None => None,
    };

    Ok(InspectOutput {
        deployment: deployment.name.clone(),
        controller: ControllerView {
            address: *bridge.root_tunnel.mapping().local(),
            fx_root: deployment.root.fx_root,
            checkpoint_manager: deployment.root.checkpoint_manager,
            child_tunnel: bridge.root_tunnel.mapping().counterparty().copied(),
        },
        registry: RegistryView {
            address: *bridge.child_tunnel.mapping().local(),
            fx_child: deployment.child.fx_child,
            root_tunnel: bridge.child_tunnel.mapping().counterparty().copied(),
            latest_state_id: bridge.child_tunnel.mapping().latest_state_id(),
        },
        posted_root,
    })
}

/// Runs the whole pipeline in process: maps both tunnel ends from the
/// deployment, posts the commitment over a queued transport, then unfurls every
/// leaf in batches.
pub fn run_simulation(
    deployment: &DeploymentConfig,
    built: &BuiltCommitment,
) -> anyhow::Result<SimulationSummary> {
    let root = built.commitment.root;
    let mut bridge = LocalBridge::connect(deployment);
    let (msg_id, state_id) = bridge.post(&built.commitment)?;
    let registry = &bridge.registry;

    let entries =
        unfurl_entries_for_range(&built.tree, &built.records, built.commitment.range_start)?;
    let batches = plan_batches(entries);
    let mut minted = 0;
    for (i, batch) in batches.iter().enumerate() {
        let events = registry
            .unfurl_batch(batch, &root)
            .with_context(|| format!("unfurling batch {i}"))?;
        minted += events.len();
    }

    let record = registry
        .posted_root(&root)?
        .ok_or_else(|| anyhow!("root {root} missing after delivery"))?;

    info!(deployment = %deployment.name, %root, %minted, "simulation finished");
    Ok(SimulationSummary {
        deployment: deployment.name.clone(),
        commitment: built.commitment,
        msg_id,
        state_id,
        batches: batches.len(),
        minted,
        fully_unfurled: record.is_fully_unfurled(),
    })
}

#[cfg(test)]
mod tests {
    use emblem_config::{ChildChainConfig, RootChainConfig};
    use emblem_indexer::{stubs::StaticIndexer, PaginationDriver};
    use emblem_test_utils::badges::sample_records;

    use super::*;

    fn deployment() -> DeploymentConfig {
        DeploymentConfig {
            name: "test".to_string(),
            root: RootChainConfig {
                controller: Buf20::from([0x11; 20]),
                checkpoint_manager: Buf20::from([0x12; 20]),
                fx_root: Buf20::from([0x13; 20]),
            },
            child: ChildChainConfig {
                registry: Buf20::from([0x21; 20]),
                fx_child: Buf20::from([0x22; 20]),
            },
        }
    }

    async fn built(start: u64, size: u64) -> BuiltCommitment {
        let driver = PaginationDriver::new(StaticIndexer::new(sample_records(64)), 10).unwrap();
        driver.build_commitment(start, size).await.unwrap()
    }

    #[tokio::test]
    async fn test_simulation_unfurls_everything() {
        let built = built(8, 37).await;
        let summary = run_simulation(&deployment(), &built).unwrap();

        assert_eq!(summary.state_id, 1);
        assert_eq!(summary.batches, 3);
        assert_eq!(summary.minted, 37);
        assert!(summary.fully_unfurled);
        assert_eq!(summary.commitment, built.commitment);
    }

    #[tokio::test]
    async fn test_proof_output() {
        let built = built(8, 5).await;
        let out = proof_output(&built, 10).unwrap();
        assert_eq!(out.record, built.records[2]);
        assert!(out.proof.verify(&out.leaf, &out.root));

        assert!(proof_output(&built, 7).is_err());
        assert!(proof_output(&built, 13).is_err());
    }

    #[tokio::test]
    async fn test_store_root_direct() {
        let built = built(0, 9).await;
        let registry = BadgeRegistry::new(Arc::new(StubRootDb::new()));

        let view = store_root_direct(&registry, &built.commitment).unwrap();
        assert_eq!(view.commitment, built.commitment);
        assert_eq!(view.processed, 0);
        assert!(!view.fully_unfurled);
        assert_eq!(registry.db().get_root_count().unwrap(), 1);

        // the stored root redeems like one that came through the tunnel
        let entries = unfurl_entries_for_range(&built.tree, &built.records, 0).unwrap();
        registry
            .unfurl_batch(&entries[..4], &built.commitment.root)
            .unwrap();
        let view = store_root_direct(&registry, &built.commitment).unwrap();
        assert_eq!(view.processed, 4);

        let empty = Commitment::new(Buf32::from([5; 32]), 0, 0);
        assert!(store_root_direct(&registry, &empty).is_err());
    }

    #[tokio::test]
    async fn test_inspection_reports_mappings() {
        let d = deployment();
        let out = run_inspection(&d, None).unwrap();
        assert_eq!(out.controller.address, d.root.controller);
        assert_eq!(out.controller.child_tunnel, Some(d.child.registry));
        assert_eq!(out.controller.fx_root, d.root.fx_root);
        assert_eq!(out.registry.address, d.child.registry);
        assert_eq!(out.registry.root_tunnel, Some(d.root.controller));
        assert_eq!(out.registry.latest_state_id, 0);
        assert!(out.posted_root.is_none());

        let built = built(4, 6).await;
        let out = run_inspection(&d, Some(&built)).unwrap();
        assert_eq!(out.registry.latest_state_id, 1);
        let posted = out.posted_root.unwrap();
        assert_eq!(posted.commitment, built.commitment);
        assert_eq!(posted.processed, 0);
    }
}
