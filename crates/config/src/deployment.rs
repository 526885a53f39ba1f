//! Contract addresses of one root/child ledger pair.

use emblem_primitives::buf::Buf20;
use serde::{Deserialize, Serialize};

/// Root ledger side: the controller that owns the root tunnel and the
/// messaging contracts it sends through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootChainConfig {
    pub controller: Buf20,
    pub checkpoint_manager: Buf20,
    pub fx_root: Buf20,
}

/// Child ledger side: the badge registry and the messaging contract that
/// delivers into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildChainConfig {
    pub registry: Buf20,
    pub fx_child: Buf20,
}

/// Selects which network pair every operation talks to.  There is no implicit
/// current network, the deployment is always passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub name: String,
    pub root: RootChainConfig,
    pub child: ChildChainConfig,
}

impl DeploymentConfig {
    /// Address the child tunnel must accept messages from.
    pub fn root_tunnel(&self) -> &Buf20 {
        &self.root.controller
    }

    /// Address the root tunnel sends to.
    pub fn child_tunnel(&self) -> &Buf20 {
        &self.child.registry
    }
}
