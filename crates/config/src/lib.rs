pub mod config;
pub mod deployment;

pub use config::{Config, IndexerConfig};
pub use deployment::{ChildChainConfig, DeploymentConfig, RootChainConfig};
