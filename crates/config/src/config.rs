use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentConfig;

/// Default value for `page_size` in [`IndexerConfig`].
const DEFAULT_PAGE_SIZE: u64 = 100;

/// Default value for `max_retries` in [`IndexerConfig`].
const DEFAULT_MAX_RETRIES: u8 = 3;

/// Default value for `retry_interval_ms` in [`IndexerConfig`].
const DEFAULT_RETRY_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// GraphQL endpoint of the badge subgraph.
    pub endpoint: String,

    /// How many records to ask the indexer for at once.
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Attempts per request before giving up on transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,

    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_max_retries() -> u8 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_interval_ms() -> u64 {
    DEFAULT_RETRY_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub indexer: IndexerConfig,
    pub deployment: DeploymentConfig,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_load() {
        let config_string = r#"
            [indexer]
            endpoint = "https://api.studio.thegraph.com/query/2486/test/2.2.3"
            page_size = 50

            [deployment]
            name = "goerli"

            [deployment.root]
            controller = "0x59753aaaF864e36eacDce8D68245DE655e028425"
            checkpoint_manager = "0x2890bA17EfE978480615e330ecB65333b880928e"
            fx_root = "0x3d1d3E34f7fB6D26245E6640E1c50710eFFf15bA"

            [deployment.child]
            registry = "0x7a08e303aB01e2CDbb0eeb0eE76fe877c9B995b6"
            fx_child = "0xCf73231F28B7331BBe3124B907840A94851f9f11"
        "#;

        let config = toml::from_str::<Config>(config_string);
        assert!(
            config.is_ok(),
            "should be able to load TOML config but got: {:?}",
            config.err()
        );

        let config = config.unwrap();
        assert_eq!(config.indexer.page_size, 50);
        assert_eq!(config.indexer.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.indexer.retry_interval_ms, DEFAULT_RETRY_INTERVAL_MS);
        assert_eq!(config.deployment.name, "goerli");
    }

    #[test]
    fn test_config_rejects_bad_address() {
        let config_string = r#"
            [indexer]
            endpoint = "http://localhost:8000"

            [deployment]
            name = "local"

            [deployment.root]
            controller = "0x1234"
            checkpoint_manager = "0x2890bA17EfE978480615e330ecB65333b880928e"
            fx_root = "0x3d1d3E34f7fB6D26245E6640E1c50710eFFf15bA"

            [deployment.child]
            registry = "0x7a08e303aB01e2CDbb0eeb0eE76fe877c9B995b6"
            fx_child = "0xCf73231F28B7331BBe3124B907840A94851f9f11"
        "#;

        assert!(toml::from_str::<Config>(config_string).is_err());
    }
}
