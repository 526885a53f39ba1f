use std::{fs, path::Path, time::Duration};

use emblem_config::{Config, IndexerConfig};
use emblem_indexer::{GraphQlIndexer, PaginationDriver};

use crate::{
    args::{apply_override, parse_override, Args, EnvArgs},
    errors::{ConfigError, InitError},
};

/// Loads the config file and applies overrides, env first so that args win.
pub fn get_config(args: &Args, env: &EnvArgs) -> Result<Config, InitError> {
    let mut overrides = env.get_overrides();
    overrides.extend(args.get_overrides());
    load_configuration(&args.config, &overrides)
}

fn load_configuration(path: &Path, overrides: &[String]) -> Result<Config, InitError> {
    let config_str = fs::read_to_string(path)?;
    let mut value = config_str.parse::<toml::Value>()?;
    let table = value.as_table_mut().ok_or(ConfigError::NotATable)?;

    for o in overrides {
        let (path, val) = parse_override(o)?;
        apply_override(&path, val, table)?;
    }

    let config: Config = value.try_into()?;
    Ok(config)
}

/// Sets up the indexer client and the driver paging through it.
pub fn init_driver(config: &IndexerConfig) -> anyhow::Result<PaginationDriver<GraphQlIndexer>> {
    let indexer = GraphQlIndexer::new(config.endpoint.clone())?.with_retries(
        config.max_retries,
        Duration::from_millis(config.retry_interval_ms),
    );
    Ok(PaginationDriver::new(indexer, config.page_size)?)
}
