use std::path::PathBuf;

use argh::FromArgs;
use emblem_common::env::parse_env;
use emblem_primitives::buf::Buf32;
use toml::value::Table;

use crate::errors::ConfigError;

/// Envvar holding an indexer endpoint that overrides the config file.
const INDEXER_URL_ENVVAR: &str = "EMBLEM_INDEXER_URL";

/// Configs overridable by environment.
#[derive(Debug, Clone, Default)]
pub struct EnvArgs {
    indexer_url: Option<String>,
}

impl EnvArgs {
    pub fn from_env() -> Self {
        Self {
            indexer_url: parse_env(INDEXER_URL_ENVVAR),
        }
    }

    /// Get strings of overrides gathered from env.
    pub fn get_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(url) = &self.indexer_url {
            overrides.push(format!("indexer.endpoint={url}"));
        }
        overrides
    }
}

#[derive(Debug, Clone, FromArgs)]
#[argh(description = "Emblem badge commitment tool")]
pub struct Args {
    // Config non-overriding args
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: PathBuf,

    // Config overriding args
    /// Indexer endpoint that will override the one in the config toml.
    #[argh(option, description = "indexer GraphQL endpoint")]
    pub indexer_url: Option<String>,

    #[argh(option, description = "records fetched per indexer request")]
    pub page_size: Option<u64>,

    /// Other generic overrides to the config toml.
    /// Will be used, for example, as `-o indexer.max_retries=5 -o deployment.name=local`
    #[argh(option, short = 'o', description = "generic config overrides")]
    pub overrides: Vec<String>,

    #[argh(subcommand)]
    pub subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(subcommand)]
pub enum Subcommand {
    BuildRoot(SubcBuildRoot),
    Proof(SubcProof),
    Simulate(SubcSimulate),
    StoreRoot(SubcStoreRoot),
    Inspect(SubcInspect),
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(
    subcommand,
    name = "build-root",
    description = "fetches a window of badges and prints its commitment"
)]
pub struct SubcBuildRoot {
    #[argh(option, description = "global index of the first badge", short = 'i')]
    pub starting_index: u64,

    #[argh(option, description = "number of badges to commit to", short = 's')]
    pub tree_size: u64,
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(
    subcommand,
    name = "proof",
    description = "prints the inclusion proof for one badge of a window"
)]
pub struct SubcProof {
    #[argh(option, description = "global index of the first badge", short = 'i')]
    pub starting_index: u64,

    #[argh(option, description = "number of badges to commit to", short = 's')]
    pub tree_size: u64,

    #[argh(option, description = "global index of the badge to prove", short = 'l')]
    pub leaf: u64,
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(
    subcommand,
    name = "simulate",
    description = "runs commit, tunnel and unfurl for a window in process"
)]
pub struct SubcSimulate {
    #[argh(option, description = "global index of the first badge", short = 'i')]
    pub starting_index: u64,

    #[argh(option, description = "number of badges to commit to", short = 's')]
    pub tree_size: u64,
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(
    subcommand,
    name = "store-root",
    description = "stores a root in the registry directly, bypassing the tunnel"
)]
pub struct SubcStoreRoot {
    #[argh(option, description = "global index of the first badge", short = 'i')]
    pub starting_index: u64,

    #[argh(option, description = "number of badges the root commits to", short = 's')]
    pub tree_size: u64,

    /// Store this root as given instead of building one from the indexer.
    #[argh(option, description = "hex root to store")]
    pub root: Option<Buf32>,
}

#[derive(FromArgs, PartialEq, Debug, Clone)]
#[argh(
    subcommand,
    name = "inspect",
    description = "prints tunnel mappings and, given a window, its posted root"
)]
pub struct SubcInspect {
    #[argh(option, description = "global index of the first badge", short = 'i')]
    pub starting_index: Option<u64>,

    #[argh(option, description = "number of badges to commit to", short = 's')]
    pub tree_size: Option<u64>,
}

impl Args {
    /// Get strings of overrides gathered from args.
    pub fn get_overrides(&self) -> Vec<String> {
        let mut overrides = self.overrides.clone();
        overrides.extend(self.get_direct_overrides());
        overrides
    }

    /// Overrides passed directly as args and not as overrides.
    fn get_direct_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(url) = &self.indexer_url {
            overrides.push(format!("indexer.endpoint={url}"));
        }
        if let Some(page_size) = &self.page_size {
            overrides.push(format!("indexer.page_size={page_size}"));
        }
        overrides
    }
}

type Override = (String, toml::Value);

/// Parses an override.  This first splits the string by '=' to get key and
/// value and then the key is split by '.' to get the update path.
pub fn parse_override(override_str: &str) -> Result<Override, ConfigError> {
    let (key, value_str) = override_str
        .split_once('=')
        .ok_or(ConfigError::InvalidOverride(override_str.to_string()))?;
    Ok((key.to_string(), parse_value(value_str)))
}

/// Apply override to config.
pub fn apply_override(
    path: &str,
    value: toml::Value,
    table: &mut Table,
) -> Result<(), ConfigError> {
    match path.split_once('.') {
        None => {
            table.insert(path.to_string(), value);
            Ok(())
        }
        Some((key, rest)) => {
            if let Some(t) = table.get_mut(key).and_then(|v| v.as_table_mut()) {
                apply_override(rest, value, t)
            } else if table.contains_key(key) {
                Err(ConfigError::TraverseNonTableAt(key.to_string()))
            } else {
                Err(ConfigError::MissingKey(key.to_string()))
            }
        }
    }
}

/// Parses a string into a toml value. First tries as `i64`, then as `bool` and then defaults to
/// `String`.  Hex addresses stay strings since they never parse as decimal.
fn parse_value(str_value: &str) -> toml::Value {
    str_value
        .parse::<i64>()
        .map(toml::Value::Integer)
        .or_else(|_| str_value.parse::<bool>().map(toml::Value::Boolean))
        .unwrap_or_else(|_| toml::Value::String(str_value.to_string()))
}

#[cfg(test)]
mod test {
    use emblem_config::{ChildChainConfig, Config, DeploymentConfig, IndexerConfig, RootChainConfig};
    use emblem_primitives::buf::Buf20;

    use super::*;

    fn get_config() -> Config {
        Config {
            indexer: IndexerConfig {
                endpoint: "http://localhost:8000".to_string(),
                page_size: 100,
                max_retries: 3,
                retry_interval_ms: 1000,
            },
            deployment: DeploymentConfig {
                name: "local".to_string(),
                root: RootChainConfig {
                    controller: Buf20::from([1; 20]),
                    checkpoint_manager: Buf20::from([2; 20]),
                    fx_root: Buf20::from([3; 20]),
                },
                child: ChildChainConfig {
                    registry: Buf20::from([4; 20]),
                    fx_child: Buf20::from([5; 20]),
                },
            },
        }
    }

    fn args_with(overrides: Vec<String>) -> Args {
        Args {
            config: "config_path".into(),
            indexer_url: Some("http://indexer".to_string()),
            page_size: Some(25),
            overrides,
            subc: Subcommand::BuildRoot(SubcBuildRoot {
                starting_index: 0,
                tree_size: 16,
            }),
        }
    }

    #[test]
    fn test_apply_override() {
        let config = get_config();
        let mut toml = toml::Value::try_from(&config).unwrap();
        let table = toml.as_table_mut().unwrap();
        let args = args_with(vec![
            "indexer.max_retries=7".to_string(),
            "deployment.name=goerli".to_string(),
            "deployment.child.registry=0x7a08e303aB01e2CDbb0eeb0eE76fe877c9B995b6".to_string(),
        ]);

        let overrides = args
            .get_overrides()
            .into_iter()
            .map(|x| parse_override(&x).unwrap());

        for (path, val) in overrides {
            apply_override(&path, val, table).unwrap();
        }

        let new_config: Config = toml.try_into().unwrap();

        assert_eq!(new_config.indexer.max_retries, 7);
        assert_eq!(new_config.indexer.page_size, 25);
        assert_eq!(&new_config.indexer.endpoint, "http://indexer");
        assert_eq!(&new_config.deployment.name, "goerli");
        assert_eq!(
            new_config.deployment.child.registry,
            "0x7a08e303aB01e2CDbb0eeb0eE76fe877c9B995b6"
                .parse::<Buf20>()
                .unwrap()
        );
        assert_eq!(new_config.deployment.root, config.deployment.root);
    }

    #[test]
    fn test_bad_overrides() {
        assert!(matches!(
            parse_override("indexer.page_size"),
            Err(ConfigError::InvalidOverride(_))
        ));

        let mut toml = toml::Value::try_from(get_config()).unwrap();
        let table = toml.as_table_mut().unwrap();
        assert!(matches!(
            apply_override("nope.key", toml::Value::Integer(1), table),
            Err(ConfigError::MissingKey(_))
        ));
        assert!(matches!(
            apply_override("deployment.name.inner", toml::Value::Integer(1), table),
            Err(ConfigError::TraverseNonTableAt(_))
        ));
    }

    #[test]
    fn test_admin_subcommands_parse() {
        let root = format!("0x{}", "ab".repeat(32));
        let args = Args::from_args(
            &["emblem-cli"],
            &["-c", "cfg.toml", "store-root", "-i", "3", "-s", "8", "--root", root.as_str()],
        )
        .unwrap();
        assert_eq!(
            args.subc,
            Subcommand::StoreRoot(SubcStoreRoot {
                starting_index: 3,
                tree_size: 8,
                root: Some(Buf32::from([0xab; 32])),
            })
        );

        let args = Args::from_args(&["emblem-cli"], &["-c", "cfg.toml", "inspect"]).unwrap();
        assert_eq!(
            args.subc,
            Subcommand::Inspect(SubcInspect {
                starting_index: None,
                tree_size: None,
            })
        );

        assert!(Args::from_args(
            &["emblem-cli"],
            &["-c", "cfg.toml", "store-root", "-i", "0", "-s", "1", "--root", "0x12"],
        )
        .is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env = EnvArgs {
            indexer_url: Some("http://env-indexer".to_string()),
        };
        assert_eq!(
            env.get_overrides(),
            vec!["indexer.endpoint=http://env-indexer".to_string()]
        );
        assert!(EnvArgs::default().get_overrides().is_empty());
    }
}
