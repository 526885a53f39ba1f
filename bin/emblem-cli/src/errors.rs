use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed config: {0}")]
    MalformedConfig(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Override string is not of the form `key=value`.
    #[error("invalid override: '{0}'")]
    InvalidOverride(String),

    #[error("missing key: {0}")]
    MissingKey(String),

    /// Tried to descend into a value that is not a table.
    #[error("can only traverse tables, {0} is not one")]
    TraverseNonTableAt(String),

    #[error("config root is not a table")]
    NotATable,
}
