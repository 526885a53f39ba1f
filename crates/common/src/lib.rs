//! Crate includes reusable utils for the badge tooling binaries.
//! Such as initializing the tracing framework and reading the environment.

pub mod env;
pub mod logging;
