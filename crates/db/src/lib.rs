//! Storage interfaces for the child-side registry state.

pub mod errors;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

pub use errors::{DbError, DbResult};
