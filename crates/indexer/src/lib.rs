//! Pulls earned badges from the indexing service and turns them into commitments.

pub mod client;
pub mod driver;
pub mod error;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

pub use client::{ClientResult, GraphQlIndexer};
pub use driver::{BuiltCommitment, PaginationDriver};
pub use error::{ClientError, DriverError};
pub use traits::BadgeIndexer;
