//! Child-side badge registry: stores posted roots and unfurls them into mints
//! in bounded, all-or-nothing batches.

pub mod batch;
pub mod errors;
pub mod registry;
pub mod types;

pub use batch::{plan_batches, unfurl_entries_for_range};
pub use errors::UnfurlError;
pub use registry::BadgeRegistry;
pub use types::{MintEvent, UnfurlEntry};
