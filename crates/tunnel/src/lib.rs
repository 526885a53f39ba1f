//! Authenticated tunnel endpoints between the root ledger and the child ledger.
//!
//! Each side holds a [`TunnelMapping`] naming the one counterparty it will talk
//! to.  The root side hands commitment payloads to a [`TunnelTransport`], the
//! child side only dispatches payloads whose sender matches its mapping.

pub mod child;
pub mod errors;
pub mod handler;
pub mod mapping;
pub mod message;
pub mod root;
pub mod transport;

pub use child::ChildTunnel;
pub use errors::{TunnelError, TunnelResult};
pub use handler::MessageHandler;
pub use mapping::{MappingState, TunnelMapping};
pub use message::{CommitmentMessage, TunnelMessage, TunnelMsgId};
pub use root::RootTunnel;
pub use transport::{QueuedTransport, TunnelTransport};
