//! Error types for the indexer client and the pagination driver.

use emblem_merkle::MerkleError;
use emblem_primitives::errors::EncodingError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// The error type for errors produced by the indexer client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The GraphQL server answered with query errors.
    #[error("indexer returned errors: {}", .0.join("; "))]
    Server(Vec<String>),

    #[error("Error parsing indexer response: {0}")]
    Parse(String),

    /// Body error, unlikely to be recoverable by retrying
    #[error("{0}")]
    Body(String),

    /// HTTP status error, not retryable
    #[error("Obtained failure status({0}): {1}")]
    Status(String, String),

    /// Error decoding the response, retry might help
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),

    /// Connection error, retry might help
    #[error("Could not connect: {0}")]
    Connection(String),

    /// Timeout error, retry might help
    #[error("Timeout")]
    Timeout,

    /// Redirect error, not retryable
    #[error("HttpRedirect: {0}")]
    HttpRedirect(String),

    /// Error building the request, unlikely to be recoverable
    #[error("Could not build request: {0}")]
    ReqBuilder(String),

    /// Maximum retries exceeded, not retryable
    #[error("Max retries {0} exceeded")]
    MaxRetriesExceeded(u8),

    /// General request error, retry might help
    #[error("Could not create request: {0}")]
    Request(String),

    /// A record in the response could not be encoded.
    #[error("record {0}: {1}")]
    Encoding(u64, EncodingError),

    /// Unknown error, unlikely to be recoverable
    #[error("{0}")]
    Other(String),
}

impl From<SerdeJsonError> for ClientError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Parse(format!("Could not parse {}", value))
    }
}

/// Errors building a commitment from paginated records.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("no records in window starting at {0}")]
    EmptyCommitment(u64),

    #[error("page size must be nonzero")]
    ZeroPageSize,

    #[error("indexer: {0}")]
    Indexer(#[from] ClientError),

    #[error("merkle: {0}")]
    Merkle(#[from] MerkleError),
}
