//! Errors during parsing/handling/conversion of primitives.

use thiserror::Error;

/// Parsing errors for fixed-width buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The string was not valid hex of the expected width.
    #[error("invalid hex for {0}: {1:?}")]
    InvalidHex(&'static str, String),
}

/// Errors raised while turning raw indexer values into a badge record, before
/// anything gets hashed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The winner field is not a 20-byte hex address.
    #[error("malformed winner address: {0}")]
    MalformedWinner(#[from] ParseError),

    /// The badge definition number does not fit in a signed 8-bit integer.
    #[error("badge definition number {0} out of range for int8")]
    DefinitionOutOfRange(i64),

    /// The badge definition number is not an integer at all.
    #[error("badge definition number {0:?} is not an integer")]
    DefinitionNotInteger(String),
}
