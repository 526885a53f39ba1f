use thiserror::Error;

/// Simple result type used across database interface.
pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("codec: {0}")]
    Codec(String),
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Codec(value.to_string())
    }
}
