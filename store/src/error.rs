use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("could not decode stored record: {0}")]
    Serialization(String),
}
