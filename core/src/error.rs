//! Error types for data-access operations.

use thiserror::Error;

/// Result type alias for data-access operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure modes of a [`BlogStore`](crate::BlogStore) call.
///
/// `NotFound` and `Conflict` are ordinary negative outcomes. `Backend` is the
/// only variant that indicates a fault in the storage layer itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The write would violate a uniqueness constraint.
    #[error("{0} already exists")]
    Conflict(String),

    /// Connectivity or query failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
