//! Error types for the diff crate.

use grove_store::{ObjectKind, StoreError};
use grove_types::ObjectId;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An object that should be a tree has another kind.
    #[error("object {id} is a {actual}, expected a tree")]
    NotATree { id: ObjectId, actual: ObjectKind },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
