//! Error types for history traversal.

use grove_store::{ObjectKind, StoreError};
use grove_types::ObjectId;

/// Errors that can occur while walking history.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// A start point or parent link does not name a commit.
    #[error("object {id} is a {kind}, not a commit")]
    NotACommit { id: ObjectId, kind: ObjectKind },

    /// Reading a commit from the object store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for walk results.
pub type WalkResult<T> = Result<T, WalkError>;
