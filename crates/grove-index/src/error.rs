//! Error types for the index crate.

use std::path::PathBuf;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// An invalid path was provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A path is staged both as a file and as a directory prefix.
    #[error("path is both a file and a directory: {0}")]
    PathConflict(String),

    /// The path does not name something that can be staged as a file.
    #[error("not a stageable file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Reading from the working directory failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] grove_store::StoreError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
