use std::path::PathBuf;

use grove_store::StoreError;

/// Errors from building blobs.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Writing to the object store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Reading a source file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A working-directory path was absolute or escaped the root.
    #[error("invalid working-directory path: {}", .0.display())]
    InvalidPath(PathBuf),
}

pub type BlobResult<T> = Result<T, BlobError>;
