use std::path::PathBuf;

use grove_blob::BlobError;
use grove_diff::DiffError;
use grove_history::WalkError;
use grove_index::IndexError;
use grove_refs::RefError;
use grove_store::StoreError;
use thiserror::Error;

use crate::entity::{Shape, Side};

/// Coarse classification of a [`RepoError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A diff side does not resolve to a tree.
    TypeMismatch,
    /// A revision, branch target or reference could not be resolved.
    ResolutionFailure,
    /// The object store, ref store or a traversal over them failed.
    StoreFailure,
    /// The working directory could not be read.
    FilesystemFailure,
    /// A reference filter is not a valid regular expression.
    InvalidPattern,
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{side} side of diff is {actual}, expected a tree or commit")]
    TypeMismatch { side: Side, actual: Shape },

    #[error("cannot resolve revision `{spec}`: {reason}")]
    Unresolved { spec: String, reason: String },

    #[error("reference {name} disappeared while listing")]
    MissingReference { name: String },

    #[error("invalid reference pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("repository has no working directory")]
    NoWorkdir,

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory traversal failed: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("blob error: {0}")]
    Blob(#[from] BlobError),
}

impl RepoError {
    pub(crate) fn unresolved(spec: &str, reason: impl Into<String>) -> Self {
        RepoError::Unresolved {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    /// The kind of failure, for callers that branch on category rather
    /// than on the exact variant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            RepoError::Unresolved { .. } | RepoError::MissingReference { .. } => ErrorKind::ResolutionFailure,
            RepoError::InvalidPattern(_) => ErrorKind::InvalidPattern,
            RepoError::NoWorkdir | RepoError::Filesystem { .. } | RepoError::Traversal(_) => {
                ErrorKind::FilesystemFailure
            }
            RepoError::Store(_) | RepoError::Ref(_) | RepoError::Diff(_) => ErrorKind::StoreFailure,
            RepoError::Walk(WalkError::NotACommit { .. }) => ErrorKind::ResolutionFailure,
            RepoError::Walk(WalkError::Store(_)) => ErrorKind::StoreFailure,
            RepoError::Index(IndexError::Io { .. } | IndexError::NotAFile(_) | IndexError::InvalidPath(_)) => {
                ErrorKind::FilesystemFailure
            }
            RepoError::Index(_) => ErrorKind::StoreFailure,
            RepoError::Blob(BlobError::Store(_)) => ErrorKind::StoreFailure,
            RepoError::Blob(BlobError::Io { .. } | BlobError::InvalidPath(_)) => ErrorKind::FilesystemFailure,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from loading a [`RepositoryConfig`](crate::RepositoryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_types::ObjectId;

    #[test]
    fn kinds() {
        let missing = ObjectId::from_bytes(b"missing");
        let cases = [
            (RepoError::unresolved("nope", "no such ref"), ErrorKind::ResolutionFailure),
            (RepoError::MissingReference { name: "refs/heads/x".into() }, ErrorKind::ResolutionFailure),
            (RepoError::Store(StoreError::NotFound(missing)), ErrorKind::StoreFailure),
            (
                RepoError::Ref(RefError::AlreadyExists { name: "refs/heads/x".into() }),
                ErrorKind::StoreFailure,
            ),
            (RepoError::NoWorkdir, ErrorKind::FilesystemFailure),
            (
                RepoError::Index(IndexError::NotAFile(PathBuf::from("dir"))),
                ErrorKind::FilesystemFailure,
            ),
            (
                RepoError::Blob(BlobError::InvalidPath(PathBuf::from("../x"))),
                ErrorKind::FilesystemFailure,
            ),
            (
                RepoError::TypeMismatch {
                    side: Side::Left,
                    actual: Shape::Unresolved("x".into()),
                },
                ErrorKind::TypeMismatch,
            ),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn invalid_regex_is_pattern_error() {
        let err: RepoError = regex::Regex::new("(").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }
}
