//! High-level SDK for Grove.
//!
//! [`Repository`] ties the object store, reference store, staging index and
//! blob engine together behind one API: diffing tree-ish entities, walking
//! history, listing references, creating branches, resolving revisions,
//! staging working-directory entries and building blobs.

pub mod config;
pub mod entity;
pub mod error;
pub mod repository;
pub mod revparse;
pub mod workdir;

pub use config::RepositoryConfig;
pub use entity::{DiffTarget, Entity, Shape, Side};
pub use error::{ConfigError, ErrorKind, RepoError, RepoResult};
pub use repository::{BranchTarget, Repository, DEFAULT_BRANCH};
pub use revparse::rev_parse;

// Re-export key types
pub use grove_blob::{BlobBuilder, BlobConfig, BlobContent, Chunk, ChunkProvider, Classification, Limit, TextEncoding};
pub use grove_diff::{TreeChange, TreeDiff};
pub use grove_history::{RevWalk, SortPolicy, Sorting};
pub use grove_refs::{Head, Ref};
pub use grove_store::{Blob, Commit, EntryMode, Signature, Tree, TreeEntry};
pub use grove_types::ObjectId;
