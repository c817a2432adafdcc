//! Content-addressed object storage for Grove.
//!
//! Every piece of repository data (file contents, directory listings and
//! commits) is stored as an immutable object identified by its BLAKE3 hash,
//! domain-separated by object kind.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- directory listing mapping names to object references
//! - [`Commit`] -- a tree snapshot with parents, author and message
//!
//! # Writing blobs
//!
//! Blobs can be written in one shot through [`ObjectStore::write_blob`] or
//! accumulated piecewise with a [`BlobStream`]. Both accept an optional hint
//! path that selects store-side [`ContentFilter`]s, e.g. [`CrlfFilter`].
//!
//! # Storage Backends
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding

pub mod error;
pub mod filter;
pub mod memory;
pub mod object;
pub mod stream;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use filter::{ContentFilter, CrlfFilter};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, Signature, StoredObject, Tree, TreeEntry};
pub use stream::BlobStream;
pub use traits::ObjectStore;
