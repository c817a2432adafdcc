//! Reference management for Grove.
//!
//! References are the human-readable entry points into the commit graph:
//! named pointers to object IDs, laid out hierarchically like git refs.
//!
//! - **Branches** (`refs/heads/*`) are mutable pointers to commits.
//! - **Tags** (`refs/tags/*`) are immutable once written.
//! - **Remote refs** (`refs/remotes/<remote>/*`) mirror branches elsewhere.
//! - **HEAD** names the current branch, or is detached at an object ID.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- Core ref types: [`Ref`], [`Head`]
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`names`] -- Ref namespaces and name validation
//! - [`memory`] -- In-memory [`InMemoryRefStore`]

pub mod error;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use memory::InMemoryRefStore;
pub use names::{validate_branch_name, validate_remote_name, validate_tag_name};
pub use traits::RefStore;
pub use types::{Head, Ref};
