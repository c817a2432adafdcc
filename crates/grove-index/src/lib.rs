//! Staging index for Grove.
//!
//! Holds the pending-change set between the working directory and the next
//! commit, and turns it into nested tree objects.
//!
//! # Key Types
//!
//! - [`Index`] -- The in-memory staging area (BTreeMap-backed)
//! - [`IndexEntry`] -- A staged file
//! - [`StageFile`] -- Stage one working-directory file from disk

pub mod entry;
pub mod error;
pub mod index;
pub mod stage;

pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
pub use index::{validate_path, Index};
pub use stage::{index_path, StageFile};
