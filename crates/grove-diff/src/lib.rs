//! Tree diff engine for Grove.
//!
//! Compares two stored trees recursively and reports per-path changes.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`TreeChange`] -- added, deleted, modified, renamed and
//!   mode-changed entries, keyed by `/`-joined paths

pub mod error;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_trees, TreeChange, TreeDiff};
