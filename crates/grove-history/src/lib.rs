//! Commit history traversal for Grove.
//!
//! [`RevWalk`] walks every commit reachable from one or more starting
//! commits through their parent links, in the order selected by a
//! [`SortPolicy`].

pub mod error;
pub mod walk;

pub use error::{WalkError, WalkResult};
pub use walk::{RevWalk, SortPolicy, Sorting};
