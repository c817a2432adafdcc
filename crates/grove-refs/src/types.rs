//! Core reference types.

use grove_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::names::{HEADS_PREFIX, REMOTES_PREFIX, TAGS_PREFIX};

/// A named reference to an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// A mutable pointer to a commit.
    Branch {
        /// Short branch name (e.g. "main", "feature/auth").
        name: String,
        target: ObjectId,
    },

    /// An immutable pointer to any object.
    Tag {
        /// Short tag name (e.g. "v1.0.0").
        name: String,
        target: ObjectId,
        /// Annotation, if any.
        message: Option<String>,
    },

    /// A remote tracking ref mirrors a branch on a remote.
    Remote {
        /// Name of the remote (e.g. "origin").
        remote: String,
        /// Branch name on the remote.
        branch: String,
        target: ObjectId,
    },
}

impl Ref {
    /// A branch ref.
    pub fn branch(name: impl Into<String>, target: ObjectId) -> Self {
        Ref::Branch {
            name: name.into(),
            target,
        }
    }

    /// A lightweight tag.
    pub fn tag(name: impl Into<String>, target: ObjectId) -> Self {
        Ref::Tag {
            name: name.into(),
            target,
            message: None,
        }
    }

    /// A remote tracking ref.
    pub fn remote(remote: impl Into<String>, branch: impl Into<String>, target: ObjectId) -> Self {
        Ref::Remote {
            remote: remote.into(),
            branch: branch.into(),
            target,
        }
    }

    /// Returns the canonical name for this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("{HEADS_PREFIX}{name}"),
            Ref::Tag { name, .. } => format!("{TAGS_PREFIX}{name}"),
            Ref::Remote { remote, branch, .. } => format!("{REMOTES_PREFIX}{remote}/{branch}"),
        }
    }

    /// Returns the short name of this ref.
    pub fn short_name(&self) -> &str {
        match self {
            Ref::Branch { name, .. } | Ref::Tag { name, .. } => name,
            Ref::Remote { branch, .. } => branch,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Ref::Remote { .. })
    }

    /// The object this ref points to.
    pub fn target(&self) -> ObjectId {
        match self {
            Ref::Branch { target, .. } | Ref::Tag { target, .. } | Ref::Remote { target, .. } => {
                *target
            }
        }
    }
}

/// The state of HEAD: either symbolic (naming a branch) or detached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD names a branch by its short name.
    Symbolic(String),
    /// HEAD points directly at an object.
    Detached(ObjectId),
}
