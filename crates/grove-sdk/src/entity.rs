//! Tree-ish inputs to [`Repository::diff`](crate::Repository::diff).

use std::fmt;

use grove_refs::RefStore;
use grove_store::{Commit, ObjectKind, ObjectStore};
use grove_types::ObjectId;

use crate::error::{RepoError, RepoResult};
use crate::revparse::rev_parse;

/// Something the caller names as one side of a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A stored object.
    Id(ObjectId),
    /// A revision string, resolved with [`rev_parse`].
    Revision(String),
}

impl From<ObjectId> for Entity {
    fn from(id: ObjectId) -> Self {
        Entity::Id(id)
    }
}

impl From<&str> for Entity {
    fn from(spec: &str) -> Self {
        Entity::Revision(spec.to_string())
    }
}

impl From<String> for Entity {
    fn from(spec: String) -> Self {
        Entity::Revision(spec)
    }
}

/// What an entity turned out to be when it is not tree-ish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Object(ObjectKind),
    Missing(ObjectId),
    Unresolved(String),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Object(kind) => write!(f, "a {kind}"),
            Shape::Missing(id) => write!(f, "missing object {}", id.short_hex()),
            Shape::Unresolved(spec) => write!(f, "unresolvable revision `{spec}`"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// An entity resolved for diffing: a commit stands for its root tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffTarget {
    Tree(ObjectId),
    Invalid(Shape),
}

impl DiffTarget {
    /// The tree id, or a type mismatch blamed on `side`.
    pub fn into_tree(self, side: Side) -> RepoResult<ObjectId> {
        match self {
            DiffTarget::Tree(id) => Ok(id),
            DiffTarget::Invalid(actual) => Err(RepoError::TypeMismatch { side, actual }),
        }
    }
}

/// Resolve `entity` to a [`DiffTarget`].
///
/// Unresolvable revisions and absent objects become
/// [`DiffTarget::Invalid`]; store failures are returned as errors.
pub fn resolve_diff_target(store: &dyn ObjectStore, refs: &dyn RefStore, entity: &Entity) -> RepoResult<DiffTarget> {
    let id = match entity {
        Entity::Id(id) => *id,
        Entity::Revision(spec) => match rev_parse(store, refs, spec) {
            Ok(id) => id,
            Err(RepoError::Unresolved { .. }) => return Ok(DiffTarget::Invalid(Shape::Unresolved(spec.clone()))),
            Err(e) => return Err(e),
        },
    };

    let Some(object) = store.read(&id)? else {
        return Ok(DiffTarget::Invalid(Shape::Missing(id)));
    };
    Ok(match object.kind {
        ObjectKind::Tree => DiffTarget::Tree(id),
        ObjectKind::Commit => DiffTarget::Tree(*Commit::from_stored_object(&object)?.tree()),
        kind => DiffTarget::Invalid(Shape::Object(kind)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_refs::{InMemoryRefStore, Ref};
    use grove_store::{EntryMode, InMemoryObjectStore, Signature, Tree, TreeEntry};

    fn setup() -> (InMemoryObjectStore, InMemoryRefStore, ObjectId, ObjectId, ObjectId) {
        let store = InMemoryObjectStore::new();
        let refs = InMemoryRefStore::new();
        let blob = store.write_blob(b"hello", None).unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "hello.txt", blob)]);
        let tree = store.write(&tree.to_stored_object().unwrap()).unwrap();
        let commit = Commit::new(tree, vec![], Signature::new("Test", "test@example.com", 1), "init");
        let commit = store.write(&commit.to_stored_object().unwrap()).unwrap();
        refs.write_ref("refs/heads/main", &Ref::branch("main", commit)).unwrap();
        (store, refs, blob, tree, commit)
    }

    #[test]
    fn trees_and_commits_are_tree_ish() {
        let (store, refs, _, tree, commit) = setup();
        let resolve = |e: Entity| resolve_diff_target(&store, &refs, &e).unwrap();
        assert_eq!(resolve(tree.into()), DiffTarget::Tree(tree));
        assert_eq!(resolve(commit.into()), DiffTarget::Tree(tree));
        assert_eq!(resolve("main".into()), DiffTarget::Tree(tree));
    }

    #[test]
    fn other_shapes_are_invalid() {
        let (store, refs, blob, _, _) = setup();
        let missing = ObjectId::from_bytes(b"nowhere");
        let resolve = |e: Entity| resolve_diff_target(&store, &refs, &e).unwrap();
        assert_eq!(resolve(blob.into()), DiffTarget::Invalid(Shape::Object(ObjectKind::Blob)));
        assert_eq!(resolve(missing.into()), DiffTarget::Invalid(Shape::Missing(missing)));
        assert_eq!(
            resolve("not-a-tree-ish".into()),
            DiffTarget::Invalid(Shape::Unresolved("not-a-tree-ish".into()))
        );
    }

    #[test]
    fn mismatch_names_the_side() {
        let err = DiffTarget::Invalid(Shape::Object(ObjectKind::Blob))
            .into_tree(Side::Right)
            .unwrap_err();
        assert!(matches!(err, RepoError::TypeMismatch { side: Side::Right, .. }));
        assert_eq!(err.to_string(), "right side of diff is a blob, expected a tree or commit");
    }
}
