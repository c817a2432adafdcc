//! Tree-level diff: compare two trees and produce a list of changes.
//!
//! Subtrees are compared recursively, skipping any whose object IDs match.
//! Only leaf entries (files and symlinks) are reported; a directory that
//! appears or disappears shows up as one change per leaf beneath it.

use std::collections::{BTreeMap, BTreeSet};

use grove_store::{EntryMode, ObjectKind, ObjectStore, Tree, TreeEntry};
use grove_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DiffError, DiffResult};

/// The result of comparing two trees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDiff {
    /// Changes sorted by path (the new path for renames).
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    /// Create an empty tree diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The change touching `path`, if any.
    pub fn get(&self, path: &str) -> Option<&TreeChange> {
        self.changes.iter().find(|c| c.path() == path)
    }
}

/// A single change between two trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeChange {
    Added {
        path: String,
        new_id: ObjectId,
        mode: EntryMode,
    },
    Deleted {
        path: String,
        old_id: ObjectId,
        mode: EntryMode,
    },
    /// Same path, different content.
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
        mode: EntryMode,
    },
    /// A deleted and an added path carrying the identical object.
    Renamed {
        old_path: String,
        new_path: String,
        id: ObjectId,
        mode: EntryMode,
    },
    /// Same content, different mode.
    ModeChanged {
        path: String,
        id: ObjectId,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
}

impl TreeChange {
    /// The path this change is filed under; renames use the new path.
    pub fn path(&self) -> &str {
        match self {
            TreeChange::Added { path, .. }
            | TreeChange::Deleted { path, .. }
            | TreeChange::Modified { path, .. }
            | TreeChange::ModeChanged { path, .. } => path,
            TreeChange::Renamed { new_path, .. } => new_path,
        }
    }
}

/// Compare two stored trees.
///
/// - `old_tree`: the previous tree, or `None` to compare against nothing.
/// - `new_tree`: the current tree.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: &ObjectId,
) -> DiffResult<TreeDiff> {
    let mut acc = Accumulator::default();
    compare(store, old_tree.copied(), Some(*new_tree), "", &mut acc)?;
    let diff = acc.finish();
    debug!(
        old = ?old_tree.map(ObjectId::short_hex),
        new = %new_tree.short_hex(),
        changes = diff.len(),
        "trees compared"
    );
    Ok(diff)
}

#[derive(Default)]
struct Accumulator {
    changes: Vec<TreeChange>,
    deleted: Vec<(String, TreeEntry)>,
    added: Vec<(String, TreeEntry)>,
}

impl Accumulator {
    fn finish(mut self) -> TreeDiff {
        // Pair deletions and additions of the identical object, first come
        // first served in path order.
        let mut added: Vec<Option<(String, TreeEntry)>> = self.added.into_iter().map(Some).collect();
        for (old_path, old_entry) in self.deleted {
            let pair = added.iter_mut().find(|slot| {
                matches!(slot, Some((_, e)) if e.object_id == old_entry.object_id)
            });
            match pair.and_then(Option::take) {
                Some((new_path, new_entry)) => self.changes.push(TreeChange::Renamed {
                    old_path,
                    new_path,
                    id: new_entry.object_id,
                    mode: new_entry.mode,
                }),
                None => self.changes.push(TreeChange::Deleted {
                    path: old_path,
                    old_id: old_entry.object_id,
                    mode: old_entry.mode,
                }),
            }
        }
        for (path, entry) in added.into_iter().flatten() {
            self.changes.push(TreeChange::Added {
                path,
                new_id: entry.object_id,
                mode: entry.mode,
            });
        }
        self.changes.sort_by(|a, b| a.path().cmp(b.path()));
        TreeDiff {
            changes: self.changes,
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

fn load_entries(
    store: &dyn ObjectStore,
    id: Option<ObjectId>,
) -> DiffResult<BTreeMap<String, TreeEntry>> {
    let Some(id) = id else {
        return Ok(BTreeMap::new());
    };
    let obj = store.read_existing(&id)?;
    if obj.kind != ObjectKind::Tree {
        return Err(DiffError::NotATree {
            id,
            actual: obj.kind,
        });
    }
    let tree = Tree::from_stored_object(&obj)?;
    Ok(tree.entries.into_iter().map(|e| (e.name.clone(), e)).collect())
}

fn compare(
    store: &dyn ObjectStore,
    old: Option<ObjectId>,
    new: Option<ObjectId>,
    prefix: &str,
    acc: &mut Accumulator,
) -> DiffResult<()> {
    if old == new {
        return Ok(());
    }
    let old_entries = load_entries(store, old)?;
    let new_entries = load_entries(store, new)?;
    let names: BTreeSet<&String> = old_entries.keys().chain(new_entries.keys()).collect();

    for name in names {
        let path = join(prefix, name);
        match (old_entries.get(name), new_entries.get(name)) {
            (Some(o), Some(n)) if o.mode.is_tree() && n.mode.is_tree() => {
                compare(store, Some(o.object_id), Some(n.object_id), &path, acc)?;
            }
            (Some(o), Some(n)) if o.mode.is_tree() || n.mode.is_tree() => {
                removed(store, o, path.clone(), acc)?;
                introduced(store, n, path, acc)?;
            }
            (Some(o), Some(n)) => {
                if o.object_id != n.object_id {
                    acc.changes.push(TreeChange::Modified {
                        path,
                        old_id: o.object_id,
                        new_id: n.object_id,
                        mode: n.mode,
                    });
                } else if o.mode != n.mode {
                    acc.changes.push(TreeChange::ModeChanged {
                        path,
                        id: o.object_id,
                        old_mode: o.mode,
                        new_mode: n.mode,
                    });
                }
            }
            (Some(o), None) => removed(store, o, path, acc)?,
            (None, Some(n)) => introduced(store, n, path, acc)?,
            (None, None) => {}
        }
    }
    Ok(())
}

fn removed(
    store: &dyn ObjectStore,
    entry: &TreeEntry,
    path: String,
    acc: &mut Accumulator,
) -> DiffResult<()> {
    if entry.mode.is_tree() {
        compare(store, Some(entry.object_id), None, &path, acc)
    } else {
        acc.deleted.push((path, entry.clone()));
        Ok(())
    }
}

fn introduced(
    store: &dyn ObjectStore,
    entry: &TreeEntry,
    path: String,
    acc: &mut Accumulator,
) -> DiffResult<()> {
    if entry.mode.is_tree() {
        compare(store, None, Some(entry.object_id), &path, acc)
    } else {
        acc.added.push((path, entry.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_store::{InMemoryObjectStore, StoreError};

    fn blob(store: &InMemoryObjectStore, data: &str) -> ObjectId {
        store.write_blob(data.as_bytes(), None).unwrap()
    }

    fn tree(store: &InMemoryObjectStore, entries: Vec<TreeEntry>) -> ObjectId {
        store.write(&Tree::new(entries).to_stored_object().unwrap()).unwrap()
    }

    fn file(name: &str, id: ObjectId) -> TreeEntry {
        TreeEntry::new(EntryMode::Regular, name, id)
    }

    fn dir(name: &str, id: ObjectId) -> TreeEntry {
        TreeEntry::new(EntryMode::Directory, name, id)
    }

    #[test]
    fn empty_to_populated_all_additions() {
        let store = InMemoryObjectStore::new();
        let new = tree(&store, vec![file("a.txt", blob(&store, "a")), file("b.txt", blob(&store, "b"))]);

        let diff = diff_trees(&store, None, &new).unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.changes.iter().all(|c| matches!(c, TreeChange::Added { .. })));
    }

    #[test]
    fn identical_trees_no_changes() {
        let store = InMemoryObjectStore::new();
        let t = tree(&store, vec![file("file.txt", blob(&store, "x"))]);
        assert!(diff_trees(&store, Some(&t), &t).unwrap().is_empty());
    }

    #[test]
    fn mixed_changes_sorted_by_path() {
        let store = InMemoryObjectStore::new();
        let old = tree(
            &store,
            vec![
                file("keep.txt", blob(&store, "keep")),
                file("modify.txt", blob(&store, "v1")),
                file("delete.txt", blob(&store, "gone")),
            ],
        );
        let new = tree(
            &store,
            vec![
                file("keep.txt", blob(&store, "keep")),
                file("modify.txt", blob(&store, "v2")),
                file("added.txt", blob(&store, "new")),
            ],
        );

        let diff = diff_trees(&store, Some(&old), &new).unwrap();
        let paths: Vec<&str> = diff.changes.iter().map(TreeChange::path).collect();
        assert_eq!(paths, ["added.txt", "delete.txt", "modify.txt"]);
        assert!(matches!(diff.get("modify.txt"), Some(TreeChange::Modified { .. })));
        assert!(matches!(diff.get("delete.txt"), Some(TreeChange::Deleted { .. })));
    }

    #[test]
    fn mode_change_detection() {
        let store = InMemoryObjectStore::new();
        let id = blob(&store, "#!/bin/sh");
        let old = tree(&store, vec![file("run.sh", id)]);
        let new = tree(&store, vec![TreeEntry::new(EntryMode::Executable, "run.sh", id)]);

        let diff = diff_trees(&store, Some(&old), &new).unwrap();
        assert_eq!(
            diff.changes,
            vec![TreeChange::ModeChanged {
                path: "run.sh".into(),
                id,
                old_mode: EntryMode::Regular,
                new_mode: EntryMode::Executable,
            }]
        );
    }

    #[test]
    fn nested_changes_use_slash_paths() {
        let store = InMemoryObjectStore::new();
        let unchanged = tree(&store, vec![file("same.txt", blob(&store, "same"))]);
        let old_src = tree(&store, vec![file("lib.rs", blob(&store, "v1"))]);
        let new_src = tree(&store, vec![file("lib.rs", blob(&store, "v2"))]);
        let old = tree(&store, vec![dir("docs", unchanged), dir("src", old_src)]);
        let new = tree(&store, vec![dir("docs", unchanged), dir("src", new_src)]);

        let diff = diff_trees(&store, Some(&old), &new).unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.changes[0].path(), "src/lib.rs");
    }

    #[test]
    fn rename_across_directories() {
        let store = InMemoryObjectStore::new();
        let content = blob(&store, "moved content");
        let sub = tree(&store, vec![file("new.txt", content)]);
        let old = tree(&store, vec![file("old.txt", content)]);
        let new = tree(&store, vec![dir("sub", sub)]);

        let diff = diff_trees(&store, Some(&old), &new).unwrap();
        assert_eq!(
            diff.changes,
            vec![TreeChange::Renamed {
                old_path: "old.txt".into(),
                new_path: "sub/new.txt".into(),
                id: content,
                mode: EntryMode::Regular,
            }]
        );
    }

    #[test]
    fn directory_replaced_by_file() {
        let store = InMemoryObjectStore::new();
        let sub = tree(&store, vec![file("a", blob(&store, "a")), file("b", blob(&store, "b"))]);
        let old = tree(&store, vec![dir("thing", sub)]);
        let new = tree(&store, vec![file("thing", blob(&store, "now a file"))]);

        let diff = diff_trees(&store, Some(&old), &new).unwrap();
        let paths: Vec<&str> = diff.changes.iter().map(TreeChange::path).collect();
        assert_eq!(paths, ["thing", "thing/a", "thing/b"]);
        assert!(matches!(diff.get("thing"), Some(TreeChange::Added { .. })));
    }

    #[test]
    fn non_tree_input_is_rejected() {
        let store = InMemoryObjectStore::new();
        let b = blob(&store, "not a tree");
        let err = diff_trees(&store, None, &b).unwrap_err();
        assert!(matches!(err, DiffError::NotATree { actual: ObjectKind::Blob, .. }));
    }

    #[test]
    fn missing_tree_is_store_error() {
        let store = InMemoryObjectStore::new();
        let ghost = ObjectId::from_bytes(b"ghost");
        let err = diff_trees(&store, None, &ghost).unwrap_err();
        assert!(matches!(err, DiffError::Store(StoreError::NotFound(_))));
    }
}
