//! The core Index structure managing staged entries in memory.
//!
//! The [`Index`] keeps a `BTreeMap<String, IndexEntry>` keyed by
//! `/`-separated relative path. Writing a tree turns the flat path map into
//! one tree object per directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use grove_store::{EntryMode, ObjectStore, Tree, TreeEntry};
use grove_types::ObjectId;
use tracing::debug;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};

/// The staging index: tracks which files go into the next commit.
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
    /// Root tree written for the current entries, if still valid.
    tree_cache: Option<ObjectId>,
    /// Whether [`StageFile`](crate::StageFile) reads through symlinks.
    pub follow_symlinks: bool,
    pub(crate) store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("entries", &self.entries.len())
            .field("tree_cache", &self.tree_cache)
            .field("follow_symlinks", &self.follow_symlinks)
            .finish()
    }
}

/// Validate a staged path: relative, `/`-separated, no empty, `.` or `..`
/// components.
pub fn validate_path(path: &str) -> IndexResult<()> {
    if path.is_empty() {
        return Err(IndexError::InvalidPath("empty path".to_string()));
    }
    if path.contains('\0') {
        return Err(IndexError::InvalidPath(format!("{path:?} contains NUL")));
    }
    if path.split('/').any(|c| c.is_empty() || c == "." || c == "..") {
        return Err(IndexError::InvalidPath(path.to_string()));
    }
    Ok(())
}

impl Index {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: BTreeMap::new(),
            tree_cache: None,
            follow_symlinks: false,
            store,
        }
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by path.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Staged paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Stage in-memory content at `path`.
    ///
    /// The blob is written with `path` as hint, so store-side content
    /// filters apply.
    pub fn stage_bytes(&mut self, path: &str, content: &[u8], mode: EntryMode) -> IndexResult<&IndexEntry> {
        validate_path(path)?;
        let object_id = self.store.write_blob(content, Some(path))?;
        let size = self.store.read_blob(&object_id)?.size() as u64;
        Ok(self.insert(IndexEntry::new(path, object_id, mode, size)))
    }

    pub(crate) fn insert(&mut self, entry: IndexEntry) -> &IndexEntry {
        debug!(path = %entry.path, blob = %entry.object_id.short_hex(), mode = %entry.mode, "entry staged");
        self.tree_cache = None;
        let path = entry.path.clone();
        self.entries.insert(path.clone(), entry);
        &self.entries[&path]
    }

    // ---------------------------------------------------------------
    // Tree building
    // ---------------------------------------------------------------

    /// Write one tree per directory and return the root tree's ID.
    ///
    /// Fails with `PathConflict` if a staged path is also the directory
    /// prefix of another staged path.
    pub fn write_tree(&mut self) -> IndexResult<ObjectId> {
        if let Some(id) = self.tree_cache {
            return Ok(id);
        }

        let mut root = DirNode::default();
        for entry in self.entries.values() {
            root.insert(entry)?;
        }
        let tree_id = root.write(self.store.as_ref())?;
        debug!(tree = %tree_id.short_hex(), entries = self.entries.len(), "index written");

        self.tree_cache = Some(tree_id);
        Ok(tree_id)
    }
}

#[derive(Default)]
struct DirNode<'a> {
    files: BTreeMap<&'a str, &'a IndexEntry>,
    dirs: BTreeMap<&'a str, DirNode<'a>>,
}

impl<'a> DirNode<'a> {
    fn insert(&mut self, entry: &'a IndexEntry) -> IndexResult<()> {
        let mut node = self;
        let mut components = entry.path.split('/').peekable();
        while let Some(name) = components.next() {
            if components.peek().is_none() {
                if node.dirs.contains_key(name) {
                    return Err(IndexError::PathConflict(entry.path.clone()));
                }
                node.files.insert(name, entry);
            } else {
                if node.files.contains_key(name) {
                    return Err(IndexError::PathConflict(entry.path.clone()));
                }
                node = node.dirs.entry(name).or_default();
            }
        }
        Ok(())
    }

    fn write(&self, store: &dyn ObjectStore) -> IndexResult<ObjectId> {
        let mut entries: Vec<TreeEntry> = self
            .files
            .iter()
            .map(|(name, e)| TreeEntry::new(e.mode, *name, e.object_id))
            .collect();
        for (name, dir) in &self.dirs {
            entries.push(TreeEntry::new(EntryMode::Directory, *name, dir.write(store)?));
        }
        Ok(store.write(&Tree::new(entries).to_stored_object()?)?)
    }
}
