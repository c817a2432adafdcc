use grove_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, Commit, ObjectKind, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same data always produces the
///   same ID.
/// - Concurrent reads are always safe (objects are immutable).
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Delete an object by ID. Returns `true` if the object existed.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored IDs whose hex form starts with `prefix`, sorted.
    fn find_by_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>>;

    /// Write raw bytes as a blob.
    ///
    /// `hint_path` names the working-tree path the bytes came from. Backends
    /// with content filters use it to decide which filters apply; without a
    /// hint the bytes are stored as given. The default implementation
    /// applies no filters.
    fn write_blob(&self, data: &[u8], hint_path: Option<&str>) -> StoreResult<ObjectId> {
        let _ = hint_path;
        self.write(&StoredObject::new(ObjectKind::Blob, data.to_vec()))
    }

    /// Read an object that must exist.
    fn read_existing(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Read and decode a blob.
    fn read_blob(&self, id: &ObjectId) -> StoreResult<Blob> {
        Blob::from_stored_object(&self.read_existing(id)?)
    }

    /// Read and decode a tree.
    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        Tree::from_stored_object(&self.read_existing(id)?)
    }

    /// Read and decode a commit.
    fn read_commit(&self, id: &ObjectId) -> StoreResult<Commit> {
        Commit::from_stored_object(&self.read_existing(id)?)
    }
}
