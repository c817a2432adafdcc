use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use grove_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::filter::ContentFilter;
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
    filters: Vec<Box<dyn ContentFilter>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store with no content filters.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            filters: Vec::new(),
        }
    }

    /// Add a content filter applied to hinted blob writes.
    ///
    /// Filters run in the order they were added.
    pub fn with_filter(mut self, filter: impl ContentFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return a sorted list of all object IDs in the store.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut map = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        // The same ID always maps to the same content.
        map.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.contains_key(id))
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut map = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.remove(id).is_some())
    }

    fn find_by_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<ObjectId> = map
            .keys()
            .filter(|id| id.has_hex_prefix(prefix))
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn write_blob(&self, data: &[u8], hint_path: Option<&str>) -> StoreResult<ObjectId> {
        let mut bytes = data.to_vec();
        if let Some(path) = hint_path {
            for filter in self.filters.iter().filter(|f| f.applies_to(path)) {
                let before = bytes.len();
                bytes = filter.clean(path, bytes);
                debug!(filter = filter.name(), path, before, after = bytes.len(), "applied content filter");
            }
        }
        self.write(&StoredObject::new(ObjectKind::Blob, bytes))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .field("filters", &self.filters.len())
            .finish()
    }
}
