use grove_types::ObjectId;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::ObjectStore;

/// Accumulates blob content piecewise and writes it as a single object.
///
/// Nothing reaches the store until [`finish`](Self::finish). Dropping an
/// unfinished stream discards the buffered bytes.
pub struct BlobStream<'s> {
    store: &'s dyn ObjectStore,
    hint_path: Option<String>,
    buf: Vec<u8>,
}

impl<'s> BlobStream<'s> {
    /// Open a stream that will write into `store`.
    ///
    /// `hint_path` is passed through to [`ObjectStore::write_blob`] on finish.
    pub fn open(store: &'s dyn ObjectStore, hint_path: Option<&str>) -> Self {
        Self {
            store,
            hint_path: hint_path.map(str::to_owned),
            buf: Vec::new(),
        }
    }

    /// Append a chunk.
    pub fn write(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Commit the accumulated bytes and return the new blob's ID.
    pub fn finish(self) -> StoreResult<ObjectId> {
        let id = self.store.write_blob(&self.buf, self.hint_path.as_deref())?;
        debug!(blob = %id.short_hex(), size = self.buf.len(), "blob stream finished");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CrlfFilter;
    use crate::memory::InMemoryObjectStore;

    #[test]
    fn chunks_are_concatenated() {
        let store = InMemoryObjectStore::new();
        let mut stream = BlobStream::open(&store, None);
        assert!(stream.is_empty());
        stream.write(b"hello ");
        stream.write(b"world");
        assert_eq!(stream.len(), 11);
        let id = stream.finish().unwrap();
        assert_eq!(store.read_blob(&id).unwrap().data, b"hello world");
    }

    #[test]
    fn empty_stream_writes_empty_blob() {
        let store = InMemoryObjectStore::new();
        let id = BlobStream::open(&store, None).finish().unwrap();
        assert_eq!(store.read_blob(&id).unwrap().size(), 0);
    }

    #[test]
    fn hint_path_selects_filters() {
        let store = InMemoryObjectStore::new().with_filter(CrlfFilter::default());
        let mut stream = BlobStream::open(&store, Some("doc/readme.md"));
        stream.write(b"a\r\n");
        stream.write(b"b\r\n");
        let id = stream.finish().unwrap();
        assert_eq!(store.read_blob(&id).unwrap().data, b"a\nb\n");
    }

    #[test]
    fn unfinished_stream_stores_nothing() {
        let store = InMemoryObjectStore::new();
        {
            let mut stream = BlobStream::open(&store, None);
            stream.write(b"discarded");
        }
        assert!(store.is_empty());
    }
}
