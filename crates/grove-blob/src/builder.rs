//! Writing new blobs.

use std::fs;
use std::path::{Component, Path};

use grove_store::{BlobStream, ObjectStore};
use grove_types::ObjectId;
use tracing::{debug, warn};

use crate::config::BlobConfig;
use crate::error::{BlobError, BlobResult};
use crate::provider::{Chunk, ChunkProvider};

/// Builds blobs into an object store.
pub struct BlobBuilder<'s> {
    store: &'s dyn ObjectStore,
    config: BlobConfig,
}

impl<'s> BlobBuilder<'s> {
    /// Builder with default configuration.
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self::with_config(store, BlobConfig::default())
    }

    pub fn with_config(store: &'s dyn ObjectStore, config: BlobConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Pull chunks from `provider` until it ends, and store what arrived.
    ///
    /// The provider is asked for at most `chunk_size` bytes per pull; longer
    /// chunks are truncated. An empty chunk or [`Chunk::End`] finishes the
    /// blob. [`Chunk::Failed`] also finishes it: the failure is logged and
    /// the bytes received so far are stored. Only store failures are
    /// returned as errors.
    ///
    /// `hint_path` selects store-side content filters.
    pub fn from_chunks<P>(&self, provider: &mut P, hint_path: Option<&str>) -> BlobResult<ObjectId>
    where
        P: ChunkProvider + ?Sized,
    {
        let max_len = self.config.chunk_size.max(1);
        let mut stream = BlobStream::open(self.store, hint_path);
        let mut pulls = 0usize;

        loop {
            pulls += 1;
            match provider.next_chunk(max_len) {
                Chunk::Data(data) if data.is_empty() => break,
                Chunk::Data(data) => {
                    if data.len() > max_len {
                        warn!(requested = max_len, received = data.len(), "provider chunk too long, truncating");
                    }
                    stream.write(&data[..data.len().min(max_len)]);
                }
                Chunk::End => break,
                Chunk::Failed(error) => {
                    warn!(%error, received = stream.len(), "chunk provider failed, keeping partial blob");
                    break;
                }
            }
        }

        let size = stream.len();
        let id = stream.finish()?;
        debug!(blob = %id.short_hex(), size, pulls, hint = ?hint_path, "blob built from chunks");
        Ok(id)
    }

    /// Store `bytes` as given.
    pub fn from_buffer(&self, bytes: &[u8]) -> BlobResult<ObjectId> {
        let id = self.store.write_blob(bytes, None)?;
        debug!(blob = %id.short_hex(), size = bytes.len(), "blob built from buffer");
        Ok(id)
    }

    /// Store the contents of a file, unfiltered.
    pub fn from_disk(&self, path: &Path) -> BlobResult<ObjectId> {
        let bytes = fs::read(path).map_err(|source| BlobError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let id = self.store.write_blob(&bytes, None)?;
        debug!(blob = %id.short_hex(), size = bytes.len(), path = %path.display(), "blob built from disk");
        Ok(id)
    }

    /// Store the contents of `workdir/relative_path`, applying content
    /// filters for `relative_path`.
    pub fn from_workdir(&self, workdir: &Path, relative_path: &Path) -> BlobResult<ObjectId> {
        let hint = workdir_hint(relative_path)?;
        let full = workdir.join(relative_path);
        let bytes = fs::read(&full).map_err(|source| BlobError::Io { path: full, source })?;
        let id = self.store.write_blob(&bytes, Some(&hint))?;
        debug!(blob = %id.short_hex(), size = bytes.len(), path = %hint, "blob built from workdir");
        Ok(id)
    }
}

/// `/`-joined form of a relative path that stays inside its root.
fn workdir_hint(relative_path: &Path) -> BlobResult<String> {
    let invalid = || BlobError::InvalidPath(relative_path.to_path_buf());
    let mut parts = Vec::new();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return Err(invalid()),
        }
    }
    if parts.is_empty() {
        return Err(invalid());
    }
    Ok(parts.join("/"))
}
