//! Staging files from the working directory.

use std::fs;
use std::path::{Component, Path};

use grove_store::EntryMode;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};
use crate::index::{validate_path, Index};

/// Stage a single working-directory file.
pub trait StageFile {
    /// Read `root/relative_path` and stage it under its `/`-separated
    /// relative path.
    ///
    /// Directories are rejected with `NotAFile`; expanding them is the
    /// caller's job.
    fn stage_file(&mut self, root: &Path, relative_path: &Path) -> IndexResult<IndexEntry>;
}

/// Convert a relative filesystem path into the index's `/`-separated form.
pub fn index_path(relative_path: &Path) -> IndexResult<String> {
    let mut parts = Vec::new();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    IndexError::InvalidPath(format!("{} is not valid UTF-8", relative_path.display()))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(IndexError::InvalidPath(relative_path.display().to_string()));
            }
        }
    }
    let path = parts.join("/");
    validate_path(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn file_mode(meta: &fs::Metadata) -> EntryMode {
    use std::os::unix::fs::PermissionsExt;
    if meta.permissions().mode() & 0o111 != 0 {
        EntryMode::Executable
    } else {
        EntryMode::Regular
    }
}

#[cfg(not(unix))]
fn file_mode(_meta: &fs::Metadata) -> EntryMode {
    EntryMode::Regular
}

impl StageFile for Index {
    fn stage_file(&mut self, root: &Path, relative_path: &Path) -> IndexResult<IndexEntry> {
        let path = index_path(relative_path)?;
        let full = root.join(relative_path);
        let io_err = |source: std::io::Error| IndexError::Io {
            path: full.clone(),
            source,
        };

        let meta = if self.follow_symlinks {
            fs::metadata(&full)
        } else {
            fs::symlink_metadata(&full)
        }
        .map_err(io_err)?;

        let (content, mode) = if meta.file_type().is_symlink() {
            let target = fs::read_link(&full).map_err(io_err)?;
            let target = target.to_str().ok_or_else(|| {
                IndexError::InvalidPath(format!("symlink target of {} is not valid UTF-8", full.display()))
            })?;
            (target.as_bytes().to_vec(), EntryMode::Symlink)
        } else if meta.is_file() {
            (fs::read(&full).map_err(io_err)?, file_mode(&meta))
        } else {
            return Err(IndexError::NotAFile(full.clone()));
        };

        let hint = (mode != EntryMode::Symlink).then_some(path.as_str());
        let object_id = self.store.write_blob(&content, hint)?;
        let size = self.store.read_blob(&object_id)?.size() as u64;

        let mut entry = IndexEntry::new(path, object_id, mode, size);
        if let Ok(mtime) = meta.modified() {
            entry = entry.with_mtime(mtime);
        }
        Ok(self.insert(entry).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use grove_store::{InMemoryObjectStore, ObjectStore};

    fn setup() -> (tempfile::TempDir, Arc<dyn ObjectStore>, Index) {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let index = Index::new(Arc::clone(&store));
        (dir, store, index)
    }

    #[test]
    fn index_path_normalises_separators() {
        assert_eq!(index_path(Path::new("a/b/c.txt")).unwrap(), "a/b/c.txt");
        assert_eq!(index_path(Path::new("./a.txt")).unwrap(), "a.txt");
        assert!(index_path(Path::new("../escape")).is_err());
        assert!(index_path(Path::new("/abs/path")).is_err());
        assert!(index_path(Path::new("")).is_err());
    }

    #[test]
    fn stages_regular_file() {
        let (dir, store, mut index) = setup();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), b"on disk").unwrap();

        let entry = index.stage_file(dir.path(), Path::new("sub/file.txt")).unwrap();
        assert_eq!(entry.path, "sub/file.txt");
        assert_eq!(entry.size, 7);
        assert!(entry.mtime.is_some());
        assert_eq!(store.read_blob(&entry.object_id).unwrap().data, b"on disk");
        assert_eq!(index.get("sub/file.txt"), Some(&entry));
    }

    #[test]
    fn directory_is_not_a_file() {
        let (dir, _store, mut index) = setup();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let err = index.stage_file(dir.path(), Path::new("sub")).unwrap_err();
        assert!(matches!(err, IndexError::NotAFile(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let (dir, _store, mut index) = setup();
        let err = index.stage_file(dir.path(), Path::new("nope.txt")).unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
        assert!(index.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_recorded() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, _store, mut index) = setup();
        let script = dir.path().join("run.sh");
        fs::write(&script, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let entry = index.stage_file(dir.path(), Path::new("run.sh")).unwrap();
        assert_eq!(entry.mode, EntryMode::Executable);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_stored_as_links_unless_followed() {
        let (dir, store, mut index) = setup();
        fs::write(dir.path().join("target.txt"), b"target body").unwrap();
        std::os::unix::fs::symlink("target.txt", dir.path().join("link")).unwrap();

        let entry = index.stage_file(dir.path(), Path::new("link")).unwrap();
        assert_eq!(entry.mode, EntryMode::Symlink);
        assert_eq!(store.read_blob(&entry.object_id).unwrap().data, b"target.txt");

        index.follow_symlinks = true;
        let entry = index.stage_file(dir.path(), Path::new("link")).unwrap();
        assert_eq!(entry.mode, EntryMode::Regular);
        assert_eq!(store.read_blob(&entry.object_id).unwrap().data, b"target body");
    }
}
