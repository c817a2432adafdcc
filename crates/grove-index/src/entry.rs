//! Index entry type.

use std::time::SystemTime;

use grove_store::EntryMode;
use grove_types::ObjectId;
use serde::{Deserialize, Serialize};

/// A staged file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// `/`-separated path relative to the working-directory root.
    pub path: String,
    /// Blob holding the staged content.
    pub object_id: ObjectId,
    /// Regular, executable or symlink.
    pub mode: EntryMode,
    /// Size of the staged content in bytes.
    pub size: u64,
    /// Modification time of the source file, when staged from disk.
    pub mtime: Option<SystemTime>,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, object_id: ObjectId, mode: EntryMode, size: u64) -> Self {
        Self {
            path: path.into(),
            object_id,
            mode,
            size,
            mtime: None,
        }
    }

    /// Record the source file's modification time.
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = Some(mtime);
        self
    }
}
