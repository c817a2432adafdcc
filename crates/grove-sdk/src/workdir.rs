//! Staging working-directory entries.

use std::fs;
use std::path::{Component, Path};

use grove_index::{IndexError, StageFile};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{RepoError, RepoResult};
use crate::repository::Repository;

impl Repository {
    /// Stage a file, or every file below a directory, from the working
    /// directory. Returns the staged index paths.
    pub fn stage_workdir_entry(&mut self, relative_path: impl AsRef<Path>) -> RepoResult<Vec<String>> {
        let root = self.require_workdir()?;
        self.stage_entry_under(&root, relative_path.as_ref())
    }

    /// Stage `root/relative_path`, recursing into directories.
    ///
    /// Index paths are `/`-separated and relative to `root`. Directories
    /// named in [`RepositoryConfig::ignored_dirs`](crate::RepositoryConfig)
    /// are skipped below the starting point. Symbolic links are staged as
    /// links unless `follow_symlinks` is set, in which case link cycles fail
    /// the call.
    pub fn stage_entry_under(&mut self, root: &Path, relative_path: &Path) -> RepoResult<Vec<String>> {
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(IndexError::InvalidPath(relative_path.display().to_string()).into());
        }

        let follow = self.config().follow_symlinks;
        let full = root.join(relative_path);
        let meta = if follow {
            fs::metadata(&full)
        } else {
            fs::symlink_metadata(&full)
        }
        .map_err(|source| RepoError::Filesystem {
            path: full.clone(),
            source,
        })?;

        if !meta.is_dir() {
            let entry = self.index.stage_file(root, relative_path)?;
            debug!(path = %entry.path, blob = %entry.object_id.short_hex(), "staged file");
            return Ok(vec![entry.path]);
        }

        let mut staged = Vec::new();
        let walker = WalkDir::new(&full)
            .follow_links(follow)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && self.config().is_ignored_dir(e.file_name()))
            });
        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                entries.push(entry.into_path());
            }
        }

        for path in entries {
            let relative = path.strip_prefix(root).map_err(|_| {
                IndexError::InvalidPath(format!("{} is outside {}", path.display(), root.display()))
            })?;
            let entry = self.index.stage_file(root, relative)?;
            staged.push(entry.path);
        }

        debug!(root = %full.display(), count = staged.len(), "staged directory");
        Ok(staged)
    }
}
