//! The [`RefStore`] trait defining the reference storage interface.

use grove_types::ObjectId;

use crate::error::Result;
use crate::types::{Head, Ref};

/// Storage backend for named references.
///
/// Implementations must be thread-safe and provide atomic
/// read/write/delete operations on named refs. Names are canonical
/// (`refs/heads/main`, `refs/tags/v1`, `refs/remotes/origin/main`).
pub trait RefStore: Send + Sync {
    /// Read a ref by its canonical name.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Write (create or update) a ref at the given canonical name.
    ///
    /// Fails with `TagImmutable` when overwriting an existing tag.
    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()>;

    /// Delete a ref by canonical name. Returns `Ok(true)` if it existed.
    fn delete_ref(&self, name: &str) -> Result<bool>;

    /// List all refs whose canonical name starts with `prefix`, sorted by name.
    ///
    /// Pass `""` to list all refs.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>>;

    /// Read the current HEAD state. `Ok(None)` if HEAD has not been set.
    fn head(&self) -> Result<Option<Head>>;

    /// Point HEAD at a branch by short name.
    fn set_head(&self, branch: &str) -> Result<()>;

    /// Detach HEAD at an object.
    fn set_head_detached(&self, target: ObjectId) -> Result<()>;

    /// Canonical names of every ref, sorted.
    fn reference_names(&self) -> Result<Vec<String>> {
        Ok(self.list_refs("")?.into_iter().map(|(name, _)| name).collect())
    }
}
