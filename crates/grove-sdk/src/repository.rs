use std::path::{Path, PathBuf};
use std::sync::Arc;

use grove_blob::{BlobBuilder, ChunkProvider};
use grove_diff::{diff_trees, TreeDiff};
use grove_history::{RevWalk, Sorting};
use grove_index::Index;
use grove_refs::names::branch_ref_name;
use grove_refs::{validate_branch_name, Head, InMemoryRefStore, Ref, RefError, RefStore};
use grove_store::{Blob, Commit, CrlfFilter, InMemoryObjectStore, ObjectStore, Signature};
use grove_types::ObjectId;
use regex::Regex;
use tracing::debug;

use crate::config::RepositoryConfig;
use crate::entity::{resolve_diff_target, DiffTarget, Entity, Side};
use crate::error::{RepoError, RepoResult};
use crate::revparse::{head_target, rev_parse};

/// Branch HEAD names in a fresh repository.
pub const DEFAULT_BRANCH: &str = "main";

/// Where [`Repository::create_branch`] points the new branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BranchTarget {
    Object(ObjectId),
    /// Resolved with [`rev_parse`].
    Revision(String),
}

impl From<ObjectId> for BranchTarget {
    fn from(id: ObjectId) -> Self {
        BranchTarget::Object(id)
    }
}

impl From<&str> for BranchTarget {
    fn from(spec: &str) -> Self {
        BranchTarget::Revision(spec.to_string())
    }
}

/// High-level Grove repository API.
pub struct Repository {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
    pub(crate) index: Index,
    workdir: Option<PathBuf>,
    config: RepositoryConfig,
}

impl Repository {
    /// Assemble a repository from existing backends.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        refs: Arc<dyn RefStore>,
        workdir: Option<PathBuf>,
        config: RepositoryConfig,
    ) -> Self {
        let mut index = Index::new(Arc::clone(&store));
        index.follow_symlinks = config.follow_symlinks;
        Self {
            store,
            refs,
            index,
            workdir,
            config,
        }
    }

    /// In-memory repository with default configuration and HEAD on
    /// [`DEFAULT_BRANCH`].
    pub fn in_memory(workdir: Option<PathBuf>) -> RepoResult<Self> {
        Self::in_memory_with_config(workdir, RepositoryConfig::default())
    }

    pub fn in_memory_with_config(workdir: Option<PathBuf>, config: RepositoryConfig) -> RepoResult<Self> {
        let store = InMemoryObjectStore::new().with_filter(CrlfFilter::default());
        let refs = InMemoryRefStore::new();
        refs.set_head(DEFAULT_BRANCH)?;
        Ok(Self::new(Arc::new(store), Arc::new(refs), workdir, config))
    }

    // ---- Accessors ----

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn refs(&self) -> &dyn RefStore {
        self.refs.as_ref()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub(crate) fn require_workdir(&self) -> RepoResult<PathBuf> {
        self.workdir.clone().ok_or(RepoError::NoWorkdir)
    }

    // ---- Diff ----

    /// Resolve both sides of a diff without comparing them.
    pub fn diff_target(&self, entity: &Entity) -> RepoResult<DiffTarget> {
        resolve_diff_target(self.store(), self.refs(), entity)
    }

    /// Structural diff between two tree-ish entities.
    ///
    /// Commits stand for their root trees. The left side is checked first, so
    /// when both sides are invalid the error names the left one.
    pub fn diff(&self, left: impl Into<Entity>, right: impl Into<Entity>) -> RepoResult<TreeDiff> {
        let left = self.diff_target(&left.into())?.into_tree(Side::Left)?;
        let right = self.diff_target(&right.into())?.into_tree(Side::Right)?;
        let diff = diff_trees(self.store(), Some(&left), &right)?;
        debug!(left = %left.short_hex(), right = %right.short_hex(), changes = diff.len(), "diffed trees");
        Ok(diff)
    }

    // ---- History ----

    /// A fresh walker over the commits reachable from `from`.
    pub fn walk(&self, from: ObjectId, sorting: impl Into<Sorting>) -> RepoResult<RevWalk<'_>> {
        let mut walk = RevWalk::new(self.store());
        walk.push(from)?;
        walk.set_sorting(sorting);
        Ok(walk)
    }

    /// Call `callback` for each commit reachable from `from`, in the same
    /// order [`walk`](Self::walk) yields them. Returns the number visited.
    pub fn walk_each<F>(&self, from: ObjectId, sorting: impl Into<Sorting>, mut callback: F) -> RepoResult<usize>
    where
        F: FnMut(&ObjectId, &Commit),
    {
        let mut visited = 0;
        for item in self.walk(from, sorting)? {
            let (id, commit) = item?;
            callback(&id, &commit);
            visited += 1;
        }
        Ok(visited)
    }

    // ---- References ----

    /// Every reference, optionally filtered by a regular expression matched
    /// anywhere in the full name. Sorted by name.
    pub fn list_references(&self, pattern: Option<&str>) -> RepoResult<Vec<Ref>> {
        let filter = pattern.map(Regex::new).transpose()?;
        let mut references = Vec::new();
        for name in self.refs.reference_names()? {
            if filter.as_ref().is_some_and(|re| !re.is_match(&name)) {
                continue;
            }
            let reference = self
                .refs
                .read_ref(&name)?
                .ok_or_else(|| RepoError::MissingReference { name: name.clone() })?;
            references.push(reference);
        }
        debug!(pattern = ?pattern, count = references.len(), "listed references");
        Ok(references)
    }

    /// Resolve a revision string to an object id.
    pub fn rev_parse(&self, spec: &str) -> RepoResult<ObjectId> {
        rev_parse(self.store(), self.refs(), spec)
    }

    /// Create a new branch. With no target the branch starts at `HEAD`.
    pub fn create_branch(&self, name: &str, target: Option<BranchTarget>) -> RepoResult<Ref> {
        validate_branch_name(name)?;
        let target = match target.unwrap_or_else(|| BranchTarget::Revision("HEAD".into())) {
            BranchTarget::Object(id) => id,
            BranchTarget::Revision(spec) => self.rev_parse(&spec)?,
        };

        let ref_name = branch_ref_name(name);
        if self.refs.read_ref(&ref_name)?.is_some() {
            return Err(RefError::AlreadyExists { name: ref_name }.into());
        }
        let branch = Ref::branch(name, target);
        self.refs.write_ref(&ref_name, &branch)?;
        debug!(branch = name, target = %target.short_hex(), "branch created");
        Ok(branch)
    }

    // ---- Blobs ----

    /// Look up a blob.
    pub fn blob(&self, id: &ObjectId) -> RepoResult<Blob> {
        Ok(self.store.read_blob(id)?)
    }

    fn blob_builder(&self) -> BlobBuilder<'_> {
        BlobBuilder::with_config(self.store(), self.config.blob.clone())
    }

    /// Build a blob from a chunk provider; see [`BlobBuilder::from_chunks`].
    pub fn blob_from_chunks<P>(&self, provider: &mut P, hint_path: Option<&str>) -> RepoResult<ObjectId>
    where
        P: ChunkProvider + ?Sized,
    {
        Ok(self.blob_builder().from_chunks(provider, hint_path)?)
    }

    pub fn blob_from_buffer(&self, bytes: &[u8]) -> RepoResult<ObjectId> {
        Ok(self.blob_builder().from_buffer(bytes)?)
    }

    pub fn blob_from_disk(&self, path: &Path) -> RepoResult<ObjectId> {
        Ok(self.blob_builder().from_disk(path)?)
    }

    /// Build a blob from a file in the working directory, applying content
    /// filters for its path.
    pub fn blob_from_workdir(&self, relative_path: &Path) -> RepoResult<ObjectId> {
        let workdir = self.require_workdir()?;
        Ok(self.blob_builder().from_workdir(&workdir, relative_path)?)
    }

    // ---- Commits ----

    /// Write the staged index as nested trees.
    pub fn write_tree(&mut self) -> RepoResult<ObjectId> {
        Ok(self.index.write_tree()?)
    }

    /// Commit the staged index on top of HEAD and advance HEAD's branch, or
    /// HEAD itself when detached.
    pub fn commit(&mut self, message: &str, author: Signature) -> RepoResult<ObjectId> {
        let tree = self.write_tree()?;
        let parents: Vec<ObjectId> = head_target(self.refs())?.into_iter().collect();
        let commit = Commit::new(tree, parents, author, message);
        let id = self.store.write(&commit.to_stored_object()?)?;

        match self.refs.head()? {
            Some(Head::Detached(_)) => self.refs.set_head_detached(id)?,
            Some(Head::Symbolic(branch)) => self.refs.write_ref(&branch_ref_name(&branch), &Ref::branch(branch, id))?,
            None => {
                self.refs
                    .write_ref(&branch_ref_name(DEFAULT_BRANCH), &Ref::branch(DEFAULT_BRANCH, id))?;
                self.refs.set_head(DEFAULT_BRANCH)?;
            }
        }
        debug!(commit = %id.short_hex(), tree = %tree.short_hex(), parents = commit.parents.len(), "committed");
        Ok(id)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .field("staged", &self.index.len())
            .field("config", &self.config)
            .finish()
    }
}
