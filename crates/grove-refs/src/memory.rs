//! In-memory reference store.
//!
//! [`InMemoryRefStore`] keeps refs in a `BTreeMap` behind a `RwLock`, so
//! listings come out sorted by canonical name.

use std::collections::BTreeMap;
use std::sync::RwLock;

use grove_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_remote_name, validate_tag_name, HEADS_PREFIX};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

/// An in-memory implementation of [`RefStore`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, Ref>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store with HEAD unset.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        let refs = self.refs.read().map_err(|_| RefError::LockPoisoned)?;
        Ok(refs.get(name).cloned())
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()> {
        match reference {
            Ref::Branch { name, .. } => validate_branch_name(name)?,
            Ref::Tag { name, .. } => validate_tag_name(name)?,
            Ref::Remote { remote, branch, .. } => {
                validate_remote_name(remote)?;
                validate_branch_name(branch)?;
            }
        }

        let mut refs = self.refs.write().map_err(|_| RefError::LockPoisoned)?;
        if matches!(refs.get(name), Some(existing) if existing.is_tag()) {
            return Err(RefError::TagImmutable {
                name: name.to_string(),
            });
        }
        refs.insert(name.to_string(), reference.clone());
        debug!(name, target = %reference.target().short_hex(), "ref written");
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<bool> {
        {
            let head = self.head.read().map_err(|_| RefError::LockPoisoned)?;
            if let Some(Head::Symbolic(current)) = head.as_ref() {
                if name.strip_prefix(HEADS_PREFIX) == Some(current.as_str()) {
                    return Err(RefError::DeleteCurrentBranch {
                        name: current.clone(),
                    });
                }
            }
        }

        let mut refs = self.refs.write().map_err(|_| RefError::LockPoisoned)?;
        Ok(refs.remove(name).is_some())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        let refs = self.refs.read().map_err(|_| RefError::LockPoisoned)?;
        Ok(refs
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn head(&self) -> Result<Option<Head>> {
        let head = self.head.read().map_err(|_| RefError::LockPoisoned)?;
        Ok(head.clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        let mut head = self.head.write().map_err(|_| RefError::LockPoisoned)?;
        *head = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, target: ObjectId) -> Result<()> {
        let mut head = self.head.write().map_err(|_| RefError::LockPoisoned)?;
        *head = Some(Head::Detached(target));
        Ok(())
    }
}
